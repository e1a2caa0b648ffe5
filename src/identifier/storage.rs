/// storage.json 读写
///
/// 文档作为任意 JSON 对象保留（包括键顺序），只替换四个遥测字段。
use std::path::{Path, PathBuf};
use serde_json::{Map, Value};
use super::IdentifierSet;
use crate::utils::{to_json_pretty4, RefresherError, Result};

pub const MAC_MACHINE_ID_KEY: &str = "telemetry.macMachineId";
pub const MACHINE_ID_KEY: &str = "telemetry.machineId";
pub const DEV_DEVICE_ID_KEY: &str = "telemetry.devDeviceId";
pub const SQM_ID_KEY: &str = "telemetry.sqmId";

/// 修改前必须全部存在的键
pub const REQUIRED_FIELDS: [&str; 4] = [
    MAC_MACHINE_ID_KEY,
    MACHINE_ID_KEY,
    DEV_DEVICE_ID_KEY,
    SQM_ID_KEY,
];

/// 已校验的 storage.json 文档
#[derive(Debug, Clone)]
pub struct StorageDocument {
    path: PathBuf,
    data: Map<String, Value>,
}

impl StorageDocument {
    /// 读取并校验文件
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RefresherError::StorageNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// 解析并校验文本内容
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content).map_err(|e| RefresherError::InvalidStorage {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let data = match value {
            Value::Object(map) => map,
            other => {
                return Err(RefresherError::InvalidStorage {
                    path: path.to_path_buf(),
                    reason: format!("顶层不是对象: {}", json_type_name(&other)),
                })
            }
        };

        let missing: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|key| !data.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(RefresherError::Validation(format!(
                "Missing required fields in storage.json: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 当前标识符（非字符串值按 JSON 文本表示）
    pub fn identifiers(&self) -> IdentifierSet {
        let field = |key: &str| match self.data.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };

        IdentifierSet {
            mac_machine_id: field(MAC_MACHINE_ID_KEY),
            machine_id: field(MACHINE_ID_KEY),
            dev_device_id: field(DEV_DEVICE_ID_KEY),
            sqm_id: field(SQM_ID_KEY),
        }
    }

    /// 合并新的标识符，其余键保持不变
    pub fn apply(&mut self, ids: &IdentifierSet) {
        for (key, value) in ids.entries() {
            self.data.insert(key.to_string(), Value::String(value.to_string()));
        }
    }

    /// 序列化为 4 空格缩进的文本
    pub fn render(&self) -> Result<String> {
        to_json_pretty4(&self.data)
    }

    /// 写回原路径
    pub fn save(&self) -> Result<()> {
        let content = self.render()?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
