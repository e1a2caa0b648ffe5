use std::path::PathBuf;
use super::IdentifierSet;

/// 刷新结果
#[derive(Debug, Clone, Default)]
pub struct RefreshReport {
    pub identifiers: Option<IdentifierSet>,
    pub patched_methods: Vec<String>,
    pub device_id_written: bool,
    pub platform_uuid_updated: bool,
    pub backup: Option<PathBuf>,
}

impl std::fmt::Display for RefreshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== 标识符刷新结果 ===")?;
        if let Some(ids) = &self.identifiers {
            write!(f, "{}", ids)?;
        }
        let patched = if self.patched_methods.is_empty() {
            "无".to_string()
        } else {
            self.patched_methods.join(", ")
        };
        writeln!(f, "main.js 补丁: {}", patched)?;
        writeln!(f, "设备 ID 文件: {}", if self.device_id_written { "已更新" } else { "跳过" })?;
        writeln!(f, "平台 UUID: {}", if self.platform_uuid_updated { "已更新" } else { "跳过" })?;
        if let Some(backup) = &self.backup {
            writeln!(f, "备份: {}", backup.display())?;
        }
        Ok(())
    }
}
