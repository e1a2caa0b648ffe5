/// main.js 补丁
///
/// 把 `async getMachineId(){return <expr>??<fallback>}` 收缩为
/// `async getMachineId(){return <fallback>}`（getMacMachineId 同理），
/// 使编辑器总是读取 storage.json 中的值。
///
/// 匹配依赖压缩后的代码形态，版本变化后可能不再匹配；不匹配时内容保持原样。
use std::path::Path;
use regex::Regex;
use crate::utils::{RefresherError, Result};

/// 需要改写的方法名
pub const PATCHED_METHODS: [&str; 2] = ["getMachineId", "getMacMachineId"];

/// 补丁结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    pub content: String,
    /// 实际被改写的方法
    pub patched: Vec<String>,
}

fn method_pattern(name: &str) -> Result<Regex> {
    let pattern = format!(
        r"async {}\(\)\{{return [^?]+\?\?([^}}]+)\}}",
        regex::escape(name)
    );
    Ok(Regex::new(&pattern)?)
}

/// 对文本应用补丁（每个方法只替换第一次出现）
pub fn patch_content(content: &str) -> Result<PatchOutcome> {
    let mut modified = content.to_string();
    let mut patched = Vec::new();

    for name in PATCHED_METHODS {
        let pattern = method_pattern(name)?;
        let replacement = match pattern.captures(content) {
            Some(caps) => format!("async {}(){{return {}}}", name, &caps[1]),
            None => continue,
        };

        modified = pattern
            .replacen(&modified, 1, regex::NoExpand(&replacement))
            .into_owned();
        patched.push(name.to_string());
    }

    Ok(PatchOutcome {
        content: modified,
        patched,
    })
}

/// 对文件应用补丁
///
/// 文件不存在时返回 `Ok(None)`；没有匹配时不写文件。
pub fn patch_file(path: &Path) -> Result<Option<PatchOutcome>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        RefresherError::ExternalTool(format!("Failed to modify main.js: {}", e))
    })?;
    let outcome = patch_content(&content)?;

    if !outcome.patched.is_empty() {
        std::fs::write(path, &outcome.content).map_err(|e| {
            RefresherError::ExternalTool(format!("Failed to modify main.js: {}", e))
        })?;
    }

    Ok(Some(outcome))
}
