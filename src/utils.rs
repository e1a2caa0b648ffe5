use thiserror::Error;
use std::path::{Path, PathBuf};
use serde::Serialize;

/// 自定义错误类型
#[derive(Error, Debug)]
pub enum RefresherError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage file not found: {}", .0.display())]
    StorageNotFound(PathBuf),

    #[error("Invalid storage file {}: {reason}", .path.display())]
    InvalidStorage { path: PathBuf, reason: String },

    #[error("Invalid patch pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("External tool error: {0}")]
    ExternalTool(String),

    #[error("Service returned HTTP {status} for {url}: {body}")]
    ExternalService { status: u16, url: String, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, RefresherError>;

/// 创建文件备份
pub fn create_backup(file_path: &Path) -> Result<PathBuf> {
    if !file_path.exists() {
        return Err(RefresherError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "原文件不存在"
        )));
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    let backup_path = file_path.with_extension(format!("{}.bak", timestamp));

    std::fs::copy(file_path, &backup_path)?;

    Ok(backup_path)
}

/// 以 4 空格缩进序列化 JSON（不带结尾换行）
pub fn to_json_pretty4<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;

    // serde_json 只输出合法 UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_pretty4_indentation() {
        let value = json!({"a": 1, "b": {"c": "d"}});
        let text = to_json_pretty4(&value).unwrap();

        assert_eq!(text, "{\n    \"a\": 1,\n    \"b\": {\n        \"c\": \"d\"\n    }\n}");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_create_backup() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("storage.json");
        std::fs::write(&file, "{}").unwrap();

        let backup = create_backup(&file).unwrap();
        assert!(backup.exists());
        assert_ne!(backup, file);
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "{}");
    }

    #[test]
    fn test_create_backup_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = create_backup(&temp_dir.path().join("missing.json"));

        assert!(matches!(result, Err(RefresherError::IoError(_))));
    }
}
