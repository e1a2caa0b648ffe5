/// 配置模块
///
/// 配置在启动时加载一次，之后按值传入各个流程，不存在全局状态。
/// 配置文件为 TOML，键名沿用 `addyApiKey` 等 camelCase 写法，
/// 路径相关配置放在 `[paths]` 表中：
///
/// ```toml
/// addyApiKey = "xxxx"
/// aliasDescription = "cursor"
/// recipientIds = ["..."]
///
/// [paths]
/// storage = "/path/to/storage.json"
/// processName = "Cursor"
/// ```

use std::path::{Path, PathBuf};
use serde::Deserialize;
use crate::utils::{RefresherError, Result};

pub const DEFAULT_API_URL: &str = "https://app.addy.io/api/v1/aliases";
pub const DEFAULT_ALIAS_DOMAIN: &str = "anonaddy.me";
pub const DEFAULT_ALIAS_FORMAT: &str = "uuid";
pub const DEFAULT_ALIAS_DESCRIPTION: &str = "cursor";
pub const DEFAULT_PROCESS_NAME: &str = "Cursor";

/// 默认配置文件位置（相对于系统配置目录）
pub const CONFIG_FILE_RELATIVE: &str = "cursor-refresher/config.toml";

/// 别名服务相关配置
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AliasSettings {
    pub addy_api_key: String,
    pub addy_api_url: String,
    pub alias_description: String,
    pub alias_domain: String,
    pub alias_format: String,
    pub recipient_ids: Vec<String>,
}

impl Default for AliasSettings {
    fn default() -> Self {
        Self {
            addy_api_key: String::new(),
            addy_api_url: DEFAULT_API_URL.to_string(),
            alias_description: DEFAULT_ALIAS_DESCRIPTION.to_string(),
            alias_domain: DEFAULT_ALIAS_DOMAIN.to_string(),
            alias_format: DEFAULT_ALIAS_FORMAT.to_string(),
            recipient_ids: Vec::new(),
        }
    }
}

/// 配置文件中的路径覆盖项（未设置的使用平台默认值）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathSettings {
    pub storage: Option<PathBuf>,
    pub device_id: Option<PathBuf>,
    pub main_js: Option<PathBuf>,
    pub platform_uuid: Option<PathBuf>,
    pub process_name: Option<String>,
}

/// 解析后的系统路径
#[derive(Debug, Clone, PartialEq)]
pub struct SystemPaths {
    /// 编辑器的 storage.json
    pub storage: PathBuf,
    /// 共享设备 ID 文件
    pub device_id: PathBuf,
    /// 编辑器 main.js
    pub main_js: PathBuf,
    /// 平台 UUID 记录（仅 macOS）
    pub platform_uuid: Option<PathBuf>,
    /// 需要结束的进程名
    pub process_name: String,
}

impl SystemPaths {
    /// 以给定的用户目录生成平台默认路径
    pub fn defaults_for_home(home: &Path) -> Self {
        #[cfg(target_os = "macos")]
        {
            Self {
                storage: home.join("Library/Application Support/Cursor/User/globalStorage/storage.json"),
                device_id: home.join("Library/Application Support/Microsoft/DeveloperTools/deviceid"),
                main_js: PathBuf::from("/Applications/Cursor.app/Contents/Resources/app/out/main.js"),
                platform_uuid: Some(PathBuf::from(
                    "/var/root/Library/Preferences/SystemConfiguration/com.apple.platform.uuid.plist",
                )),
                process_name: DEFAULT_PROCESS_NAME.to_string(),
            }
        }

        #[cfg(target_os = "windows")]
        {
            let roaming = home.join("AppData").join("Roaming");
            let local = home.join("AppData").join("Local");
            Self {
                storage: roaming.join("Cursor/User/globalStorage/storage.json"),
                device_id: roaming.join("Microsoft/DeveloperTools/deviceid"),
                main_js: local.join("Programs/cursor/resources/app/out/main.js"),
                platform_uuid: None,
                process_name: DEFAULT_PROCESS_NAME.to_string(),
            }
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            let config = home.join(".config");
            Self {
                storage: config.join("Cursor/User/globalStorage/storage.json"),
                device_id: config.join("Microsoft/DeveloperTools/deviceid"),
                main_js: PathBuf::from("/opt/Cursor/resources/app/out/main.js"),
                platform_uuid: None,
                process_name: DEFAULT_PROCESS_NAME.to_string(),
            }
        }
    }

    /// 在默认路径上应用配置文件中的覆盖项
    pub fn resolve(home: &Path, overrides: &PathSettings) -> Self {
        let defaults = Self::defaults_for_home(home);
        Self {
            storage: overrides.storage.clone().unwrap_or(defaults.storage),
            device_id: overrides.device_id.clone().unwrap_or(defaults.device_id),
            main_js: overrides.main_js.clone().unwrap_or(defaults.main_js),
            platform_uuid: overrides.platform_uuid.clone().or(defaults.platform_uuid),
            process_name: overrides.process_name.clone().unwrap_or(defaults.process_name),
        }
    }
}

/// 配置文件的原始结构
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    #[serde(flatten)]
    alias: AliasSettings,
    paths: PathSettings,
}

/// 完整配置
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub alias: AliasSettings,
    pub paths: SystemPaths,
}

impl Config {
    /// 加载配置
    ///
    /// 显式指定的配置文件必须存在；未指定时尝试默认位置，
    /// 默认位置不存在则全部使用默认值。
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| RefresherError::Config("无法定位用户目录".to_string()))?;

        let file = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(RefresherError::Config(format!(
                        "配置文件不存在: {}",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => dirs::config_dir()
                .map(|dir| dir.join(CONFIG_FILE_RELATIVE))
                .filter(|path| path.exists()),
        };

        match file {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                let content = std::fs::read_to_string(&path)?;
                Self::from_toml_str(&content, &home)
            }
            None => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::with_home(&home))
            }
        }
    }

    /// 从 TOML 文本解析配置
    pub fn from_toml_str(content: &str, home: &Path) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(Self {
            alias: file.alias,
            paths: SystemPaths::resolve(home, &file.paths),
        })
    }

    /// 全部使用默认值
    pub fn with_home(home: &Path) -> Self {
        Self {
            alias: AliasSettings::default(),
            paths: SystemPaths::defaults_for_home(home),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::with_home(Path::new("/home/tester"));

        assert_eq!(config.alias.addy_api_key, "");
        assert_eq!(config.alias.addy_api_url, DEFAULT_API_URL);
        assert_eq!(config.alias.alias_description, "cursor");
        assert_eq!(config.alias.alias_domain, "anonaddy.me");
        assert_eq!(config.alias.alias_format, "uuid");
        assert!(config.alias.recipient_ids.is_empty());
        assert_eq!(config.paths.process_name, "Cursor");
        assert!(config.paths.storage.starts_with("/home/tester"));
        assert!(config.paths.storage.ends_with("User/globalStorage/storage.json"));
    }

    #[test]
    fn test_parse_toml_with_overrides() {
        let content = r#"
addyApiKey = "secret"
aliasDescription = "cursor-test"
recipientIds = ["r1", "r2"]

[paths]
storage = "/tmp/storage.json"
processName = "Editor"
"#;
        let config = Config::from_toml_str(content, Path::new("/home/tester")).unwrap();

        assert_eq!(config.alias.addy_api_key, "secret");
        assert_eq!(config.alias.alias_description, "cursor-test");
        assert_eq!(config.alias.recipient_ids, vec!["r1".to_string(), "r2".to_string()]);
        // 未设置的字段保持默认
        assert_eq!(config.alias.alias_domain, DEFAULT_ALIAS_DOMAIN);
        assert_eq!(config.paths.storage, PathBuf::from("/tmp/storage.json"));
        assert_eq!(config.paths.process_name, "Editor");
        assert!(config.paths.device_id.starts_with("/home/tester"));
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_toml_str("addyApiKey = ", Path::new("/home/tester"));
        assert!(matches!(result, Err(RefresherError::ConfigParse(_))));
    }

    #[test]
    fn test_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }
}
