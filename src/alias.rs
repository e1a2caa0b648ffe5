/// 邮箱别名轮换模块
///
/// 删除描述以指定前缀开头的全部别名，然后创建一个新别名并返回其地址。
pub mod client;

use std::fmt;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::config::AliasSettings;
use crate::utils::{RefresherError, Result};

pub use client::{AddyClient, AliasApi, PAGE_SIZE};

/// 别名 ID（服务端可能返回字符串或数字）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasId {
    Number(u64),
    Text(String),
}

impl fmt::Display for AliasId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasId::Number(n) => write!(f, "{}", n),
            AliasId::Text(s) => f.write_str(s),
        }
    }
}

/// 服务端别名记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub id: AliasId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// 其余字段原样保留
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 创建别名的请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAlias {
    pub domain: String,
    pub description: String,
    pub format: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipient_ids: Vec<String>,
}

impl NewAlias {
    pub fn from_settings(settings: &AliasSettings) -> Self {
        Self {
            domain: settings.alias_domain.clone(),
            description: settings.alias_description.clone(),
            format: settings.alias_format.clone(),
            recipient_ids: settings.recipient_ids.clone(),
        }
    }
}

/// 从创建响应中取出 `data.email`，缺失时为空字符串
pub fn created_email(response: &Value) -> String {
    response
        .get("data")
        .and_then(|data| data.get("email"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

/// 邮箱别名管理器
pub struct EmailAliasManager<A: AliasApi> {
    settings: AliasSettings,
    api: A,
}

impl EmailAliasManager<AddyClient> {
    /// 使用 addy.io 客户端创建
    ///
    /// 未配置 API key 时直接返回错误，不会发出任何请求。
    pub fn connect(settings: AliasSettings) -> Result<Self> {
        ensure_api_key(&settings)?;
        let api = AddyClient::new(&settings.addy_api_url, &settings.addy_api_key);
        Ok(Self { settings, api })
    }
}

impl<A: AliasApi> EmailAliasManager<A> {
    pub fn with_api(settings: AliasSettings, api: A) -> Self {
        Self { settings, api }
    }

    /// 轮换别名，返回新地址
    pub fn refresh(&self) -> Result<String> {
        ensure_api_key(&self.settings)?;

        let deleted = self.delete_existing_aliases()?;
        tracing::info!(deleted, "existing aliases removed");

        self.create_new_alias()
    }

    /// 下一次轮换会删除的别名
    pub fn matching_aliases(&self) -> Result<Vec<Alias>> {
        ensure_api_key(&self.settings)?;

        let prefix = self.settings.alias_description.as_str();
        let aliases = self.api.list_aliases(prefix)?;

        Ok(aliases
            .into_iter()
            .filter(|alias| {
                alias
                    .description
                    .as_deref()
                    .is_some_and(|desc| desc.starts_with(prefix))
            })
            .collect())
    }

    /// 并行删除所有匹配别名
    ///
    /// 等待全部删除结束后再返回第一个失败；已删除的不会回滚。
    fn delete_existing_aliases(&self) -> Result<usize> {
        let aliases = self.matching_aliases()?;

        let results: Vec<Result<()>> = aliases
            .par_iter()
            .map(|alias| self.api.delete_alias(&alias.id))
            .collect();

        let count = results.len();
        results.into_iter().collect::<Result<Vec<()>>>()?;
        Ok(count)
    }

    fn create_new_alias(&self) -> Result<String> {
        let request = NewAlias::from_settings(&self.settings);
        let response = self.api.create_alias(&request)?;
        let email = created_email(&response);

        if email.is_empty() {
            tracing::warn!("create response did not include an email");
        }
        Ok(email)
    }
}

fn ensure_api_key(settings: &AliasSettings) -> Result<()> {
    if settings.addy_api_key.trim().is_empty() {
        return Err(RefresherError::Config("Addy.io API key is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alias_id_accepts_number_and_string() {
        let a: Alias = serde_json::from_value(json!({"id": 1, "email": "a@x"})).unwrap();
        let b: Alias = serde_json::from_value(json!({"id": "uuid-1", "active": true})).unwrap();

        assert_eq!(a.id, AliasId::Number(1));
        assert_eq!(b.id.to_string(), "uuid-1");
        assert_eq!(a.email.as_deref(), Some("a@x"));
        assert_eq!(b.email, None);
        assert_eq!(b.extra.get("active"), Some(&json!(true)));
    }

    #[test]
    fn test_null_email_in_listing_is_accepted() {
        let aliases: Vec<Alias> = serde_json::from_str(
            r#"[{"id":"a","email":null,"description":"cursor-x"},{"id":2,"email":"b@x"}]"#,
        )
        .unwrap();

        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases[0].email, None);
        assert_eq!(aliases[0].description.as_deref(), Some("cursor-x"));
    }

    #[test]
    fn test_new_alias_omits_empty_recipients() {
        let mut settings = AliasSettings::default();
        let body = serde_json::to_value(NewAlias::from_settings(&settings)).unwrap();
        assert_eq!(body, json!({"domain": "anonaddy.me", "description": "cursor", "format": "uuid"}));

        settings.recipient_ids = vec!["r1".to_string()];
        let body = serde_json::to_value(NewAlias::from_settings(&settings)).unwrap();
        assert_eq!(body["recipient_ids"], json!(["r1"]));
    }

    #[test]
    fn test_created_email() {
        assert_eq!(created_email(&json!({"data": {"email": "new@anonaddy.me"}})), "new@anonaddy.me");
        assert_eq!(created_email(&json!({"data": {}})), "");
        assert_eq!(created_email(&json!({})), "");
    }

    #[test]
    fn test_connect_requires_api_key() {
        let result = EmailAliasManager::connect(AliasSettings::default());
        assert!(matches!(result, Err(RefresherError::Config(_))));
    }
}
