/// addy.io 别名 API 客户端
///
/// `AliasApi` 是别名轮换流程与 HTTP 之间的接缝，测试中可替换为内存实现。
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use super::{Alias, AliasId, NewAlias};
use crate::utils::{RefresherError, Result};

/// 每次列表请求的条数（只取一页）
pub const PAGE_SIZE: u32 = 100;

/// 别名服务接口
///
/// 删除操作会被并行调用，因此要求 `Sync`。
pub trait AliasApi: Sync {
    /// 按描述搜索别名
    fn list_aliases(&self, search: &str) -> Result<Vec<Alias>>;

    /// 删除单个别名
    fn delete_alias(&self, id: &AliasId) -> Result<()>;

    /// 创建别名，返回响应体
    fn create_alias(&self, request: &NewAlias) -> Result<Value>;
}

impl<T: AliasApi + ?Sized> AliasApi for &T {
    fn list_aliases(&self, search: &str) -> Result<Vec<Alias>> {
        (**self).list_aliases(search)
    }

    fn delete_alias(&self, id: &AliasId) -> Result<()> {
        (**self).delete_alias(id)
    }

    fn create_alias(&self, request: &NewAlias) -> Result<Value> {
        (**self).create_alias(request)
    }
}

#[derive(Debug, Deserialize)]
struct AliasList {
    #[serde(default)]
    data: Vec<Alias>,
}

/// 基于 reqwest 阻塞客户端的实现
#[derive(Debug, Clone)]
pub struct AddyClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AddyClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
    }

    fn alias_url(&self, id: &AliasId) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// GET <base>?filter[search]=<search>&page[size]=100
    fn list_request(&self, search: &str) -> RequestBuilder {
        let page_size = PAGE_SIZE.to_string();
        self.authorize(self.client.get(&self.base_url))
            .query(&[("filter[search]", search), ("page[size]", page_size.as_str())])
    }

    /// DELETE <base>/<id>
    fn delete_request(&self, id: &AliasId) -> RequestBuilder {
        self.authorize(self.client.delete(self.alias_url(id)))
    }

    /// POST <base>，JSON 请求体
    fn create_request(&self, request: &NewAlias) -> RequestBuilder {
        self.authorize(self.client.post(&self.base_url)).json(request)
    }
}

/// 非 2xx 响应转为错误
fn ensure_success(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(RefresherError::ExternalService {
        status: status.as_u16(),
        url: url.to_string(),
        body,
    })
}

impl AliasApi for AddyClient {
    fn list_aliases(&self, search: &str) -> Result<Vec<Alias>> {
        let response = self.list_request(search).send()?;

        let list: AliasList = ensure_success(&self.base_url, response)?.json()?;
        tracing::debug!(count = list.data.len(), "aliases listed");
        Ok(list.data)
    }

    fn delete_alias(&self, id: &AliasId) -> Result<()> {
        let url = self.alias_url(id);
        let response = self.delete_request(id).send()?;
        ensure_success(&url, response)?;
        tracing::debug!(alias = %id, "alias deleted");
        Ok(())
    }

    fn create_alias(&self, request: &NewAlias) -> Result<Value> {
        let response = self.create_request(request).send()?;

        Ok(ensure_success(&self.base_url, response)?.json()?)
    }
}
