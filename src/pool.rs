use std::path::Path;

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;

use crate::{
    errors::{Error, Result},
    models::{Resource, ResourceState, UserData},
};

// 池管理器的三个操作。janitor 循环只依赖这个 trait，便于用假实现测试。
#[async_trait]
pub trait Pool {
    // 原子地将一个 from 状态的资源转移到 to 状态并取得其所有权
    async fn acquire(
        &self,
        rtype: &str,
        from: ResourceState,
        to: ResourceState,
    ) -> Result<Resource>;
    // 持久化资源的状态和 user data（不改变所有权）
    async fn update_one(
        &self,
        name: &str,
        state: ResourceState,
        user_data: &UserData,
    ) -> Result<()>;
    // 放弃所有权，将资源置为 dest 状态发布回池中
    async fn release_one(&self, name: &str, dest: ResourceState) -> Result<()>;
}

// 池管理器的 HTTP 客户端
pub struct PoolClient {
    client: reqwest::Client,
    base_url: String,
    owner: String,
    username: Option<String>,
    password: Option<String>,
}

impl PoolClient {
    pub fn new(
        owner: &str,
        base_url: &str,
        username: Option<&str>,
        password_file: Option<&Path>,
    ) -> Result<Self> {
        // 启动时读取一次密码文件
        let password = match password_file {
            Some(path) => Some(std::fs::read_to_string(path)?.trim().to_string()),
            None => None,
        };

        Ok(PoolClient {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            username: username.map(str::to_string),
            password,
        })
    }

    fn post(&self, path: &str, query: &[(&str, &str)]) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .post(format!("{}{path}", self.base_url))
            .query(query);
        if let Some(username) = &self.username {
            builder = builder.basic_auth(username, self.password.as_deref());
        }

        builder
    }
}

// 将非 2xx 响应映射为分类错误（404 是预期的「无脏资源」情况）
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(Error::ResourceNotFound);
    }

    Err(Error::PoolApi {
        status: status.as_u16(),
        message: resp.text().await.unwrap_or_default(),
    })
}

#[async_trait]
impl Pool for PoolClient {
    async fn acquire(
        &self,
        rtype: &str,
        from: ResourceState,
        to: ResourceState,
    ) -> Result<Resource> {
        let from = from.to_string();
        let to = to.to_string();
        let resp = self
            .post(
                "/acquire",
                &[
                    ("type", rtype),
                    ("state", from.as_str()),
                    ("dest", to.as_str()),
                    ("owner", self.owner.as_str()),
                ],
            )
            .send()
            .await?;
        let resource = check_status(resp).await?.json::<Resource>().await?;
        debug!("Acquired resource {} ({from} -> {to})", resource.name);

        Ok(resource)
    }

    async fn update_one(
        &self,
        name: &str,
        state: ResourceState,
        user_data: &UserData,
    ) -> Result<()> {
        let state = state.to_string();
        let resp = self
            .post(
                "/update",
                &[
                    ("name", name),
                    ("state", state.as_str()),
                    ("owner", self.owner.as_str()),
                ],
            )
            .json(user_data)
            .send()
            .await?;
        check_status(resp).await?;

        Ok(())
    }

    async fn release_one(&self, name: &str, dest: ResourceState) -> Result<()> {
        let dest = dest.to_string();
        let resp = self
            .post(
                "/release",
                &[
                    ("name", name),
                    ("dest", dest.as_str()),
                    ("owner", self.owner.as_str()),
                ],
            )
            .send()
            .await?;
        check_status(resp).await?;

        Ok(())
    }
}
