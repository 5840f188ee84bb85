use std::time::Duration;

use async_trait::async_trait;

use crate::{
    errors::{Error, Result},
    maintenance::NotificationFeed,
    models::Resource,
};

pub mod powervs;
pub mod vpc;

// 未配置资源类型时采用的默认列表
pub const DEFAULT_RESOURCE_TYPES: [&str; 2] = [powervs::RESOURCE_TYPE, vpc::RESOURCE_TYPE];

// user data 中随租约下发的 API 密钥
const API_KEY_KEY: &str = "api-key";

// 启动时构造一次，按引用传入循环和清理器（核心逻辑不读取全局状态）
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    pub debug: bool,
    pub ignore_api_key: bool,
    pub check_maintenance: bool,
    pub additional_time: Duration,
}

// 一次清理的临时输入：获取到的资源加上运行期选项。
// 每次 acquire 创建一个，周期结束即丢弃。
pub struct CleanupRequest<'a> {
    pub resource: Resource,
    pub options: &'a CleanupOptions,
}

impl<'a> CleanupRequest<'a> {
    pub fn new(resource: Resource, options: &'a CleanupOptions) -> Self {
        CleanupRequest { resource, options }
    }
}

// 清理的结构化结果。推迟不是失败：它表示「当前释放不安全」这一明确裁决，
// 调用方按枚举分支处理，而不是检查错误文本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Cleaned,
    Deferred { reason: String },
}

// 每种资源类型对应一个清理器变体。实现必须允许在部分失败后重新执行
//（循环可能再次取到同一个脏资源）。
#[async_trait]
pub trait Cleaner: Send + Sync {
    async fn clean(&self, request: &mut CleanupRequest<'_>) -> Result<Outcome>;
}

// 按配置顺序建立类型到清理器的映射，未知类型在启动时立即失败
pub fn registry(
    types: &[String],
    feed: &NotificationFeed,
) -> Result<Vec<(String, Box<dyn Cleaner>)>> {
    let mut cleaners: Vec<(String, Box<dyn Cleaner>)> = Vec::new();
    for rtype in types {
        let cleaner: Box<dyn Cleaner> = match rtype.as_str() {
            powervs::RESOURCE_TYPE => Box::new(powervs::PowerVsWorkspace::new(feed.clone())),
            vpc::RESOURCE_TYPE => Box::new(vpc::VpcService::new()),
            _ => return Err(Error::UnknownResourceType(rtype.clone())),
        };
        cleaners.push((rtype.clone(), cleaner));
    }

    Ok(cleaners)
}
