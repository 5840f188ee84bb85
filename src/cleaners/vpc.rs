use async_trait::async_trait;
use log::debug;

use super::{API_KEY_KEY, Cleaner, CleanupRequest, Outcome};
use crate::errors::Result;

pub const RESOURCE_TYPE: &str = "vpc-service";

// 上一个租用者遗留的作业标记
const JOB_KEY: &str = "job-id";

// VPC 资源不绑定维护敏感的区域，清理只需要清除租约期间的痕迹。
pub struct VpcService;

impl VpcService {
    pub fn new() -> Self {
        VpcService
    }
}

#[async_trait]
impl Cleaner for VpcService {
    async fn clean(&self, request: &mut CleanupRequest<'_>) -> Result<Outcome> {
        let options = request.options;
        let resource = &mut request.resource;

        if !options.ignore_api_key && resource.user_data.remove(API_KEY_KEY).is_some() {
            debug!("Dropped the leased API key of {}", resource.name);
        }
        if resource.user_data.remove(JOB_KEY).is_some() {
            debug!("Dropped the stale job marker of {}", resource.name);
        }

        Ok(Outcome::Cleaned)
    }
}
