use async_trait::async_trait;
use chrono::{Duration, Utc};
use log::{debug, info};

use super::{API_KEY_KEY, Cleaner, CleanupRequest, Outcome};
use crate::{
    errors::Result,
    fail,
    maintenance::{self, NotificationFeed, Verdict},
};

pub const RESOURCE_TYPE: &str = "powervs-service";

// 通知源主题中标识该服务族的标签
const SERVICE_TAG: &str = "PowerVS";

// PowerVS 工作区绑定在具体的数据中心区域上，释放前需要确认
// 该区域没有临近的计划维护（避免清理与维护窗口互相干扰）。
pub struct PowerVsWorkspace {
    feed: NotificationFeed,
}

impl PowerVsWorkspace {
    pub fn new(feed: NotificationFeed) -> Self {
        PowerVsWorkspace { feed }
    }
}

#[async_trait]
impl Cleaner for PowerVsWorkspace {
    async fn clean(&self, request: &mut CleanupRequest<'_>) -> Result<Outcome> {
        let options = request.options;
        let resource = &mut request.resource;
        let zone = resource.user_data.zone()?.to_string();

        if options.debug {
            let keys: Vec<&str> = resource.user_data.keys().collect();
            debug!("User data keys of {}: {keys:?}", resource.name);
        }

        if options.check_maintenance {
            let now = Utc::now();
            let buffer = Duration::from_std(options.additional_time)
                .map_err(|e| fail!("invalid additional time: {e}"))?;
            let events = self.feed.planned_events(SERVICE_TAG, &zone, now).await?;
            if let Verdict::Blocked { reason } = maintenance::decide(&events, now, buffer) {
                return Ok(Outcome::Deferred { reason });
            }
            info!(
                "PowerVS workspace maintenance check is completed and resource {} can be released",
                resource.name
            );
        }

        // 丢弃随租约下发的 API 密钥，下一个租用者必须重新签发
        if !options.ignore_api_key && resource.user_data.remove(API_KEY_KEY).is_some() {
            debug!("Dropped the leased API key of {}", resource.name);
        }

        Ok(Outcome::Cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Resource, ResourceState, UserData};
    use std::time::Duration as StdDuration;

    fn options(check_maintenance: bool, ignore_api_key: bool) -> crate::cleaners::CleanupOptions {
        crate::cleaners::CleanupOptions {
            debug: false,
            ignore_api_key,
            check_maintenance,
            additional_time: StdDuration::from_secs(4 * 3600),
        }
    }

    fn workspace_resource() -> Resource {
        Resource {
            r#type: RESOURCE_TYPE.to_string(),
            name: "powervs-01".to_string(),
            state: ResourceState::Cleaning,
            owner: "cleande".to_string(),
            last_update: None,
            user_data: UserData::from([("zone", "dal12"), ("api-key", "k-123")]),
        }
    }

    fn cleaner() -> PowerVsWorkspace {
        // 维护检查关闭时通知源不会被访问
        PowerVsWorkspace::new(NotificationFeed::new("http://localhost:0"))
    }

    #[tokio::test]
    async fn test_clean_scrubs_api_key() {
        let options = options(false, false);
        let mut request = CleanupRequest::new(workspace_resource(), &options);
        let outcome = cleaner().clean(&mut request).await.unwrap();
        assert_eq!(outcome, Outcome::Cleaned);
        assert_eq!(request.resource.user_data.get("api-key"), None);
        // 区域信息保留，资源回到池中后仍可定位
        assert_eq!(request.resource.user_data.zone().unwrap(), "dal12");
    }

    #[tokio::test]
    async fn test_clean_keeps_api_key_when_ignored() {
        let options = options(false, true);
        let mut request = CleanupRequest::new(workspace_resource(), &options);
        let outcome = cleaner().clean(&mut request).await.unwrap();
        assert_eq!(outcome, Outcome::Cleaned);
        assert_eq!(request.resource.user_data.get("api-key"), Some("k-123"));
    }

    #[tokio::test]
    async fn test_clean_requires_zone() {
        let options = options(false, false);
        let mut resource = workspace_resource();
        resource.user_data.remove("zone");
        let mut request = CleanupRequest::new(resource, &options);
        assert!(cleaner().clean(&mut request).await.is_err());
    }
}
