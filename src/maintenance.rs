use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::Deserialize;

use crate::errors::Result;

// 计划维护事件的查询窗口：now 前后各 7 天
const WINDOW_DAYS: i64 = 7;

// 通知源返回的计划维护事件（只读，每次检查重新拉取，从不持久化）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceEvent {
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub subject: String,
    #[serde(rename = "statusCode")]
    pub status: KeyName,
    #[serde(rename = "notificationOccurrenceEventType")]
    pub event_type: KeyName,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyName {
    pub key_name: String,
}

// 维护窗口裁决：只读取、只判断，从不修改资源或事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    // 当前可以安全释放
    Safe,
    // 处于某个事件的危险区间内，应推迟释放
    Blocked { reason: String },
}

// 云服务商通知源的客户端
#[derive(Clone)]
pub struct NotificationFeed {
    client: reqwest::Client,
    endpoint: String,
}

impl NotificationFeed {
    pub fn new(endpoint: &str) -> Self {
        NotificationFeed {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    // 查询与指定服务和区域相关的已发布计划维护事件。
    // 查询本身失败是普通错误，调用方不得把「无法确定」当成安全或推迟。
    pub async fn planned_events(
        &self,
        service_tag: &str,
        zone: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<MaintenanceEvent>> {
        let filter = build_filter(service_tag, now);
        let events = self
            .client
            .get(&self.endpoint)
            .query(&[("objectMask", object_mask()), ("objectFilter", filter.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<MaintenanceEvent>>()
            .await?;

        // 通知源按主题过滤服务标签，区域在本地过滤
        let events: Vec<MaintenanceEvent> = events
            .into_iter()
            .filter(|event| event.subject.contains(zone))
            .collect();
        debug!(
            "Found {} planned maintenance event(s) for {service_tag} in zone {zone}",
            events.len()
        );
        for event in &events {
            debug!(
                "{} event {:?}: {} - {:?} ({})",
                event.event_type.key_name,
                event.subject,
                event.start_date,
                event.end_date,
                event.status.key_name
            );
        }

        Ok(events)
    }
}

fn object_mask() -> &'static str {
    "mask[endDate,startDate,statusCode[keyName],notificationOccurrenceEventType[keyName],subject]"
}

// 构造通知源的查询过滤器：计划类、已发布、主题包含服务标签、开始时间在 ±7 天内
fn build_filter(service_tag: &str, now: DateTime<Utc>) -> String {
    let window = Duration::days(WINDOW_DAYS);
    serde_json::json!({
        "notificationOccurrenceEventType": {
            "keyName": { "operation": "PLANNED" }
        },
        "statusCode": {
            "keyName": { "operation": "PUBLISHED" }
        },
        "subject": { "operation": format!("*= {service_tag}") },
        "startDate": {
            "operation": "betweenDate",
            "options": [
                { "name": "startDate", "value": [(now - window).to_rfc3339()] },
                { "name": "endDate", "value": [(now + window).to_rfc3339()] }
            ]
        }
    })
    .to_string()
}

// 判断 now 是否落入任意事件的危险区间 [start - buffer, start + buffer]（边界含）
pub fn decide(events: &[MaintenanceEvent], now: DateTime<Utc>, buffer: Duration) -> Verdict {
    for event in events {
        let opens = event.start_date - buffer;
        let closes = event.start_date + buffer;
        if now >= opens && now <= closes {
            return Verdict::Blocked {
                reason: format!(
                    "data center is scheduled for planned maintenance: {} (starts at {})",
                    event.subject, event.start_date
                ),
            };
        }
    }

    Verdict::Safe
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(start_date: DateTime<Utc>, subject: &str) -> MaintenanceEvent {
        MaintenanceEvent {
            start_date,
            end_date: None,
            subject: subject.to_string(),
            status: KeyName {
                key_name: "PUBLISHED".to_string(),
            },
            event_type: KeyName {
                key_name: "PLANNED".to_string(),
            },
        }
    }

    #[test]
    fn test_decide_blocks_on_start_boundary() {
        let now = Utc::now();
        // now 恰好等于事件开始时间，处于 [start - 4h, start + 4h] 之内
        let events = vec![event(now, "PowerVS dal12 maintenance")];
        assert!(matches!(
            decide(&events, now, Duration::hours(4)),
            Verdict::Blocked { .. }
        ));
    }

    #[test]
    fn test_decide_blocks_on_interval_edges() {
        let now = Utc::now();
        // 危险区间的两端都是含边界的
        let opening = vec![event(now + Duration::hours(4), "PowerVS dal12")];
        let closing = vec![event(now - Duration::hours(4), "PowerVS dal12")];
        assert!(matches!(
            decide(&opening, now, Duration::hours(4)),
            Verdict::Blocked { .. }
        ));
        assert!(matches!(
            decide(&closing, now, Duration::hours(4)),
            Verdict::Blocked { .. }
        ));
    }

    #[test]
    fn test_decide_safe_outside_interval() {
        let now = Utc::now();
        // 事件在 10 小时后开始，now 在 [start - 4h, start + 4h] 之外
        let events = vec![event(now + Duration::hours(10), "PowerVS dal12")];
        assert_eq!(decide(&events, now, Duration::hours(4)), Verdict::Safe);
    }

    #[test]
    fn test_decide_safe_without_events() {
        assert_eq!(decide(&[], Utc::now(), Duration::hours(4)), Verdict::Safe);
    }

    #[test]
    fn test_build_filter() {
        let now = Utc::now();
        let filter = build_filter("PowerVS", now);
        assert!(filter.contains("PLANNED"));
        assert!(filter.contains("PUBLISHED"));
        assert!(filter.contains("*= PowerVS"));
        assert!(filter.contains("betweenDate"));
    }

    #[tokio::test]
    async fn test_feed_failure_is_a_generic_error() {
        // 通知源不可达时必须报错，不得当成「安全」或「推迟」
        let feed = NotificationFeed::new("http://127.0.0.1:1");
        let result = feed.planned_events("PowerVS", "dal12", Utc::now()).await;
        assert!(matches!(result, Err(crate::errors::Error::Http(_))));
    }

    #[test]
    fn test_event_decoding() {
        // 通知源的事件 JSON（camelCase，嵌套 keyName）
        let json = r#"{
            "startDate": "2026-05-03T22:00:00Z",
            "endDate": "2026-05-04T02:00:00Z",
            "subject": "PowerVS planned maintenance in dal12",
            "statusCode": { "keyName": "PUBLISHED" },
            "notificationOccurrenceEventType": { "keyName": "PLANNED" }
        }"#;
        let event: MaintenanceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.status.key_name, "PUBLISHED");
        assert_eq!(event.event_type.key_name, "PLANNED");
        assert!(event.subject.contains("dal12"));
    }
}
