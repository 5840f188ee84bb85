use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

// 资源状态，序列化为小写（与池管理器的线上格式一致）
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceState {
    Free,
    Dirty,
    Cleaning,
    Busy,
    Leased,
}

// 池管理器中的一个可租借资源。janitor 只在一个周期内持有它的临时视图，
// 所有权和状态的事实来源始终是池管理器。
#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub r#type: String,
    pub name: String,
    pub state: ResourceState,
    #[serde(default)]
    pub owner: String,
    #[serde(rename = "lastupdate", default)]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(rename = "userdata", default)]
    pub user_data: UserData,
}

// 资源携带的不透明键值对（区域、工作区 ID、密钥等）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserData(HashMap<String, String>);

// user data 中的区域键
const ZONE_KEY: &str = "zone";

impl UserData {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    // 解析资源所在的区域，缺失时返回分类错误
    pub fn zone(&self) -> Result<&str> {
        self.get(ZONE_KEY).ok_or(Error::MissingUserData(ZONE_KEY))
    }
}

impl<const N: usize> From<[(&str, &str); N]> for UserData {
    fn from(pairs: [(&str, &str); N]) -> Self {
        UserData(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
