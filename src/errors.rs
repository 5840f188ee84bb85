pub type Result<T> = std::result::Result<T, Error>;

// 错误分类约定：
//  - ResourceNotFound: 没有脏资源可取，属于预期的空闲状态（暂停后继续）
//  - Acquire/Clean/Update/Release: 包装某个资源上的致命失败（进程退出，由外部重启）
//  - 维护窗口导致的推迟不是错误，见 cleaners::Outcome::Deferred

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // 池管理器中没有对应类型的脏资源
    #[error("no dirty resource of the requested type is available")]
    ResourceNotFound,
    // 池管理器返回了非预期的状态码
    #[error("pool manager responded with status {status}: {message}")]
    PoolApi { status: u16, message: String },
    // 资源缺少必要的 user data 字段
    #[error("resource is missing required user data: {0}")]
    MissingUserData(&'static str),
    // 配置了未注册的资源类型
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),
    // 获取脏资源失败
    #[error("failed to acquire a dirty resource of type {rtype}: {source}")]
    Acquire {
        rtype: String,
        #[source]
        source: Box<Error>,
    },
    // 清理资源失败
    #[error("failed to clean resource {name}: {source}")]
    Clean {
        name: String,
        #[source]
        source: Box<Error>,
    },
    // 更新资源失败
    #[error("failed to update resource {name}: {source}")]
    Update {
        name: String,
        #[source]
        source: Box<Error>,
    },
    // 释放资源失败
    #[error("failed to release resource {name}: {source}")]
    Release {
        name: String,
        #[source]
        source: Box<Error>,
    },
    // 内部通用错误
    #[error("internal error: {0}")]
    Internal(String),
    // 包装 reqwest::Error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    // 包装 std::io::Error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    // 包装 serde_json::Error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    // 包装 strum::ParseError（非法的资源状态字符串）
    #[error("state parse error: {0}")]
    ParseState(#[from] strum::ParseError),
}

impl Error {
    // 判断是否是「无脏资源」的预期情况
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ResourceNotFound)
    }
}

#[macro_export]
macro_rules! fail {
    ($msg:expr) => {
        $crate::errors::Error::Internal(format!($msg))
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::errors::Error::Internal(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! err {
    ($msg:expr) => {
        Err($crate::fail!($msg))
    };
    ($fmt:expr, $($arg:tt)*) => {
        Err($crate::fail!($fmt, $($arg)*))
    };
}
