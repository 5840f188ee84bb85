use std::sync::LazyLock;

macro_rules! env_config {
    ($name:ident, $env_key:expr, $default:expr) => {
        paste::paste! {
            pub static [<CLEANDE_ $name>]: ::std::sync::LazyLock<&'static str> = ::std::sync::LazyLock::new(|| {
                ::std::boxed::Box::leak(
                    ::std::env::var($env_key)
                        .unwrap_or_else(|_| $default.to_string())
                        .into_boxed_str()
                )
            });
        }
    };
    ($name:ident, $default:expr) => {
        env_config!($name, stringify!([<CLEANDE_ $name>]), $default);
    };
}

// 空闲暂停秒数（某类型没有脏资源时）
env_config!(SLEEP_SECS, "300");
// 云服务商计划维护事件通知源的地址
env_config!(
    EVENTS_URL,
    "https://api.softlayer.com/rest/v3.1/SoftLayer_Notification_Occurrence_Event/getAllObjects.json"
);

pub static SLEEP_SECS: LazyLock<u64> = LazyLock::new(|| {
    CLEANDE_SLEEP_SECS
        .parse::<u64>()
        .expect("Invalid CLEANDE_SLEEP_SECS value")
});
