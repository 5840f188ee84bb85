use tracing_subscriber::EnvFilter;

use crate::{errors::Result, fail};

// 初始化日志：RUST_LOG 优先于 --log-level
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| fail!("invalid log level {level}: {e}"))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    Ok(())
}
