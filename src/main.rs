use std::time::Duration;

use clap::Parser;
use log::{error, info};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    cleaners::{CleanupOptions, DEFAULT_RESOURCE_TYPES},
    cli::Args,
    errors::Result,
    janitor::Janitor,
    maintenance::NotificationFeed,
    pool::PoolClient,
    vars::{CLEANDE_EVENTS_URL, SLEEP_SECS},
};

mod cleaners;
mod cli;
mod errors;
mod janitor;
mod logger;
mod maintenance;
mod models;
mod pool;
mod vars;

// 向池管理器标识自己的名字
const OWNER: &str = "cleande";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if args.healthcheck {
        cli::healthcheck::run(&args);
    } else {
        janitor_serve(args).await?;
    }

    Ok(())
}

async fn janitor_serve(args: Args) -> Result<()> {
    // Initialize the logger
    logger::init(&args.log_level)?;
    // Set up the application environment variables
    env_setup().await?;

    let mut resource_types = args.resource_type.clone();
    if resource_types.is_empty() {
        info!(
            "--resource-type is empty! Setting it to the defaults: {}",
            DEFAULT_RESOURCE_TYPES.join(", ")
        );
        resource_types = DEFAULT_RESOURCE_TYPES
            .iter()
            .map(|t| t.to_string())
            .collect();
    }

    // 启动时构造全部协作者：池客户端、通知源、清理器注册表
    let pool = PoolClient::new(
        OWNER,
        &args.url,
        args.username.as_deref(),
        args.password_file.as_deref(),
    )?;
    let feed = NotificationFeed::new(*CLEANDE_EVENTS_URL);
    let options = CleanupOptions {
        debug: args.debug,
        ignore_api_key: args.ignore_api_key,
        check_maintenance: args.check_maintenance,
        additional_time: args.additional_time,
    };
    // 未知的资源类型在这里立即失败，而不是等到第一次 acquire
    let cleaners = cleaners::registry(&resource_types, &feed)?;
    let janitor = Janitor::new(pool, cleaners, options, Duration::from_secs(*SLEEP_SECS));

    // 停止信号通过令牌传入循环
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            info!("Shutdown signal received");
            shutdown.cancel();
        });
    }

    info!(
        "Janitor started at {}, managing resource types: {}",
        args.url,
        resource_types.join(", ")
    );
    if let Err(e) = janitor.run(shutdown).await {
        // 不可恢复的失败：记录并退出，由外部监督进程重启
        error!("Janitor failure: {e}");
        std::process::exit(1);
    }

    Ok(())
}

async fn env_setup() -> Result<()> {
    // Load environment variables from .env file if it exists
    if dotenvy::dotenv().is_ok() {
        info!("loaded .env file");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
