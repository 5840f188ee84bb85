pub mod healthcheck;

use std::{path::PathBuf, time::Duration};

use clap::Parser;

#[derive(Parser, Debug)]
pub struct Args {
    // 池管理器的地址
    #[arg(long)]
    pub url: String,
    // 访问池管理器的用户名
    #[arg(long)]
    pub username: Option<String>,
    // 访问池管理器的密码文件路径
    #[arg(long)]
    pub password_file: Option<PathBuf>,
    // 需要清理的资源类型（逗号分隔），留空则使用内置默认
    #[arg(long, value_delimiter = ',')]
    pub resource_type: Vec<String>,
    #[arg(long, default_value = "info")]
    pub log_level: String,
    // 输出云服务商客户端的调试信息
    #[arg(long,action = clap::ArgAction::SetTrue)]
    pub debug: bool,
    // 跳过 API 密钥的清理和轮换
    #[arg(long,action = clap::ArgAction::SetTrue)]
    pub ignore_api_key: bool,
    // 释放前检查数据中心的计划维护窗口
    #[arg(long,action = clap::ArgAction::SetTrue)]
    pub check_maintenance: bool,
    // 维护窗口前后的缓冲时长（如 4h、30m、90s）
    #[arg(long, default_value = "4h", value_parser = parse_duration)]
    pub additional_time: Duration,
    #[arg(long,action = clap::ArgAction::SetTrue)]
    pub healthcheck: bool,
}

// 解析 4h / 30m / 90s 形式的时长，纯数字按秒处理
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let (value, multiplier) = match s.strip_suffix(['h', 'm', 's']) {
        Some(value) => {
            let multiplier = match s.as_bytes()[s.len() - 1] {
                b'h' => 3600,
                b'm' => 60,
                _ => 1,
            };
            (value, multiplier)
        }
        None => (s, 1),
    };
    let value: u64 = value
        .parse()
        .map_err(|_| format!("invalid duration: {s}, expected forms like 4h, 30m or 90s"))?;

    Ok(Duration::from_secs(value * multiplier))
}
