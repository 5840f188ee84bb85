use crate::cli::Args;

pub fn run(args: &Args) {
    println!("Running health check...");
    let endpoint = args.url.trim_end_matches('/');
    println!("Health check endpoint: {endpoint}");
    // 用 HTTP 客户端探测池管理器是否可达
    match minreq::get(endpoint).with_timeout(1).send() {
        Ok(resp) => {
            let status_code = resp.status_code;

            // 服务端错误视为不健康，使用错误码退出程序
            if status_code >= 500 {
                eprintln!("Health check failed with status: {status_code}");
                std::process::exit(1);
            } else {
                println!("Health check passed");
            }
        }
        Err(e) => {
            eprintln!("Health check failed: {e}");
            std::process::exit(1);
        }
    }
}
