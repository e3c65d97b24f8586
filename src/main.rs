// ==========================================
// 表管理工具 - 命令行主入口
// ==========================================
// 启动: .env → 日志 → 配置（缺失即退出）→ 表存储 → 执行命令
// ==========================================

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use table_admin::app::{dispatch, AppState, Cli, ErrorResponse};
use table_admin::config::{AppConfig, ConfigError};
use table_admin::{i18n, logging};

fn fatal(code: &str, message: String) -> ExitCode {
    let response = ErrorResponse {
        code: code.to_string(),
        message: message.clone(),
        details: None,
    };
    eprintln!(
        "{}",
        serde_json::to_string(&response).unwrap_or(message)
    );
    ExitCode::FAILURE
}

fn load_config(cli: &Cli) -> Result<AppConfig, ConfigError> {
    AppConfig::from_env(cli.local_db.as_deref())
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env 不存在时忽略
    dotenv::dotenv().ok();

    // 初始化日志系统
    logging::init();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "配置加载失败");
            return fatal("CONFIG_ERROR", e.to_string());
        }
    };

    i18n::set_locale(&config.locale);
    tracing::debug!(version = table_admin::VERSION, locale = %i18n::current_locale(), "{}", table_admin::APP_NAME);

    let state = match AppState::new(&config).context("无法初始化表存储") {
        Ok(state) => state,
        Err(e) => return fatal("TRANSPORT_FAILURE", format!("{:#}", e)),
    };

    match dispatch(&state, cli.command).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(error_json) => {
            eprintln!("{}", error_json);
            ExitCode::FAILURE
        }
    }
}
