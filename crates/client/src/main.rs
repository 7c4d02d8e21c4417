/// Agent Chat - Client
///
/// 终端聊天客户端：选择 AI Agent 聊天，发起多 Agent 辩论和聊天室，
/// 与服务端保持一条自动重连的 WebSocket 连接

use tracing::info;

mod config;
mod connection;
mod console;
mod ui;

use connection::{ConnectionConfig, ConnectionManager};
use console::Console;
use ui::ChatView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置
    dotenvy::dotenv().ok();
    let cfg = config::Config::from_env()?;

    // 初始化日志（输出到 stderr，避免与聊天记录混在一起）
    // 可以通过环境变量 RUST_LOG 设置日志级别，例如：
    // RUST_LOG=client=debug cargo run
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level)),
        )
        .init();

    info!("🚀 启动 Agent Chat 客户端...");
    info!("✅ 配置加载成功");

    // 创建连接管理器
    let (manager, handle, updates) = ConnectionManager::new(ConnectionConfig {
        url: cfg.server_ws_url.clone(),
        connect_timeout: cfg.connect_timeout(),
        backoff: cfg.backoff_policy(),
    });

    info!("🎯 连接到 Server: {}", cfg.server_ws_url);

    // 运行连接管理器（会自动重连）
    let manager_task = tokio::spawn(manager.run());

    Console::new(ChatView::new(cfg.local_echo), handle, updates)
        .run()
        .await?;

    manager_task.await?;

    Ok(())
}
