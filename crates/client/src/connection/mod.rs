/// 连接模块
///
/// 客户端与聊天服务端之间唯一的 WebSocket 连接：状态机、退避和异步驱动

pub mod backoff;
pub mod manager;
pub mod state;

pub use backoff::BackoffPolicy;
pub use manager::{ConnectionConfig, ConnectionHandle, ConnectionManager, UiEvent};
