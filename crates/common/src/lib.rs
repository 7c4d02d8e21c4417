/// Agent Chat - 公共库
///
/// 提供客户端共享的类型、错误处理、协议编解码和工具函数

pub mod errors;
pub mod models;
pub mod protocol;
pub mod utils;

// 重新导出常用类型
pub use errors::{Error, Result};
pub use models::{Agent, ChatMessage, ConnectionStatus, MessageKind};
pub use protocol::{InboundEnvelope, OutboundCommand};
