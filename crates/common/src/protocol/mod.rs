/// 聊天协议模块
///
/// 一帧文本即一个逻辑单元：出站为纯文本命令，入站为 JSON 对象或原始文本

pub mod codec;
pub mod command;
pub mod message;

pub use command::OutboundCommand;
pub use message::{decode_frame, InboundEnvelope};
