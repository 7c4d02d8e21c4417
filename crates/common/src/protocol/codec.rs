/// WebSocket 帧编解码辅助函数

use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::debug;

/// 编码出站文本为 WebSocket 消息
pub fn encode(text: impl Into<String>) -> WsMessage {
    WsMessage::Text(text.into())
}

/// 入站帧分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// 需要渲染的文本
    Text(String),
    /// 对端关闭
    Close,
    /// 控制帧，忽略
    Ignored,
}

/// 解码 WebSocket 消息
///
/// 二进制帧按 UTF-8 有损转换，控制帧不产生消息
pub fn decode(ws_msg: WsMessage) -> InboundFrame {
    match ws_msg {
        WsMessage::Text(text) => InboundFrame::Text(text),
        WsMessage::Binary(data) => InboundFrame::Text(String::from_utf8_lossy(&data).into_owned()),
        WsMessage::Close(frame) => {
            debug!("收到关闭帧: {:?}", frame);
            InboundFrame::Close
        }
        _ => InboundFrame::Ignored,
    }
}
