/// 入站消息定义

use serde::Deserialize;

use crate::models::{ChatMessage, SERVER_AUTHOR};
use crate::{Error, Result};

/// 入站消息信封
///
/// 服务端广播的结构化负载，两个字段都可缺省（`null` 视同缺省）
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct InboundEnvelope {
    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub content: Option<String>,
}

impl InboundEnvelope {
    /// 从 JSON 字符串解析，只接受 JSON 对象
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(Error::InvalidFrame(format!("期望 JSON 对象: {}", json)));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// 转换为待渲染消息，缺省作者为 `Server`，缺省内容为空
    pub fn into_message(self) -> ChatMessage {
        ChatMessage::new(
            self.author.unwrap_or_else(|| SERVER_AUTHOR.to_string()),
            self.content.unwrap_or_default(),
        )
    }
}

/// 解码一帧入站文本
///
/// 全函数：解析失败时整帧原样作为 `Server` 的消息内容
pub fn decode_frame(frame: &str) -> ChatMessage {
    match InboundEnvelope::from_json(frame) {
        Ok(envelope) => envelope.into_message(),
        Err(_) => ChatMessage::new(SERVER_AUTHOR, frame),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageKind;

    #[test]
    fn test_structured_frame() {
        let msg = decode_frame(r#"{"author":"PoetAI","content":"roses are red"}"#);
        assert_eq!(msg.author, "PoetAI");
        assert_eq!(msg.content, "roses are red");
        assert_eq!(msg.kind, MessageKind::Bot);
    }

    #[test]
    fn test_user_echo_is_user_kind() {
        let msg = decode_frame(r#"{"author":"User","content":"CoderAI hello there"}"#);
        assert_eq!(msg.content, "CoderAI hello there");
        assert!(msg.is_user());
    }

    #[test]
    fn test_raw_frame() {
        let msg = decode_frame("hello");
        assert_eq!(msg, ChatMessage::new("Server", "hello"));
    }

    #[test]
    fn test_missing_fields() {
        let msg = decode_frame(r#"{"content":"only content"}"#);
        assert_eq!(msg.author, "Server");
        assert_eq!(msg.content, "only content");

        let msg = decode_frame(r#"{"author":"System"}"#);
        assert_eq!(msg.author, "System");
        assert_eq!(msg.content, "");

        let msg = decode_frame(r#"{"author":null,"content":null,"extra":1}"#);
        assert_eq!(msg, ChatMessage::new("Server", ""));
    }

    #[test]
    fn test_non_object_json_is_raw() {
        assert_eq!(decode_frame("42"), ChatMessage::new("Server", "42"));
        assert_eq!(
            decode_frame(r#"["User","hi"]"#),
            ChatMessage::new("Server", r#"["User","hi"]"#)
        );
        assert_eq!(decode_frame("null"), ChatMessage::new("Server", "null"));
    }

    #[test]
    fn test_non_text_field_is_raw() {
        let frame = r#"{"author":7,"content":"x"}"#;
        assert_eq!(decode_frame(frame), ChatMessage::new("Server", frame));
    }

    #[test]
    fn test_decode_is_idempotent() {
        let frame = r#"{"author":"JokerAI","content":"knock knock"}"#;
        let first = decode_frame(frame);
        for _ in 0..3 {
            assert_eq!(decode_frame(frame), first);
        }
        assert_eq!(decode_frame("plain"), decode_frame("plain"));
    }
}
