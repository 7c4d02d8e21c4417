/// 共享数据模型
///
/// 定义 Agent 名册、聊天消息和连接状态

use serde::{Deserialize, Serialize};

use crate::utils::strip_ai_suffix;

/// 服务端默认作者名
pub const SERVER_AUTHOR: &str = "Server";

/// 本地系统消息作者名
pub const SYSTEM_AUTHOR: &str = "System";

/// 用户消息作者名（服务端回显用户输入时使用）
pub const USER_AUTHOR: &str = "User";

/// 未选择 Agent 时使用的选择器
pub const BASE_SELECTOR: &str = "BASE";

/// 侧边栏中可选的 Agent 名册
pub const AGENT_ROSTER: &[&str] = &[
    "CoderAI",
    "PhilosopherAI",
    "JokerAI",
    "ScientistAI",
    "TeacherAI",
    "PoetAI",
    "VillainAI",
    "DoctorAI",
    "ComedianAI",
    "AnimeAI",
];

/// AI 角色
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Agent {
    pub name: String,
}

impl Agent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// 完整名册
    pub fn roster() -> Vec<Agent> {
        AGENT_ROSTER.iter().map(|name| Agent::new(*name)).collect()
    }

    /// 在名册中查找 Agent
    ///
    /// 忽略大小写，同时接受去掉 `AI` 后缀的短名（`coder` -> `CoderAI`）
    pub fn find(query: &str) -> Option<Agent> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        AGENT_ROSTER
            .iter()
            .find(|name| {
                name.eq_ignore_ascii_case(query)
                    || strip_ai_suffix(name).eq_ignore_ascii_case(query)
            })
            .map(|name| Agent::new(*name))
    }
}

/// 消息类别（决定气泡样式）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Bot,
}

/// 聊天消息（仅用于渲染，不持久化）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub author: String,
    pub content: String,
    pub kind: MessageKind,
}

impl ChatMessage {
    /// 创建消息，类别由作者决定
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        let author = author.into();
        let kind = if author == USER_AUTHOR {
            MessageKind::User
        } else {
            MessageKind::Bot
        };

        Self {
            author,
            content: content.into(),
            kind,
        }
    }

    /// 本地系统提示
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(SYSTEM_AUTHOR, content)
    }

    pub fn is_user(&self) -> bool {
        self.kind == MessageKind::User
    }
}

/// 连接状态指示
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Reconnecting,
    Error,
}

impl ConnectionStatus {
    /// 状态栏文本
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
            Self::Reconnecting => "Disconnected — reconnecting...",
            Self::Error => "Error",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_kind_follows_author() {
        assert_eq!(ChatMessage::new("User", "hi").kind, MessageKind::User);
        assert_eq!(ChatMessage::new("CoderAI", "hi").kind, MessageKind::Bot);
        assert_eq!(ChatMessage::new("user", "hi").kind, MessageKind::Bot);
        assert_eq!(ChatMessage::system("x").author, "System");
    }

    #[test]
    fn test_find_agent() {
        assert_eq!(Agent::find("CoderAI"), Some(Agent::new("CoderAI")));
        assert_eq!(Agent::find("coderai"), Some(Agent::new("CoderAI")));
        assert_eq!(Agent::find("poet"), Some(Agent::new("PoetAI")));
        assert_eq!(Agent::find("  Anime "), Some(Agent::new("AnimeAI")));
        assert_eq!(Agent::find("Nobody"), None);
        assert_eq!(Agent::find(""), None);
    }

    #[test]
    fn test_roster() {
        let roster = Agent::roster();
        assert_eq!(roster.len(), 10);
        assert_eq!(roster[0].name, "CoderAI");
        assert_eq!(roster[9].name, "AnimeAI");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ConnectionStatus::Connected.label(), "Connected");
        assert_eq!(
            ConnectionStatus::Reconnecting.to_string(),
            "Disconnected — reconnecting..."
        );
        assert_eq!(ConnectionStatus::Error.label(), "Error");
    }
}
