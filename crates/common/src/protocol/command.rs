/// 出站命令定义

use std::fmt;

use crate::utils::strip_ai_suffix;

/// 出站命令
///
/// 不做转义或校验，命令语法由调用方负责
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundCommand {
    /// 普通聊天：`<selector> <text>`
    Chat { selector: String, text: String },

    /// 多 Agent 辩论：`/debate <agent>... | <topic> | <rounds>`
    Debate {
        agents: Vec<String>,
        topic: String,
        rounds: u32,
    },

    /// 多 Agent 聊天室：`/chatroom <agent>...`
    Chatroom { agents: Vec<String> },
}

impl OutboundCommand {
    /// 创建普通聊天命令；selector 为 Agent 名或 `BASE`
    pub fn chat(selector: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Chat {
            selector: selector.into(),
            text: text.into(),
        }
    }

    /// 创建辩论命令
    pub fn debate<I, S>(agents: I, topic: impl Into<String>, rounds: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Debate {
            agents: agents.into_iter().map(Into::into).collect(),
            topic: topic.into(),
            rounds,
        }
    }

    /// 创建聊天室命令，Agent 名去掉 `AI` 后缀
    pub fn chatroom<I, S>(agents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Chatroom {
            agents: agents
                .into_iter()
                .map(|name| strip_ai_suffix(name.as_ref()).to_string())
                .collect(),
        }
    }

    /// 线上文本
    pub fn to_wire(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OutboundCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat { selector, text } => write!(f, "{} {}", selector, text),
            Self::Debate {
                agents,
                topic,
                rounds,
            } => write!(f, "/debate {} | {} | {}", agents.join(" "), topic, rounds),
            Self::Chatroom { agents } => write!(f, "/chatroom {}", agents.join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BASE_SELECTOR;

    #[test]
    fn test_chat_command() {
        assert_eq!(
            OutboundCommand::chat("CoderAI", "write a loop").to_wire(),
            "CoderAI write a loop"
        );
        assert_eq!(OutboundCommand::chat(BASE_SELECTOR, "hi").to_wire(), "BASE hi");
    }

    #[test]
    fn test_debate_command() {
        let cmd = OutboundCommand::debate(["CoderAI", "PoetAI"], "ethics", 3);
        assert_eq!(cmd.to_wire(), "/debate CoderAI PoetAI | ethics | 3");
    }

    #[test]
    fn test_chatroom_command() {
        let cmd = OutboundCommand::chatroom(["CoderAI", "PoetAI"]);
        assert_eq!(cmd.to_wire(), "/chatroom Coder Poet");

        // 只去掉区分大小写的后缀
        let cmd = OutboundCommand::chatroom(vec!["Sageai".to_string()]);
        assert_eq!(cmd.to_wire(), "/chatroom Sageai");
    }
}
