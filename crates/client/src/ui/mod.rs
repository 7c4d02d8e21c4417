/// 界面状态模块
///
/// 侧边栏、chip 托盘、辩论对话框、聊天记录和状态栏的内存模型。
/// 所有出站命令都由这里生成，再交给连接管理器发送。

pub mod chips;
pub mod debate;
pub mod input;
pub mod sidebar;
pub mod transcript;

pub use chips::ChipTray;
pub use debate::DebateDialog;
pub use input::Input;
pub use sidebar::Sidebar;
pub use transcript::{StatusLine, Transcript, TranscriptEntry};

use common::models::{Agent, ChatMessage, USER_AUTHOR};
use common::protocol::OutboundCommand;
use common::{Error, Result};
use tracing::debug;

use crate::connection::UiEvent;

/// 界面操作的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// 交给连接管理器发送
    Transmit(OutboundCommand),
    /// 仅在控制台显示的信息
    Show(Vec<String>),
    /// 警告（不进入聊天记录）
    Warn(String),
    Quit,
}

/// 完整的界面状态
#[derive(Debug, Clone)]
pub struct ChatView {
    pub sidebar: Sidebar,
    pub chips: ChipTray,
    pub debate: DebateDialog,
    pub transcript: Transcript,
    pub status: StatusLine,
    local_echo: bool,
}

impl ChatView {
    pub fn new(local_echo: bool) -> Self {
        Self {
            sidebar: Sidebar::default(),
            chips: ChipTray::new(),
            debate: DebateDialog::new(),
            transcript: Transcript::new(),
            status: StatusLine::default(),
            local_echo,
        }
    }

    /// 应用连接管理器推送的更新
    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Status(status) => self.status.status = status,
            UiEvent::SendEnabled(enabled) => self.status.send_enabled = enabled,
            UiEvent::Message(message) => {
                self.transcript.append(message);
            }
        }
    }

    /// 处理一行控制台输入
    pub fn handle_line(&mut self, line: &str) -> Vec<Action> {
        match Input::parse(line) {
            Ok(Some(input)) => self.handle(input),
            Ok(None) => Vec::new(),
            Err(e) => vec![Action::Warn(e.to_string())],
        }
    }

    /// 执行界面操作
    pub fn handle(&mut self, input: Input) -> Vec<Action> {
        debug!("界面操作: {:?}", input);

        match self.try_handle(input) {
            Ok(actions) => actions,
            Err(e) => {
                debug!("界面操作失败: {}", e);
                vec![Action::Warn(e.to_string())]
            }
        }
    }

    fn try_handle(&mut self, input: Input) -> Result<Vec<Action>> {
        let actions = match input {
            Input::Chat(text) => self.send_message(&text),
            Input::Help => vec![Action::Show(help_lines())],
            Input::Agents => vec![Action::Show(self.agent_lines())],
            Input::Use(name) => {
                let agent = find_agent(&name)?;
                if let Some(notice) = self.sidebar.select(&agent) {
                    self.transcript.append(notice);
                }
                Vec::new()
            }
            Input::ChipAdd(name) => {
                let agent = find_agent(&name)?;
                self.chips.add(agent);
                vec![Action::Show(self.chip_lines())]
            }
            Input::ChipRemove(index) => {
                self.chips.remove(index)?;
                vec![Action::Show(self.chip_lines())]
            }
            Input::Chips => vec![Action::Show(self.chip_lines())],
            Input::Chatroom => match self.chips.chatroom_command() {
                Some(cmd) => vec![self.transmit(cmd)],
                None => vec![Action::Warn("No agents selected!".to_string())],
            },
            Input::DebateOpen => {
                self.debate.open(self.sidebar.agents());
                vec![Action::Show(self.debate_lines())]
            }
            Input::DebateToggle(name) => {
                let agent = find_agent(&name)?;
                self.debate.toggle(&agent)?;
                vec![Action::Show(self.debate_lines())]
            }
            Input::DebateTopic(topic) => {
                self.debate.set_topic(&topic)?;
                vec![Action::Show(self.debate_lines())]
            }
            Input::DebateRounds(rounds) => {
                self.debate.set_rounds(&rounds)?;
                vec![Action::Show(self.debate_lines())]
            }
            Input::DebateStart => {
                let cmd = self.debate.command()?;
                let action = self.transmit(cmd);
                if matches!(action, Action::Transmit(_)) {
                    self.debate.close();
                }
                vec![action]
            }
            Input::DebateClose => {
                self.debate.close();
                Vec::new()
            }
            Input::Status => vec![Action::Show(vec![format!(
                "{} (send {})",
                self.status.status,
                if self.status.send_enabled { "enabled" } else { "disabled" }
            )])],
            Input::Quit => vec![Action::Quit],
        };
        Ok(actions)
    }

    /// 发送普通聊天：去掉首尾空白，加上选择器前缀
    fn send_message(&mut self, text: &str) -> Vec<Action> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let cmd = OutboundCommand::chat(self.sidebar.selector(), text);
        let action = self.transmit(cmd);
        if self.local_echo {
            if let Action::Transmit(cmd) = &action {
                self.transcript.append(ChatMessage::new(USER_AUTHOR, cmd.to_wire()));
            }
        }
        vec![action]
    }

    /// 发送按钮禁用时不发送
    fn transmit(&self, cmd: OutboundCommand) -> Action {
        if self.status.send_enabled {
            Action::Transmit(cmd)
        } else {
            Action::Warn(format!("未连接（{}），命令未发送", self.status.status))
        }
    }

    fn agent_lines(&self) -> Vec<String> {
        self.sidebar
            .agents()
            .iter()
            .map(|agent| {
                let marker = if self.sidebar.is_active(agent) { "*" } else { " " };
                format!("{} {}", marker, agent.name)
            })
            .collect()
    }

    fn chip_lines(&self) -> Vec<String> {
        if self.chips.is_empty() {
            return vec!["(没有 chip)".to_string()];
        }
        self.chips
            .chips()
            .iter()
            .enumerate()
            .map(|(i, chip)| format!("{}. {} ×", i + 1, chip.label))
            .collect()
    }

    fn debate_lines(&self) -> Vec<String> {
        let mut lines = vec!["Select Agents:".to_string()];
        lines.extend(self.debate.options().iter().map(|option| {
            format!(
                "[{}] {}",
                if option.checked { "x" } else { " " },
                option.agent.name
            )
        }));
        lines.push(format!("topic: {}", self.debate.topic()));
        lines.push(format!(
            "rounds: {}",
            self.debate
                .rounds()
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string())
        ));
        lines
    }
}

fn find_agent(name: &str) -> Result<Agent> {
    Agent::find(name).ok_or_else(|| Error::UnknownAgent(name.to_string()))
}

fn help_lines() -> Vec<String> {
    [
        "<text>                      发送给当前 Agent（未选择时为 BASE）",
        ":agents                     列出 Agent",
        ":use <agent>                切换当前 Agent",
        ":chip add <agent>           添加 chip",
        ":chip rm <n>                移除第 n 个 chip",
        ":chips                      列出 chip",
        ":chatroom                   用当前 chip 创建聊天室",
        ":debate open                打开辩论对话框",
        ":debate toggle <agent>      勾选/取消 Agent",
        ":debate topic <text>        设置辩题",
        ":debate rounds <n>          设置回合数",
        ":debate start               开始辩论",
        ":debate close               关闭对话框",
        ":status                     连接状态",
        ":quit                       退出",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::ConnectionStatus;

    fn connected_view() -> ChatView {
        let mut view = ChatView::new(false);
        view.apply(UiEvent::Status(ConnectionStatus::Connected));
        view.apply(UiEvent::SendEnabled(true));
        view
    }

    fn transmitted(actions: &[Action]) -> Vec<String> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Transmit(cmd) => Some(cmd.to_wire()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_chat_uses_selector() {
        let mut view = connected_view();
        assert_eq!(transmitted(&view.handle_line("hello")), vec!["BASE hello"]);

        view.handle_line(":use coder");
        assert_eq!(
            view.transcript.since(0).last().unwrap().message,
            ChatMessage::new("System", "Switched to CoderAI")
        );
        assert_eq!(
            transmitted(&view.handle_line("  write a loop  ")),
            vec!["CoderAI write a loop"]
        );
    }

    #[test]
    fn test_chat_blocked_while_disconnected() {
        let mut view = ChatView::new(true);
        let actions = view.handle_line("hello");
        assert!(transmitted(&actions).is_empty());
        assert!(matches!(actions[0], Action::Warn(_)));
        assert_eq!(view.transcript.scroll_position(), None);

        view.apply(UiEvent::SendEnabled(true));
        view.apply(UiEvent::SendEnabled(false));
        assert!(transmitted(&view.handle_line("hello")).is_empty());
    }

    #[test]
    fn test_local_echo() {
        let mut view = ChatView::new(true);
        view.apply(UiEvent::SendEnabled(true));
        view.handle_line("hi");
        let entry = view.transcript.since(0).last().unwrap();
        assert_eq!(entry.message, ChatMessage::new("User", "BASE hi"));
        assert!(entry.message.is_user());
    }

    #[test]
    fn test_chatroom_flow() {
        let mut view = connected_view();
        let actions = view.handle_line(":chatroom");
        assert_eq!(actions, vec![Action::Warn("No agents selected!".to_string())]);

        view.handle_line(":chip add CoderAI");
        view.handle_line(":chip add joker");
        view.handle_line(":chip add PoetAI");
        view.handle_line(":chip rm 2");
        assert_eq!(
            transmitted(&view.handle_line(":chatroom")),
            vec!["/chatroom Coder Poet"]
        );
    }

    #[test]
    fn test_debate_flow() {
        let mut view = connected_view();
        assert!(matches!(view.handle_line(":debate start")[0], Action::Warn(_)));

        view.handle_line(":debate open");
        view.handle_line(":debate toggle PoetAI");
        view.handle_line(":debate toggle CoderAI");
        view.handle_line(":debate topic ethics");
        view.handle_line(":debate rounds 3");
        assert_eq!(
            transmitted(&view.handle_line(":debate start")),
            vec!["/debate CoderAI PoetAI | ethics | 3"]
        );
        assert!(!view.debate.is_open());
    }

    #[test]
    fn test_debate_stays_open_when_disconnected() {
        let mut view = ChatView::new(false);
        view.handle_line(":debate open");
        view.handle_line(":debate toggle CoderAI");
        view.handle_line(":debate rounds 1");
        let actions = view.handle_line(":debate start");
        assert!(transmitted(&actions).is_empty());
        assert!(view.debate.is_open());
    }

    #[test]
    fn test_unknown_agent_warns() {
        let mut view = connected_view();
        let actions = view.handle_line(":use GhostAI");
        assert_eq!(actions, vec![Action::Warn("未知的 Agent: GhostAI".to_string())]);
        assert_eq!(view.sidebar.selector(), "BASE");
    }

    #[test]
    fn test_inbound_message_appends() {
        let mut view = connected_view();
        view.apply(UiEvent::Message(ChatMessage::new("Server", "hello")));
        assert_eq!(view.transcript.since(0).len(), 1);
        assert_eq!(view.transcript.scroll_position(), Some(0));
    }
}
