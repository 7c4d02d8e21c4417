/// 控制台前端
///
/// 从标准输入读取操作，把聊天记录和状态栏输出到终端

use colored::{ColoredString, Colorize};
use common::models::{ConnectionStatus, MessageKind};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::connection::{ConnectionHandle, UiEvent};
use crate::ui::{Action, ChatView, TranscriptEntry};

pub struct Console {
    view: ChatView,
    handle: ConnectionHandle,
    updates: mpsc::UnboundedReceiver<UiEvent>,
    /// 已输出到终端的聊天记录条数
    printed: usize,
}

impl Console {
    pub fn new(
        view: ChatView,
        handle: ConnectionHandle,
        updates: mpsc::UnboundedReceiver<UiEvent>,
    ) -> Self {
        Self {
            view,
            handle,
            updates,
            printed: 0,
        }
    }

    /// 运行直到 `:quit` 或输入结束
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("{}", "Agent Chat（输入 :help 查看操作）".bold());
        println!("{}", render_status(self.view.status.status));

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("标准输入已结束");
                        break;
                    };
                    let actions = self.view.handle_line(&line);
                    if self.perform(actions) {
                        break;
                    }
                }
                update = self.updates.recv() => {
                    let Some(update) = update else {
                        debug!("连接管理器已退出");
                        break;
                    };
                    if let UiEvent::Status(status) = &update {
                        println!("{}", render_status(*status));
                    }
                    self.view.apply(update);
                }
            }
            self.flush_transcript();
        }

        info!("👋 退出客户端");
        self.handle.shutdown();
        Ok(())
    }

    /// 执行界面操作，返回是否退出
    fn perform(&mut self, actions: Vec<Action>) -> bool {
        let mut quit = false;
        for action in actions {
            match action {
                Action::Transmit(cmd) => self.handle.send_command(&cmd),
                Action::Show(lines) => {
                    for line in lines {
                        println!("  {}", line.dimmed());
                    }
                }
                Action::Warn(message) => println!("{} {}", "!".yellow().bold(), message.yellow()),
                Action::Quit => quit = true,
            }
        }
        quit
    }

    /// 输出新追加的聊天记录，停在视图所在的最新一条
    fn flush_transcript(&mut self) {
        let transcript = &self.view.transcript;
        let Some(newest) = transcript.scroll_position() else {
            return;
        };
        for entry in transcript.since(self.printed) {
            println!("{}", render_entry(entry));
        }
        self.printed = newest + 1;
    }
}

/// 状态栏文本
pub fn render_status(status: ConnectionStatus) -> ColoredString {
    let label = format!("● {}", status.label());
    match status {
        ConnectionStatus::Connecting => label.dimmed(),
        ConnectionStatus::Connected => label.green(),
        ConnectionStatus::Reconnecting => label.truecolor(255, 165, 0),
        ConnectionStatus::Error => label.red(),
    }
}

/// 一条聊天气泡
pub fn render_entry(entry: &TranscriptEntry) -> String {
    let time = entry.at.format("%H:%M:%S").to_string();
    let message = &entry.message;
    let author = match message.kind {
        MessageKind::User => message.author.cyan().bold(),
        MessageKind::Bot => message.author.green().bold(),
    };
    format!("{} {}: {}", time.dimmed(), author, message.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::ChatMessage;
    use crate::connection::{BackoffPolicy, ConnectionConfig, ConnectionManager};
    use crate::ui::Transcript;

    #[test]
    fn test_render_entry() {
        let mut transcript = Transcript::new();
        let entry = transcript.append(ChatMessage::new("PoetAI", "roses are red"));
        let line = render_entry(entry);
        assert!(line.contains("PoetAI"));
        assert!(line.ends_with("roses are red"));
    }

    #[test]
    fn test_flush_prints_each_entry_once() {
        let (_manager, handle, updates) = ConnectionManager::new(ConnectionConfig {
            url: "ws://127.0.0.1:9/ws".to_string(),
            connect_timeout: std::time::Duration::from_secs(1),
            backoff: BackoffPolicy::default(),
        });
        let mut console = Console::new(ChatView::new(false), handle, updates);

        console.flush_transcript();
        assert_eq!(console.printed, 0);

        console.view.apply(UiEvent::Message(ChatMessage::new("BASE", "one")));
        console.view.apply(UiEvent::Message(ChatMessage::new("BASE", "two")));
        console.flush_transcript();
        assert_eq!(console.printed, 2);

        console.flush_transcript();
        assert_eq!(console.printed, 2);
    }

    #[test]
    fn test_render_status() {
        assert!(render_status(ConnectionStatus::Connected).to_string().contains("Connected"));
        assert!(render_status(ConnectionStatus::Reconnecting)
            .to_string()
            .contains("Disconnected — reconnecting..."));
    }
}
