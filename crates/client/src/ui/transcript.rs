/// 聊天记录与状态栏

use chrono::{DateTime, Local};
use common::models::{ChatMessage, ConnectionStatus};

/// 一条聊天记录
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub message: ChatMessage,
    pub at: DateTime<Local>,
}

/// 只追加的聊天记录，视图始终跟随最新一条
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    scroll: Option<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) -> &TranscriptEntry {
        self.entries.push(TranscriptEntry {
            message,
            at: Local::now(),
        });
        let newest = self.entries.len() - 1;
        self.scroll = Some(newest);
        &self.entries[newest]
    }

    /// 从第 `start` 条开始的记录
    pub fn since(&self, start: usize) -> &[TranscriptEntry] {
        self.entries.get(start..).unwrap_or(&[])
    }

    /// 当前视图所在的记录位置
    pub fn scroll_position(&self) -> Option<usize> {
        self.scroll
    }
}

/// 状态栏
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    pub status: ConnectionStatus,
    pub send_enabled: bool,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            send_enabled: false,
        }
    }
}
