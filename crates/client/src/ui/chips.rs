/// Chip 托盘：拖入的 Agent，用于创建聊天室

use common::models::Agent;
use common::protocol::OutboundCommand;
use common::utils::chip_label;
use common::{Error, Result};

/// 一个 chip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub agent: Agent,
    pub label: String,
}

impl Chip {
    pub fn new(agent: Agent) -> Self {
        let label = chip_label(&agent.name).to_string();
        Self { agent, label }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChipTray {
    chips: Vec<Chip>,
}

impl ChipTray {
    pub fn new() -> Self {
        Self::default()
    }

    /// 放入一个 Agent
    pub fn add(&mut self, agent: Agent) -> &Chip {
        self.chips.push(Chip::new(agent));
        &self.chips[self.chips.len() - 1]
    }

    /// 按位置移除
    pub fn remove(&mut self, index: usize) -> Result<Chip> {
        if index >= self.chips.len() {
            return Err(Error::InvalidCommand(format!(
                "chip 序号越界: {} (共 {} 个)",
                index + 1,
                self.chips.len()
            )));
        }
        Ok(self.chips.remove(index))
    }

    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    /// 根据当前 chip 生成聊天室命令，托盘为空时返回 None
    pub fn chatroom_command(&self) -> Option<OutboundCommand> {
        if self.chips.is_empty() {
            return None;
        }
        Some(OutboundCommand::chatroom(
            self.chips.iter().map(|chip| chip.agent.name.as_str()),
        ))
    }
}
