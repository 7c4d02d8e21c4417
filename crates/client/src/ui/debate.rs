/// 辩论对话框

use common::models::Agent;
use common::protocol::OutboundCommand;
use common::{Error, Result};

/// 复选框
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateOption {
    pub agent: Agent,
    pub checked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DebateDialog {
    open: bool,
    options: Vec<DebateOption>,
    topic: String,
    rounds: Option<u32>,
}

impl DebateDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 打开对话框，用完整名册重建复选框（全部未选中）
    pub fn open(&mut self, roster: &[Agent]) {
        self.options = roster
            .iter()
            .cloned()
            .map(|agent| DebateOption {
                agent,
                checked: false,
            })
            .collect();
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn options(&self) -> &[DebateOption] {
        &self.options
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn rounds(&self) -> Option<u32> {
        self.rounds
    }

    /// 切换复选框，返回新的选中状态
    pub fn toggle(&mut self, agent: &Agent) -> Result<bool> {
        self.ensure_open()?;
        let option = self
            .options
            .iter_mut()
            .find(|o| &o.agent == agent)
            .ok_or_else(|| Error::UnknownAgent(agent.name.clone()))?;
        option.checked = !option.checked;
        Ok(option.checked)
    }

    pub fn set_topic(&mut self, topic: &str) -> Result<()> {
        self.ensure_open()?;
        self.topic = topic.trim().to_string();
        Ok(())
    }

    pub fn set_rounds(&mut self, rounds: &str) -> Result<u32> {
        self.ensure_open()?;
        let rounds: u32 = rounds
            .trim()
            .parse()
            .map_err(|_| Error::InvalidCommand(format!("回合数必须是正整数: {}", rounds.trim())))?;
        if rounds == 0 {
            return Err(Error::InvalidCommand("回合数必须大于 0".to_string()));
        }
        self.rounds = Some(rounds);
        Ok(rounds)
    }

    /// 已选中的 Agent（名册顺序）
    pub fn selected(&self) -> Vec<&Agent> {
        self.options
            .iter()
            .filter(|o| o.checked)
            .map(|o| &o.agent)
            .collect()
    }

    /// 生成辩论命令
    pub fn command(&self) -> Result<OutboundCommand> {
        self.ensure_open()?;
        let selected = self.selected();
        if selected.is_empty() {
            return Err(Error::InvalidCommand("至少选择一个 Agent".to_string()));
        }
        let rounds = self
            .rounds
            .ok_or_else(|| Error::InvalidCommand("缺少回合数".to_string()))?;

        Ok(OutboundCommand::debate(
            selected.into_iter().map(|agent| agent.name.clone()),
            self.topic.clone(),
            rounds,
        ))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::InvalidCommand("辩论对话框未打开".to_string()))
        }
    }
}
