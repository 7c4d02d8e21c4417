/// 侧边栏：Agent 列表与当前选择

use common::models::{Agent, ChatMessage, BASE_SELECTOR};

#[derive(Debug, Clone)]
pub struct Sidebar {
    agents: Vec<Agent>,
    active: Option<usize>,
}

impl Sidebar {
    pub fn new(agents: Vec<Agent>) -> Self {
        Self {
            agents,
            active: None,
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn active(&self) -> Option<&Agent> {
        self.active.and_then(|i| self.agents.get(i))
    }

    /// 普通聊天使用的选择器
    pub fn selector(&self) -> &str {
        self.active()
            .map(|agent| agent.name.as_str())
            .unwrap_or(BASE_SELECTOR)
    }

    /// 选择 Agent，返回要追加到聊天记录的提示
    pub fn select(&mut self, agent: &Agent) -> Option<ChatMessage> {
        let index = self.agents.iter().position(|a| a == agent)?;
        self.active = Some(index);
        Some(ChatMessage::system(format!("Switched to {}", agent.name)))
    }

    pub fn is_active(&self, agent: &Agent) -> bool {
        self.active() == Some(agent)
    }
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::new(Agent::roster())
    }
}
