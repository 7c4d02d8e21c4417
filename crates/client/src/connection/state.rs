/// 连接状态机
///
/// 纯状态转换：输入当前状态和事件，输出下一个状态和需要执行的副作用。
/// 真正的 I/O 由 `ConnectionManager` 执行，结果再以事件的形式回送。

use std::time::Duration;

use common::models::{ChatMessage, ConnectionStatus};
use common::protocol::decode_frame;
use tracing::debug;

use super::backoff::{Backoff, BackoffPolicy};

/// 连接生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// 尚未尝试连接
    Idle,
    Connecting,
    Open,
    Closed,
    Errored,
    /// 已关闭，不再重连
    ShutDown,
}

/// 状态机输入事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// 发起连接（首次启动或重连定时器到期）
    Connect,
    /// 无法构造连接请求
    ConstructFailed(String),
    /// 传输层握手成功
    Opened,
    /// 收到一帧文本
    Frame(String),
    /// 传输层关闭
    Closed,
    /// 传输层报错
    Errored(String),
    /// 主动关闭
    Shutdown,
}

/// 状态转换产生的副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// 建立新的传输连接
    Dial,
    /// 发送一帧文本
    Transmit(String),
    /// 追加一条消息到聊天记录
    Render(ChatMessage),
    /// 更新状态栏
    SetStatus(ConnectionStatus),
    /// 启用/禁用发送
    SetSendEnabled(bool),
    /// 等待后重连
    ScheduleReconnect(Duration),
    /// 关闭当前传输并取消重连
    Disconnect,
}

/// 连接状态机
#[derive(Debug, Clone)]
pub struct ConnectionMachine {
    state: ConnectionState,
    backoff: Backoff,
}

impl ConnectionMachine {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            state: ConnectionState::Idle,
            backoff: Backoff::new(policy),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    pub fn is_shut_down(&self) -> bool {
        self.state == ConnectionState::ShutDown
    }

    /// 处理一个事件
    pub fn handle(&mut self, event: ConnectionEvent) -> Vec<Effect> {
        use ConnectionEvent as Ev;
        use ConnectionState as St;

        let from = self.state;
        let effects = match (from, event) {
            (St::ShutDown, _) => Vec::new(),

            (_, Ev::Shutdown) => {
                self.state = St::ShutDown;
                vec![Effect::SetSendEnabled(false), Effect::Disconnect]
            }

            // 同一时间最多一个传输连接
            (St::Idle | St::Closed | St::Errored, Ev::Connect) => {
                self.state = St::Connecting;
                vec![Effect::Dial]
            }
            (_, Ev::Connect) => Vec::new(),

            (St::Connecting, Ev::ConstructFailed(reason)) => {
                debug!("构造连接失败: {}", reason);
                self.state = St::Closed;
                vec![Effect::ScheduleReconnect(self.backoff.next_delay())]
            }

            (St::Connecting, Ev::Opened) => {
                self.state = St::Open;
                self.backoff.reset();
                vec![
                    Effect::SetStatus(ConnectionStatus::Connected),
                    Effect::SetSendEnabled(true),
                ]
            }

            // 每一帧恰好产生一条消息
            (_, Ev::Frame(frame)) => vec![Effect::Render(decode_frame(&frame))],

            (St::Connecting | St::Open | St::Errored, Ev::Closed) => {
                self.state = St::Closed;
                vec![
                    Effect::SetStatus(ConnectionStatus::Reconnecting),
                    Effect::SetSendEnabled(false),
                    Effect::ScheduleReconnect(self.backoff.next_delay()),
                ]
            }

            (St::Connecting | St::Open, Ev::Errored(reason)) => {
                debug!("传输错误: {}", reason);
                self.state = St::Errored;
                vec![
                    Effect::SetStatus(ConnectionStatus::Error),
                    Effect::SetSendEnabled(false),
                ]
            }

            (state, event) => {
                debug!("忽略事件: state={:?}, event={:?}", state, event);
                Vec::new()
            }
        };

        if from != self.state {
            debug!("连接状态: {:?} -> {:?}", from, self.state);
        }
        effects
    }

    /// 发送一帧文本，仅在 `Open` 时产生副作用
    pub fn send(&self, text: impl Into<String>) -> Vec<Effect> {
        if self.is_open() {
            vec![Effect::Transmit(text.into())]
        } else {
            Vec::new()
        }
    }
}

impl Default for ConnectionMachine {
    fn default() -> Self {
        Self::new(BackoffPolicy::default())
    }
}
