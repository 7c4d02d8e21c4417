/// 连接管理器
///
/// 持有唯一的 WebSocket 连接，在单个任务中依次处理 UI 命令、入站帧和重连定时器

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use common::models::{ChatMessage, ConnectionStatus};
use common::protocol::codec::{self, InboundFrame};
use common::protocol::OutboundCommand;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::Sleep;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::backoff::BackoffPolicy;
use super::state::{ConnectionEvent, ConnectionMachine, Effect};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// 进行中的握手，结果为连接或错误描述
type Handshake = Pin<Box<dyn Future<Output = Result<WsStream, String>> + Send>>;

/// 连接管理器推送给 UI 的更新
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Status(ConnectionStatus),
    SendEnabled(bool),
    Message(ChatMessage),
}

/// UI 发给连接管理器的命令
#[derive(Debug)]
enum Command {
    Send(String),
    Shutdown,
}

/// 连接管理器句柄
#[derive(Clone)]
pub struct ConnectionHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl ConnectionHandle {
    /// 发送一帧原始文本；未连接时静默丢弃
    pub fn send(&self, text: impl Into<String>) {
        if self.commands.send(Command::Send(text.into())).is_err() {
            debug!("连接管理器已退出，丢弃消息");
        }
    }

    /// 发送出站命令
    pub fn send_command(&self, cmd: &OutboundCommand) {
        self.send(cmd.to_wire());
    }

    /// 关闭连接并停止重连
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

/// 连接参数
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// 服务端地址
    pub url: String,
    /// 握手超时
    pub connect_timeout: Duration,
    /// 重连退避
    pub backoff: BackoffPolicy,
}

/// 当前传输连接、进行中的握手和重连定时器
#[derive(Default)]
struct Link {
    stream: Option<WsStream>,
    handshake: Option<Handshake>,
    reconnect: Option<Pin<Box<Sleep>>>,
}

/// 连接管理器
pub struct ConnectionManager {
    config: ConnectionConfig,
    machine: ConnectionMachine,
    commands: mpsc::UnboundedReceiver<Command>,
    ui: mpsc::UnboundedSender<UiEvent>,
}

impl ConnectionManager {
    /// 创建连接管理器，返回管理器、命令句柄和 UI 更新接收端
    pub fn new(
        config: ConnectionConfig,
    ) -> (Self, ConnectionHandle, mpsc::UnboundedReceiver<UiEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();

        let manager = Self {
            machine: ConnectionMachine::new(config.backoff.clone()),
            config,
            commands: cmd_rx,
            ui: ui_tx,
        };

        (manager, ConnectionHandle { commands: cmd_tx }, ui_rx)
    }

    /// 启动管理器（连接并保持，直到 shutdown）
    pub async fn run(mut self) {
        let mut link = Link::default();
        self.dispatch(ConnectionEvent::Connect, &mut link).await;

        while !self.machine.is_shut_down() {
            tokio::select! {
                cmd = self.commands.recv() => {
                    match cmd {
                        Some(Command::Send(text)) => {
                            let effects = self.machine.send(text);
                            if effects.is_empty() {
                                debug!("连接未就绪 (state={:?})，丢弃发送", self.machine.state());
                            }
                            self.apply(effects, &mut link).await;
                        }
                        Some(Command::Shutdown) | None => {
                            self.dispatch(ConnectionEvent::Shutdown, &mut link).await;
                        }
                    }
                }
                frame = next_frame(&mut link.stream) => {
                    let events = match frame {
                        Some(Ok(msg)) => match codec::decode(msg) {
                            InboundFrame::Text(text) => vec![ConnectionEvent::Frame(text)],
                            InboundFrame::Close => {
                                info!("服务端关闭连接");
                                if let Some(stream) = link.stream.take() {
                                    finish_close(stream).await;
                                }
                                vec![ConnectionEvent::Closed]
                            }
                            InboundFrame::Ignored => Vec::new(),
                        },
                        Some(Err(e)) => {
                            error!("接收消息错误: {}", e);
                            link.stream = None;
                            vec![ConnectionEvent::Errored(e.to_string()), ConnectionEvent::Closed]
                        }
                        None => {
                            info!("连接已关闭");
                            link.stream = None;
                            vec![ConnectionEvent::Closed]
                        }
                    };
                    for event in events {
                        self.dispatch(event, &mut link).await;
                    }
                }
                result = wait_handshake(&mut link.handshake) => {
                    link.handshake = None;
                    let events = match result {
                        Ok(stream) => {
                            info!("✅ WebSocket 连接成功");
                            link.stream = Some(stream);
                            vec![ConnectionEvent::Opened]
                        }
                        Err(e) => {
                            error!("连接错误: {}", e);
                            vec![ConnectionEvent::Errored(e), ConnectionEvent::Closed]
                        }
                    };
                    for event in events {
                        self.dispatch(event, &mut link).await;
                    }
                }
                _ = wait_reconnect(&mut link.reconnect) => {
                    link.reconnect = None;
                    self.dispatch(ConnectionEvent::Connect, &mut link).await;
                }
            }
        }

        info!("连接管理器已停止");
    }

    /// 处理事件及其引发的后续事件
    async fn dispatch(&mut self, event: ConnectionEvent, link: &mut Link) {
        let effects = self.machine.handle(event);
        self.apply(effects, link).await;
    }

    /// 执行副作用，I/O 结果作为新事件按顺序回送状态机
    async fn apply(&mut self, effects: Vec<Effect>, link: &mut Link) {
        let mut pending: VecDeque<Effect> = effects.into();

        while let Some(effect) = pending.pop_front() {
            let followups = match effect {
                Effect::Dial => self.dial(link),
                Effect::Transmit(text) => self.transmit(text, link).await,
                Effect::Render(msg) => {
                    self.emit(UiEvent::Message(msg));
                    Vec::new()
                }
                Effect::SetStatus(status) => {
                    self.emit(UiEvent::Status(status));
                    Vec::new()
                }
                Effect::SetSendEnabled(enabled) => {
                    self.emit(UiEvent::SendEnabled(enabled));
                    Vec::new()
                }
                Effect::ScheduleReconnect(delay) => {
                    warn!(
                        "{}ms 后重新连接 (之后为 {}ms)...",
                        delay.as_millis(),
                        self.machine.backoff().current().as_millis()
                    );
                    link.reconnect = Some(Box::pin(tokio::time::sleep(delay)));
                    Vec::new()
                }
                Effect::Disconnect => {
                    link.reconnect = None;
                    if link.handshake.take().is_some() {
                        debug!("取消进行中的握手");
                    }
                    if let Some(mut stream) = link.stream.take() {
                        if let Err(e) = stream.close(None).await {
                            debug!("关闭连接失败: {}", e);
                        }
                    }
                    Vec::new()
                }
            };

            for event in followups {
                pending.extend(self.machine.handle(event));
            }
        }
    }

    /// 发起连接；握手在主循环中推进，期间仍可处理命令
    fn dial(&self, link: &mut Link) -> Vec<ConnectionEvent> {
        info!("尝试连接到 Server: {}", self.config.url);

        let request = match self.config.url.as_str().into_client_request() {
            Ok(request) => request,
            Err(e) => {
                error!("无效的服务端地址 {}: {}", self.config.url, e);
                return vec![ConnectionEvent::ConstructFailed(e.to_string())];
            }
        };

        let connect_timeout = self.config.connect_timeout;
        link.handshake = Some(Box::pin(async move {
            match tokio::time::timeout(connect_timeout, connect_async(request)).await {
                Ok(Ok((stream, _))) => Ok(stream),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!("连接超时: {:?}", connect_timeout)),
            }
        }));
        Vec::new()
    }

    /// 发送一帧文本
    async fn transmit(&self, text: String, link: &mut Link) -> Vec<ConnectionEvent> {
        let Some(stream) = link.stream.as_mut() else {
            return Vec::new();
        };

        debug!("发送消息: {}", text);
        match stream.send(codec::encode(text)).await {
            Ok(()) => Vec::new(),
            Err(e) => {
                error!("发送消息失败: {}", e);
                link.stream = None;
                vec![ConnectionEvent::Errored(e.to_string()), ConnectionEvent::Closed]
            }
        }
    }

    fn emit(&self, event: UiEvent) {
        if self.ui.send(event).is_err() {
            debug!("UI 已退出，丢弃更新");
        }
    }
}

/// 读取当前连接的下一帧；没有连接时永远挂起
async fn next_frame(
    stream: &mut Option<WsStream>,
) -> Option<Result<tokio_tungstenite::tungstenite::Message, tokio_tungstenite::tungstenite::Error>> {
    match stream {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

/// 等待握手结果；没有握手时永远挂起
async fn wait_handshake(handshake: &mut Option<Handshake>) -> Result<WsStream, String> {
    match handshake {
        Some(handshake) => handshake.as_mut().await,
        None => std::future::pending().await,
    }
}

/// 回应对端的关闭帧后再释放连接
async fn finish_close(mut stream: WsStream) {
    if let Err(e) = stream.close(None).await {
        debug!("关闭握手未完成: {}", e);
    }
}

/// 等待重连定时器；没有定时器时永远挂起
async fn wait_reconnect(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending::<()>().await,
    }
}
