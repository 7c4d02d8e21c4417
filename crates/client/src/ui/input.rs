/// 控制台输入解析
///
/// 以 `:` 开头的行是界面操作，其余内容作为聊天文本发送

use common::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Chat(String),
    Help,
    Agents,
    Use(String),
    ChipAdd(String),
    ChipRemove(usize),
    Chips,
    Chatroom,
    DebateOpen,
    DebateToggle(String),
    DebateTopic(String),
    DebateRounds(String),
    DebateStart,
    DebateClose,
    Status,
    Quit,
}

impl Input {
    /// 解析一行输入，空行返回 None
    pub fn parse(line: &str) -> Result<Option<Input>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let Some(directive) = line.strip_prefix(':') else {
            return Ok(Some(Input::Chat(line.to_string())));
        };

        let (name, rest) = split_word(directive);
        let input = match name {
            "help" | "h" => Input::Help,
            "agents" => Input::Agents,
            "use" => Input::Use(required(rest, ":use <agent>")?),
            "chips" => Input::Chips,
            "chip" => {
                let (sub, arg) = split_word(rest);
                match sub {
                    "add" => Input::ChipAdd(required(arg, ":chip add <agent>")?),
                    "rm" | "remove" => {
                        let index = required(arg, ":chip rm <n>")?;
                        let n: usize = index
                            .parse()
                            .map_err(|_| Error::InvalidCommand(format!("无效的 chip 序号: {}", index)))?;
                        if n == 0 {
                            return Err(Error::InvalidCommand("chip 序号从 1 开始".to_string()));
                        }
                        Input::ChipRemove(n - 1)
                    }
                    _ => return Err(usage(":chip add <agent> | :chip rm <n>")),
                }
            }
            "chatroom" => Input::Chatroom,
            "debate" => {
                let (sub, arg) = split_word(rest);
                match sub {
                    "" | "open" => Input::DebateOpen,
                    "toggle" => Input::DebateToggle(required(arg, ":debate toggle <agent>")?),
                    "topic" => Input::DebateTopic(arg.to_string()),
                    "rounds" => Input::DebateRounds(required(arg, ":debate rounds <n>")?),
                    "start" => Input::DebateStart,
                    "close" => Input::DebateClose,
                    _ => {
                        return Err(usage(
                            ":debate open|toggle <agent>|topic <text>|rounds <n>|start|close",
                        ))
                    }
                }
            }
            "status" => Input::Status,
            "quit" | "q" | "exit" => Input::Quit,
            other => return Err(Error::InvalidCommand(format!("未知操作: :{}", other))),
        };

        Ok(Some(input))
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (s, ""),
    }
}

fn required(arg: &str, usage_text: &str) -> Result<String> {
    if arg.is_empty() {
        Err(usage(usage_text))
    } else {
        Ok(arg.to_string())
    }
}

fn usage(text: &str) -> Error {
    Error::InvalidCommand(format!("用法: {}", text))
}
