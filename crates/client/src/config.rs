/// 配置管理

use serde::Deserialize;
use std::time::Duration;

use crate::connection::BackoffPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server_ws_url: String,
    pub reconnect_initial_ms: u64,
    pub reconnect_max_ms: u64,
    pub reconnect_multiplier: f64,
    pub connect_timeout_secs: u64,
    pub local_echo: bool,
    pub log_level: String,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_ws_url = lookup("CHAT_WS_URL")
            .unwrap_or_else(|| "ws://127.0.0.1:8000/ws".to_string());

        let reconnect_initial_ms = lookup("RECONNECT_INITIAL_MS")
            .unwrap_or_else(|| "1000".to_string())
            .parse()?;

        let reconnect_max_ms = lookup("RECONNECT_MAX_MS")
            .unwrap_or_else(|| "30000".to_string())
            .parse()?;

        let reconnect_multiplier: f64 = lookup("RECONNECT_MULTIPLIER")
            .unwrap_or_else(|| "1.5".to_string())
            .parse()?;

        let connect_timeout_secs = lookup("CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|| "10".to_string())
            .parse()?;

        let local_echo = lookup("LOCAL_ECHO")
            .unwrap_or_else(|| "false".to_string())
            .parse()?;

        let log_level = lookup("LOG_LEVEL")
            .unwrap_or_else(|| "warn".to_string());

        if !reconnect_multiplier.is_finite() || reconnect_multiplier < 1.0 {
            anyhow::bail!("RECONNECT_MULTIPLIER 必须 >= 1.0: {}", reconnect_multiplier);
        }
        if reconnect_max_ms < reconnect_initial_ms {
            anyhow::bail!(
                "RECONNECT_MAX_MS ({}) 不能小于 RECONNECT_INITIAL_MS ({})",
                reconnect_max_ms,
                reconnect_initial_ms
            );
        }

        Ok(Self {
            server_ws_url,
            reconnect_initial_ms,
            reconnect_max_ms,
            reconnect_multiplier,
            connect_timeout_secs,
            local_echo,
            log_level,
        })
    }

    /// 重连退避策略
    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            initial: Duration::from_millis(self.reconnect_initial_ms),
            max: Duration::from_millis(self.reconnect_max_ms),
            multiplier: self.reconnect_multiplier,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.server_ws_url, "ws://127.0.0.1:8000/ws");
        assert_eq!(cfg.reconnect_initial_ms, 1000);
        assert_eq!(cfg.reconnect_max_ms, 30000);
        assert_eq!(cfg.reconnect_multiplier, 1.5);
        assert!(!cfg.local_echo);
        assert_eq!(cfg.log_level, "warn");
        assert_eq!(cfg.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let cfg = load(&[
            ("CHAT_WS_URL", "ws://chat.local:9000/ws"),
            ("RECONNECT_INITIAL_MS", "200"),
            ("LOCAL_ECHO", "true"),
        ])
        .unwrap();
        assert_eq!(cfg.server_ws_url, "ws://chat.local:9000/ws");
        assert_eq!(cfg.backoff_policy().initial, Duration::from_millis(200));
        assert!(cfg.local_echo);
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("RECONNECT_INITIAL_MS", "soon")]).is_err());
        assert!(load(&[("RECONNECT_MULTIPLIER", "0.5")]).is_err());
        assert!(load(&[("RECONNECT_INITIAL_MS", "5000"), ("RECONNECT_MAX_MS", "100")]).is_err());
    }
}
