/// 重连退避

use std::time::Duration;

/// 指数退避策略
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// 第一次重连前的等待
    pub initial: Duration,
    /// 等待上限
    pub max: Duration,
    /// 每次重连后的放大倍数
    pub multiplier: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(1000),
            max: Duration::from_millis(30000),
            multiplier: 1.5,
        }
    }
}

/// 退避计数器
///
/// 第 k 次连续失败后的等待为 `min(max, initial * multiplier^(k-1))`
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: BackoffPolicy,
    current: Duration,
}

impl Backoff {
    pub fn new(policy: BackoffPolicy) -> Self {
        let current = policy.initial.min(policy.max);
        Self { policy, current }
    }

    /// 下一次重连前的等待（不推进计数器）
    pub fn current(&self) -> Duration {
        self.current
    }

    /// 取出本次等待并放大下一次的等待
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.mul_f64(self.policy.multiplier).min(self.policy.max);
        delay
    }

    /// 恢复为初始等待
    pub fn reset(&mut self) {
        self.current = self.policy.initial.min(self.policy.max);
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(BackoffPolicy::default())
    }
}
