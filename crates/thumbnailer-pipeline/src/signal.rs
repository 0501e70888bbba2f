use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline for one pipeline invocation.
#[derive(Debug, Clone, Default)]
pub struct InvocationSignal {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl InvocationSignal {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True once the token is cancelled or the deadline has passed.
    pub fn is_fired(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves when the token is cancelled or the deadline passes.
    pub async fn fired(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_signal_never_fires() {
        let signal = InvocationSignal::default();
        assert!(!signal.is_fired());
        let fired = tokio::time::timeout(Duration::from_millis(20), signal.fired()).await;
        assert!(fired.is_err());
    }

    #[tokio::test]
    async fn test_cancellation_fires() {
        let token = CancellationToken::new();
        let signal = InvocationSignal::new(token.child_token());
        token.cancel();
        assert!(signal.is_fired());
        signal.fired().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_fires() {
        let signal = InvocationSignal::default().with_timeout(Duration::from_secs(30));
        assert!(!signal.is_fired());
        signal.fired().await;
        assert!(signal.is_fired());
    }
}
