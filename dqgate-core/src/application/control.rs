// dqgate-core/src/application/control.rs

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::error::CancelReason;

/// Cloneable, awaitable cancellation flag shared between a caller and a run.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    flag: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { flag: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        // send_replace stores the value even when nobody is listening yet
        self.flag.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.flag.borrow()
    }

    /// Resolves once `cancel` has been called (immediately if it already was).
    pub async fn cancelled(&self) {
        let mut rx = self.flag.subscribe();
        // The sender lives in `self`, so the channel cannot close under us
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Caller-supplied limits for one engine run.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    pub deadline: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl RunControl {
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Resolves when the run must be abandoned; never resolves without limits.
    pub async fn interrupted(&self) -> CancelReason {
        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(d) => {
                    tokio::time::sleep(d).await;
                    d
                }
                None => std::future::pending::<Duration>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => CancelReason::Cancelled,
            d = expired => CancelReason::DeadlineExceeded(d),
        }
    }
}
