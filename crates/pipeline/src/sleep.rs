//! Pacing between files.

use async_trait::async_trait;
use std::time::Duration;

/// Waits between consecutive files of a batch.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real-time sleeps on the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(any(test, feature = "mock"))]
pub use self::mock::RecordingSleeper;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use super::Sleeper;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::RwLock;

    /// Records requested sleeps and returns immediately.
    #[derive(Debug, Default)]
    pub struct RecordingSleeper {
        calls: RwLock<Vec<Duration>>,
    }

    impl RecordingSleeper {
        pub async fn calls(&self) -> Vec<Duration> {
            self.calls.read().await.clone()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.calls.write().await.push(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_sleeper_does_not_sleep() {
        let sleeper = RecordingSleeper::default();
        sleeper.sleep(Duration::from_secs(3600)).await;
        sleeper.sleep(Duration::from_millis(5)).await;
        assert_eq!(sleeper.calls().await, vec![Duration::from_secs(3600), Duration::from_millis(5)]);
    }
}
