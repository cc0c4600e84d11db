// src/infrastructure/queue/mod.rs
mod disabled;
mod memory;
mod redis;

pub use disabled::DisabledPublishQueue;
pub use memory::InMemoryPublishQueue;
pub use redis::RedisPublishQueue;

use std::time::Duration;

/// Retry policy shared by the queue backends: 3 attempts, exponential
/// backoff starting at 2 seconds and doubling each attempt.
pub(crate) const MAX_ATTEMPTS: u32 = 3;
pub(crate) const BASE_BACKOFF: Duration = Duration::from_secs(2);

pub(crate) fn backoff_for_attempt(attempt: u32, base: Duration) -> Duration {
    base * 2u32.saturating_pow(attempt.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_for_attempt(1, BASE_BACKOFF), Duration::from_secs(2));
        assert_eq!(backoff_for_attempt(2, BASE_BACKOFF), Duration::from_secs(4));
        assert_eq!(backoff_for_attempt(3, BASE_BACKOFF), Duration::from_secs(8));
    }
}
