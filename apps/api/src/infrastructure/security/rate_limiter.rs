use redis::{AsyncCommands, Client};
use tracing::warn;

/// Fixed-window counter in Redis. Fails open when Redis is unreachable.
pub struct RateLimiter {
    client: Client,
    window_seconds: i64,
}

impl RateLimiter {
    pub fn new(client: Client, window_seconds: i64) -> Self {
        Self {
            client,
            window_seconds,
        }
    }

    /// Counts one hit against `key`; returns whether it is within `limit`.
    pub async fn check(&self, key: &str, limit: u32) -> bool {
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "Rate limiter unavailable, allowing request");
                return true;
            }
        };

        let k = format!("rl:{}", key);
        let count: u32 = match conn.incr(&k, 1).await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Rate limiter INCR failed, allowing request");
                return true;
            }
        };
        if count == 1 {
            let _: () = conn.expire(&k, self.window_seconds).await.unwrap_or(());
        }
        count <= limit
    }
}
