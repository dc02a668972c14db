pub mod abuse_detector;
pub mod password;
pub mod rate_limiter;
