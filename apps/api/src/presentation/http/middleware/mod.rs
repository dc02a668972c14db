pub mod rate_limit;
pub mod request_id;
pub mod staff;
pub mod user;
