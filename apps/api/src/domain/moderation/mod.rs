pub mod abuse_log;
pub mod repository;
