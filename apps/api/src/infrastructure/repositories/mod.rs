pub mod in_memory;
pub mod sqlx_abuse_log_repository;
pub mod sqlx_cluster_repository;
pub mod sqlx_complaint_repository;
pub mod sqlx_notes_repository;
pub mod sqlx_social_repository;
pub mod sqlx_user_repository;
