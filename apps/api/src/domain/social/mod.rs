pub mod reaction;
pub mod repository;
