pub mod cluster;
pub mod complaint;
pub mod moderation;
pub mod notes;
pub mod shared;
pub mod social;
pub mod user;
