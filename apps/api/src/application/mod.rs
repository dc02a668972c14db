pub mod admin;
pub mod auth;
pub mod clustering;
pub mod manage_complaints;
pub mod notes;
pub mod social;
pub mod submit_complaint;
