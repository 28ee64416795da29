pub mod auth;
pub mod discussions;
pub mod register;
pub mod sessions;
