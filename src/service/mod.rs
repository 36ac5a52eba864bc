pub mod config;
pub mod gravatar;
pub mod profile;
pub mod session;
pub mod templates;
