pub mod profile;
pub mod templates;
