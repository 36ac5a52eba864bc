pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod page;
pub mod pagination;
pub mod service;
pub mod state;
