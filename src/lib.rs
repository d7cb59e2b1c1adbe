pub mod analytics;
pub mod config;
pub mod models;
pub mod slug;
pub mod storage;

pub mod api;
pub mod public;
