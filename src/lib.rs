// Managed database inventory + metric history. Library for the binary, demos and tests.

pub mod collector;
pub mod config;
pub mod error;
pub mod history_repo;
pub mod inventory;
pub mod models;
pub mod version;
