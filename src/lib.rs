pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod mapper;
pub mod models;
pub mod report;
pub mod walker;
