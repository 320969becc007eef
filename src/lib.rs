pub mod app;
pub mod chain;
pub mod config;
pub mod feed;
pub mod ui;
