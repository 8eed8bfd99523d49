pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod share;
pub mod summarize;
