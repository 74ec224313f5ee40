pub mod config;
pub mod logging;

pub mod error;
pub mod fetcher;
mod http;
pub mod install;
pub mod listing;
pub mod manifest;
pub mod report;
pub mod scheduler;
pub mod storage;
