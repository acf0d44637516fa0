// Library interface for rust_anime_scraper
// This allows tests and the server binary to use the pipeline components

pub mod app_state;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod extract;
pub mod helpers;
pub mod http_client;
pub mod metadata;
pub mod models;
pub mod stream;
pub mod url_cache;
