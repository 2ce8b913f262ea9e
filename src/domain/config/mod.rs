//! Configuration domain module

mod app_config;

pub use app_config::{AppConfig, DEFAULT_LOCALE, DEFAULT_TIMEOUT_SECS};
