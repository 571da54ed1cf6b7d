//! I/O helpers: configuration and page fetching.

pub mod config;
pub mod fetch;
