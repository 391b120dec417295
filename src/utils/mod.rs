// src/utils/mod.rs

//! Utility functions and helpers.

pub mod http;
pub mod log;
pub mod url;

pub use url::normalize;
