//! call-matcher: CLI и работа с Excel вокруг ядра `call_matcher_common`

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod reader;

