//! Utility modules: configuration, errors, report writing, string helpers.

pub mod config;
pub mod errors;
pub mod file_handler;
pub mod string_utils;
