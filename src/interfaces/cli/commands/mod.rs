//! CLI 命令实现

pub mod analytics;
pub mod auth;
pub mod config_gen;
pub mod files;
mod helpers;
pub mod links;
pub mod tokens;
