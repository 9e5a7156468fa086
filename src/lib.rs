pub mod catalog;
pub mod classify;
pub mod cli;
pub mod config;
pub mod consent;
pub mod donation;
pub mod flow;
pub mod logsink;
pub mod model;
pub mod platform;
pub mod progress;
pub mod session;
pub mod util;
