//! Core cassview library (index access, session model, catalog, config).

pub mod agent;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod query;
pub mod session;
