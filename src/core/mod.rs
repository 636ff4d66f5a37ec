pub mod alerts;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod ranking;
pub mod scoring;
pub mod source;
