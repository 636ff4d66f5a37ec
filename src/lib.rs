#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
pub mod core;

pub use crate::core::alerts::engine::{evaluate_all, triggered_alerts, AlertEngine};
pub use crate::core::error::{InsightError, Result};
pub use crate::core::ranking::rank;
