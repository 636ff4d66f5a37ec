// Alert module for user-defined threshold rules over analysis statistics.
//
// Architecture:
// - model.rs: Condition configuration, results and severity policy
// - evaluator.rs: Resolves a condition's current value and compares it
// - engine.rs: Evaluates all enabled conditions and renders messages

pub mod engine;
pub mod evaluator;
pub mod model;
