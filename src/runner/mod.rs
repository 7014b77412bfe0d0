//! Planning and execution engine
//!
//! This module holds the task model, the dependency planner that turns a
//! requested task into a plan, and the executor that runs that plan.

pub mod context;
pub mod executor;
pub mod interpolate;
pub mod plan;
pub mod planner;
pub mod task;

// Re-export main types
pub use context::*;
pub use executor::*;
pub use interpolate::*;
pub use plan::*;
pub use planner::*;
pub use task::*;
