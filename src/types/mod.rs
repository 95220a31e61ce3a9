//! Core data types for the spread matcher
//!
//! ## Types
//!
//! - [`Volume`]: Non-negative integer quantity (u128, no floating point)
//! - [`Side`]: Demand or Supply
//! - [`Entity`]: An id with a declared volume
//! - [`PriorityNode`], [`PriorityTier`], [`PriorityForest`]: Preference trees
//! - [`Match`]: Volume exchanged between a demand and a supply entity
//! - [`LeftoverEntity`]: Residual volume after matching
//! - [`MatchResult`], [`MatchReceipt`]: Call output and its audit summary

pub mod volume;
mod entity;
mod priority;
mod outcome;

// Re-export all types at module level
pub use volume::Volume;
pub use entity::{Entity, EntityGroups, Side};
pub use priority::{PriorityForest, PriorityNode, PriorityTier};
pub use outcome::{LeftoverEntity, Match, MatchReceipt, MatchResult};
