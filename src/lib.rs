//! # Spread Matcher
//!
//! Priority-tiered, fair-share allocation of supply volume to demand volume.
//!
//! ## Architecture
//!
//! The matcher consists of:
//! - **Types**: Core data structures (Volume, Entity, PriorityNode, MatchResult)
//! - **Engine**: Plan validation, per-tier progressive filling, orchestration
//! - **Config**: Reference policy and leftover reporting
//! - **Logging**: Subscriber setup for the binary
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Identical inputs produce identical matches, in identical order
//! 2. **No Floating Point**: Volumes are non-negative integers, split with integer math
//! 3. **Fair Share**: Peers in a tier receive equal per-edge increments
//! 4. **Strict Precedence**: Lower tiers only see volume higher tiers left behind
//!
//! ## Example
//!
//! ```
//! use spread_matcher::{spread_match, Entity, PriorityNode, Side, Volume};
//!
//! let result = spread_match(
//!     &vec![vec![PriorityNode::with_peers("consumerA", ["generatorA"])]],
//!     &[
//!         vec![Entity::new("consumerA", 100u64)],
//!         vec![Entity::new("generatorA", 50u64)],
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(result.matched_volume(), Volume::new(50));
//! assert_eq!(result.leftover_for(Side::Demand, "consumerA"), Volume::new(50));
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Volume, Entity, PriorityNode, MatchResult
pub mod types;

/// Matching engine: tier planning and fair-share filling
pub mod engine;

/// Matcher configuration
pub mod config;

/// Error types
pub mod error;

/// Tracing subscriber setup
pub mod logging;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{MatcherConfig, ReferencePolicy};
pub use engine::{spread_match, MatchRequest, SpreadMatcher};
pub use error::{MatchError, VolumeError};
pub use types::{
    Entity, EntityGroups, LeftoverEntity, Match, MatchReceipt, MatchResult, PriorityForest,
    PriorityNode, PriorityTier, Side, Volume,
};
