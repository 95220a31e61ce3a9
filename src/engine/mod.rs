//! Matching engine for the spread matcher.
//!
//! ## Design Principles
//!
//! The engine is designed for:
//!
//! 1. **Determinism**: Same input always produces same output
//! 2. **Integer Math**: No floating-point operations, remainders go to the
//!    earliest declared peer
//! 3. **Conservation**: Matched plus leftover always equals declared volume
//! 4. **Tier Precedence**: Higher tiers are resolved before lower tiers see
//!    any supply
//!
//! ## Pipeline
//!
//! ```text
//! EntityGroups --> Ledger --+
//!                           +--> Plan --> resolve_tier (per tier) --> MatchResult
//! PriorityForest -----------+
//! ```
//!
//! - [`ledger`]: remaining-volume counters for one call
//! - [`plan`]: boundary validation into slot positions
//! - [`splitter`]: even integer split with deterministic remainder
//! - [`tier`]: progressive filling within one tier
//! - [`matcher`]: tier ordering and leftover collection
//!
//! ## Example
//!
//! ```
//! use spread_matcher::engine::spread_match;
//! use spread_matcher::types::{Entity, PriorityNode, Side, Volume};
//!
//! let tied = ["generatorA", "generatorB"];
//! let result = spread_match(
//!     &vec![vec![
//!         PriorityNode::with_peers("consumerA", tied),
//!         PriorityNode::with_peers("consumerB", tied),
//!     ]],
//!     &[
//!         vec![Entity::new("consumerA", 150u64), Entity::new("consumerB", 100u64)],
//!         vec![Entity::new("generatorA", 50u64), Entity::new("generatorB", 150u64)],
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(result.matches.len(), 4);
//! assert_eq!(result.leftover_for(Side::Demand, "consumerA"), Volume::new(50));
//! ```

pub mod ledger;
pub mod matcher;
pub mod plan;
pub mod splitter;
pub mod tier;

pub use matcher::{spread_match, MatchRequest, SpreadMatcher};
