//! Entities on the two sides of a match.
//!
//! An invocation always works with exactly two disjoint groups: demand
//! (consumers) and supply (generators). Identity is the `id` string; the
//! volume is the declared quantity before matching.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Volume;

// ============================================================================
// Side enum
// ============================================================================

/// Which group an entity belongs to.
///
/// The discriminant doubles as the index into [`EntityGroups`]:
/// - Demand = 0
/// - Supply = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Entities that draw volume (consumers)
    Demand,
    /// Entities that give volume (generators)
    Supply,
}

impl Side {
    /// Position of this side's group in [`EntityGroups`]
    pub fn index(self) -> usize {
        match self {
            Side::Demand => 0,
            Side::Supply => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Demand => f.write_str("demand"),
            Side::Supply => f.write_str("supply"),
        }
    }
}

// ============================================================================
// Entity struct
// ============================================================================

/// A participant with a declared volume.
///
/// ## Example
///
/// ```
/// use spread_matcher::types::{Entity, Volume};
///
/// let consumer = Entity::new("consumerA", 100u64);
/// assert_eq!(consumer.volume, Volume::new(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Unique within its group
    pub id: String,

    /// Declared volume
    pub volume: Volume,
}

impl Entity {
    pub fn new(id: impl Into<String>, volume: impl Into<Volume>) -> Self {
        Self {
            id: id.into(),
            volume: volume.into(),
        }
    }
}

/// Demand group at index 0, supply group at index 1.
pub type EntityGroups = [Vec<Entity>; 2];
