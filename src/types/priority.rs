//! Priority trees.
//!
//! ## Structure
//!
//! ```text
//! PriorityForest  = [PriorityTier, PriorityTier, ...]   highest priority first
//! PriorityTier    = [PriorityNode, PriorityNode, ...]   peers, equal claim
//! PriorityNode    = { id, sub_priority?: PriorityForest }
//! ```
//!
//! The top-level forest orders demand entities. Each demand node carries its
//! own forest over supply ids; supply nodes are leaves.
//!
//! ## Wire Format
//!
//! The nested forest is serialised under `priority`. `subPriority` is
//! accepted as an alias.

use serde::{Deserialize, Serialize};

/// A reference to an entity, optionally with its own preference tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityNode {
    /// Entity id on the side this node's list ranges over
    pub id: String,

    /// Preference over the opposite side, highest tier first
    #[serde(
        default,
        rename = "priority",
        alias = "subPriority",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub_priority: Option<PriorityForest>,
}

/// Peers with equal priority.
pub type PriorityTier = Vec<PriorityNode>;

/// Tiers in strict order, highest first.
pub type PriorityForest = Vec<PriorityTier>;

impl PriorityNode {
    /// A node with no preference of its own
    pub fn leaf(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sub_priority: None,
        }
    }

    /// A node carrying its own preference forest
    ///
    /// ```
    /// use spread_matcher::types::PriorityNode;
    ///
    /// let consumer = PriorityNode::with_priority(
    ///     "consumerA",
    ///     vec![vec![PriorityNode::leaf("generatorA"), PriorityNode::leaf("generatorB")]],
    /// );
    /// assert_eq!(consumer.sub_priority.unwrap()[0].len(), 2);
    /// ```
    pub fn with_priority(id: impl Into<String>, forest: PriorityForest) -> Self {
        Self {
            id: id.into(),
            sub_priority: Some(forest),
        }
    }

    /// Convenience for the common single-tier case: every target is a tied peer
    pub fn with_peers<I, S>(id: impl Into<String>, peers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tier = peers.into_iter().map(PriorityNode::leaf).collect();
        Self::with_priority(id, vec![tier])
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.sub_priority.is_none()
    }
}
