//! Top-level orchestration.
//!
//! Validates the request, then resolves demand tiers strictly in order
//! against the supply that higher tiers left behind, and finally collects
//! leftover demand and excess supply in original group order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MatcherConfig;
use crate::engine::ledger::Ledger;
use crate::engine::plan::Plan;
use crate::engine::tier::resolve_tier;
use crate::error::{MatchError, Result};
use crate::types::volume::VolumeText;
use crate::types::{Entity, EntityGroups, MatchResult, PriorityForest, Side, Volume};

/// Input of one matcher call, in its JSON wire shape.
///
/// [`from_json`](Self::from_json) is the checked way in from text: a bad
/// volume comes back as [`MatchError::InvalidVolume`] with its reason.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    /// Demand-side tiers, each demand node carrying its supply preference
    pub priority: PriorityForest,

    /// Demand group at index 0, supply group at index 1
    pub entity_groups: EntityGroups,
}

impl MatchRequest {
    pub fn new(priority: PriorityForest, entity_groups: EntityGroups) -> Self {
        Self {
            priority,
            entity_groups,
        }
    }

    /// Parse a request from JSON text.
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidVolume`] for a negative, fractional, out of range
    /// or non-numeric volume, [`MatchError::MalformedRequest`] for anything
    /// else the JSON layer rejects.
    pub fn from_json(text: &str) -> Result<Self> {
        let wire: WireRequest =
            serde_json::from_str(text).map_err(|e| MatchError::MalformedRequest(e.to_string()))?;

        let [demand, supply] = wire.entity_groups;
        Ok(Self {
            priority: wire.priority,
            entity_groups: [WireEntity::into_group(demand)?, WireEntity::into_group(supply)?],
        })
    }
}

/// Request as read off the wire, volumes still unparsed.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest {
    #[serde(default)]
    priority: PriorityForest,
    #[serde(default)]
    entity_groups: [Vec<WireEntity>; 2],
}

#[derive(Deserialize)]
struct WireEntity {
    id: String,
    volume: VolumeText,
}

impl WireEntity {
    fn into_group(group: Vec<WireEntity>) -> Result<Vec<Entity>> {
        group
            .into_iter()
            .map(|e| Ok(Entity::new(e.id, e.volume.0.parse::<Volume>()?)))
            .collect()
    }
}

/// The spread matcher.
///
/// Holds configuration only; every call builds and discards its own ledger,
/// so one instance can serve any number of calls, including concurrent ones.
///
/// ## Example
///
/// ```
/// use spread_matcher::{Entity, Match, PriorityNode, SpreadMatcher};
///
/// let matcher = SpreadMatcher::default();
/// let result = matcher
///     .run(
///         &vec![vec![PriorityNode::with_peers("consumerA", ["generatorA", "generatorB"])]],
///         &[
///             vec![Entity::new("consumerA", 100u64)],
///             vec![Entity::new("generatorA", 50u64), Entity::new("generatorB", 150u64)],
///         ],
///     )
///     .unwrap();
///
/// assert_eq!(
///     result.matches,
///     vec![
///         Match::new("consumerA", "generatorA", 50u64),
///         Match::new("consumerA", "generatorB", 50u64),
///     ]
/// );
/// assert_eq!(result.excess_supply()[0].volume.get(), 100);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpreadMatcher {
    config: MatcherConfig,
}

impl SpreadMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Match `entity_groups` following `priority`.
    ///
    /// # Errors
    ///
    /// Rejects duplicate ids, unknown references (under the strict policy),
    /// repeated peers and nested supply forests before any volume moves.
    pub fn run(
        &self,
        priority: &PriorityForest,
        entity_groups: &EntityGroups,
    ) -> Result<MatchResult> {
        let mut ledger = Ledger::from_groups(entity_groups)?;
        let plan = Plan::resolve(priority, &ledger, self.config.references)?;

        debug!(
            tiers = plan.tiers.len(),
            members = plan.member_count(),
            demand = ledger.len(Side::Demand),
            supply = ledger.len(Side::Supply),
            "spread matching started"
        );

        let mut matches = Vec::new();
        for (index, tier) in plan.tiers.iter().enumerate() {
            let tier_matches = resolve_tier(tier, &mut ledger);
            debug!(tier = index, matches = tier_matches.len(), "tier complete");
            matches.extend(tier_matches);
        }

        let result = MatchResult {
            matches,
            leftover_entities: ledger.leftovers(self.config.report_exhausted),
        };

        debug!(
            matches = result.matches.len(),
            matched = %result.matched_volume(),
            leftover = result.leftover_demand().len(),
            excess = result.excess_supply().len(),
            "spread matching finished"
        );

        Ok(result)
    }

    /// [`run`](Self::run) on a [`MatchRequest`].
    pub fn run_request(&self, request: &MatchRequest) -> Result<MatchResult> {
        self.run(&request.priority, &request.entity_groups)
    }
}

/// Match with the default configuration.
pub fn spread_match(
    priority: &PriorityForest,
    entity_groups: &EntityGroups,
) -> Result<MatchResult> {
    SpreadMatcher::default().run(priority, entity_groups)
}

// ============================================================================
// Unit Tests
// ============================================================================
