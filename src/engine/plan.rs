//! Boundary validation.
//!
//! Turns the caller's id-based priority forest into a plan of slot positions
//! in the [`Ledger`]. Every rejection the matcher can produce happens here,
//! before any remaining-volume counter is touched.

use std::collections::HashSet;

use tracing::debug;

use crate::config::ReferencePolicy;
use crate::engine::ledger::Ledger;
use crate::error::{MatchError, Result};
use crate::types::{PriorityForest, PriorityTier, Side};

/// A demand entity and its supply preference, as slot positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Demand slot
    pub demand: usize,

    /// Supply slots per sub-tier, highest first, declaration order within
    pub targets: Vec<Vec<usize>>,
}

/// One demand-side tier of peers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TierPlan {
    pub members: Vec<Member>,
}

/// Validated priority forest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plan {
    pub tiers: Vec<TierPlan>,
}

impl Plan {
    /// Validate `forest` against `ledger`.
    pub fn resolve(
        forest: &PriorityForest,
        ledger: &Ledger,
        policy: ReferencePolicy,
    ) -> Result<Self> {
        let tiers = forest
            .iter()
            .map(|tier| resolve_tier(tier, ledger, policy))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { tiers })
    }

    /// Total number of demand members across tiers
    pub fn member_count(&self) -> usize {
        self.tiers.iter().map(|t| t.members.len()).sum()
    }
}

fn resolve_tier(tier: &PriorityTier, ledger: &Ledger, policy: ReferencePolicy) -> Result<TierPlan> {
    let mut seen = HashSet::with_capacity(tier.len());
    let mut members = Vec::with_capacity(tier.len());

    for node in tier {
        let Some(demand) = lookup(ledger, Side::Demand, &node.id, policy)? else {
            continue;
        };
        if !seen.insert(demand) {
            return Err(MatchError::DuplicatePeer { id: node.id.clone() });
        }

        let mut targets = Vec::new();
        for sub_tier in node.sub_priority.iter().flatten() {
            let mut peers = HashSet::with_capacity(sub_tier.len());
            let mut resolved = Vec::with_capacity(sub_tier.len());

            for target in sub_tier {
                if !target.is_leaf() {
                    return Err(MatchError::UnsupportedNesting { id: target.id.clone() });
                }
                let Some(supply) = lookup(ledger, Side::Supply, &target.id, policy)? else {
                    continue;
                };
                if !peers.insert(supply) {
                    return Err(MatchError::DuplicatePeer { id: target.id.clone() });
                }
                resolved.push(supply);
            }

            if !resolved.is_empty() {
                targets.push(resolved);
            }
        }

        members.push(Member { demand, targets });
    }

    Ok(TierPlan { members })
}

fn lookup(ledger: &Ledger, side: Side, id: &str, policy: ReferencePolicy) -> Result<Option<usize>> {
    match (ledger.position(side, id), policy) {
        (Some(pos), _) => Ok(Some(pos)),
        (None, ReferencePolicy::Lenient) => {
            debug!(%side, id, "skipping unknown entity in priority forest");
            Ok(None)
        }
        (None, ReferencePolicy::Strict) => Err(MatchError::DanglingReference {
            side,
            id: id.to_string(),
        }),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Entity, EntityGroups, PriorityNode};

    fn ledger() -> Ledger {
        let groups: EntityGroups = [
            vec![Entity::new("consumerA", 10u64), Entity::new("consumerB", 10u64)],
            vec![Entity::new("generatorA", 10u64), Entity::new("generatorB", 10u64)],
        ];
        Ledger::from_groups(&groups).unwrap()
    }

    #[test]
    fn test_resolve_positions() {
        let forest = vec![
            vec![PriorityNode::with_peers("consumerB", ["generatorB", "generatorA"])],
            vec![PriorityNode::with_priority(
                "consumerA",
                vec![
                    vec![PriorityNode::leaf("generatorA")],
                    vec![PriorityNode::leaf("generatorB")],
                ],
            )],
        ];
        let plan = Plan::resolve(&forest, &ledger(), ReferencePolicy::Strict).unwrap();

        assert_eq!(plan.tiers.len(), 2);
        assert_eq!(plan.member_count(), 2);
        assert_eq!(
            plan.tiers[0].members[0],
            Member {
                demand: 1,
                targets: vec![vec![1, 0]]
            }
        );
        assert_eq!(plan.tiers[1].members[0].targets, vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_strict_rejects_unknown_demand() {
        let forest = vec![vec![PriorityNode::with_peers("consumerZ", ["generatorA"])]];
        assert_eq!(
            Plan::resolve(&forest, &ledger(), ReferencePolicy::Strict).unwrap_err(),
            MatchError::DanglingReference {
                side: Side::Demand,
                id: "consumerZ".to_string()
            }
        );
    }

    #[test]
    fn test_strict_rejects_unknown_supply() {
        let forest = vec![vec![PriorityNode::with_peers("consumerA", ["generatorZ"])]];
        assert_eq!(
            Plan::resolve(&forest, &ledger(), ReferencePolicy::Strict).unwrap_err(),
            MatchError::DanglingReference {
                side: Side::Supply,
                id: "generatorZ".to_string()
            }
        );
    }

    #[test]
    fn test_supply_id_is_not_a_demand_id() {
        // Ids are resolved against the side they range over
        let forest = vec![vec![PriorityNode::with_peers("consumerA", ["consumerB"])]];
        assert!(matches!(
            Plan::resolve(&forest, &ledger(), ReferencePolicy::Strict),
            Err(MatchError::DanglingReference { side: Side::Supply, .. })
        ));
    }

    #[test]
    fn test_lenient_skips_unknown() {
        let forest = vec![vec![
            PriorityNode::with_peers("consumerA", ["generatorZ", "generatorA"]),
            PriorityNode::with_peers("consumerZ", ["generatorA"]),
            PriorityNode::with_peers("consumerB", ["generatorZ"]),
        ]];
        let plan = Plan::resolve(&forest, &ledger(), ReferencePolicy::Lenient).unwrap();

        let members = &plan.tiers[0].members;
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].targets, vec![vec![0]]);
        // Sub-tiers left empty are dropped
        assert!(members[1].targets.is_empty());
    }

    #[test]
    fn test_duplicate_peers_rejected() {
        let forest = vec![vec![
            PriorityNode::with_peers("consumerA", ["generatorA"]),
            PriorityNode::with_peers("consumerA", ["generatorB"]),
        ]];
        assert_eq!(
            Plan::resolve(&forest, &ledger(), ReferencePolicy::Strict).unwrap_err(),
            MatchError::DuplicatePeer {
                id: "consumerA".to_string()
            }
        );

        let repeated = PriorityNode::with_peers("consumerA", ["generatorA", "generatorA"]);
        let forest = vec![vec![repeated]];
        assert_eq!(
            Plan::resolve(&forest, &ledger(), ReferencePolicy::Strict).unwrap_err(),
            MatchError::DuplicatePeer {
                id: "generatorA".to_string()
            }
        );
    }

    #[test]
    fn test_same_demand_in_two_tiers_allowed() {
        let forest = vec![
            vec![PriorityNode::with_peers("consumerA", ["generatorA"])],
            vec![PriorityNode::with_peers("consumerA", ["generatorB"])],
        ];
        assert!(Plan::resolve(&forest, &ledger(), ReferencePolicy::Strict).is_ok());
    }

    #[test]
    fn test_nested_supply_forest_rejected() {
        let nested = PriorityNode::with_peers("generatorA", ["somethingElse"]);
        let forest = vec![vec![PriorityNode::with_priority("consumerA", vec![vec![nested]])]];
        assert_eq!(
            Plan::resolve(&forest, &ledger(), ReferencePolicy::Lenient).unwrap_err(),
            MatchError::UnsupportedNesting {
                id: "generatorA".to_string()
            }
        );
    }

    #[test]
    fn test_demand_without_preferences() {
        let forest = vec![vec![PriorityNode::leaf("consumerA")]];
        let plan = Plan::resolve(&forest, &ledger(), ReferencePolicy::Strict).unwrap();
        assert!(plan.tiers[0].members[0].targets.is_empty());
    }
}
