//! Allocation context for a single matcher call.
//!
//! ## Design
//!
//! The ledger owns one slot per entity on each side, in entity-group order,
//! plus an id -> slot index per side. Remaining volumes start at the declared
//! volume and only ever decrease. The ledger is built fresh for every call
//! and dropped when the call returns, so no state leaks between runs.
//!
//! ```text
//! groups[Demand]: [consumerA:100, consumerB:100]
//! groups[Supply]: [generatorA:50, generatorB:150]
//! index[Supply]:  {"generatorA" -> 0, "generatorB" -> 1}
//! ```

use std::collections::HashMap;

use crate::error::{MatchError, Result};
use crate::types::{EntityGroups, LeftoverEntity, Side, Volume};

/// Bookkeeping for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub id: String,

    /// Volume not yet matched, starting at the declared volume
    pub remaining: Volume,
}

/// Remaining-volume counters for both sides.
#[derive(Debug, Clone)]
pub struct Ledger {
    groups: [Vec<Slot>; 2],
    index: [HashMap<String, usize>; 2],
}

impl Ledger {
    /// Build the ledger, rejecting duplicate ids within a group.
    pub fn from_groups(entity_groups: &EntityGroups) -> Result<Self> {
        let mut groups: [Vec<Slot>; 2] = Default::default();
        let mut index: [HashMap<String, usize>; 2] = Default::default();

        for side in [Side::Demand, Side::Supply] {
            let entities = &entity_groups[side.index()];
            let slots = &mut groups[side.index()];
            let lookup = &mut index[side.index()];
            slots.reserve(entities.len());
            lookup.reserve(entities.len());

            for entity in entities {
                if lookup.insert(entity.id.clone(), slots.len()).is_some() {
                    return Err(MatchError::DuplicateEntity {
                        side,
                        id: entity.id.clone(),
                    });
                }
                slots.push(Slot {
                    id: entity.id.clone(),
                    remaining: entity.volume,
                });
            }
        }

        Ok(Self { groups, index })
    }

    /// Slot position of `id` on `side`
    #[inline]
    pub fn position(&self, side: Side, id: &str) -> Option<usize> {
        self.index[side.index()].get(id).copied()
    }

    #[inline]
    pub fn remaining(&self, side: Side, pos: usize) -> Volume {
        self.groups[side.index()][pos].remaining
    }

    #[inline]
    pub fn id(&self, side: Side, pos: usize) -> &str {
        &self.groups[side.index()][pos].id
    }

    /// Number of entities on `side`
    #[inline]
    pub fn len(&self, side: Side) -> usize {
        self.groups[side.index()].len()
    }

    /// Move `volume` from a supply slot to a demand slot.
    ///
    /// Callers never transfer more than either side holds.
    pub fn transfer(&mut self, demand: usize, supply: usize, volume: Volume) {
        let d = &mut self.groups[Side::Demand.index()][demand];
        debug_assert!(volume <= d.remaining, "demand `{}` overdrawn", d.id);
        d.remaining = d.remaining.saturating_sub(volume);

        let s = &mut self.groups[Side::Supply.index()][supply];
        debug_assert!(volume <= s.remaining, "supply `{}` overdrawn", s.id);
        s.remaining = s.remaining.saturating_sub(volume);
    }

    /// Residual volumes per side in original order.
    ///
    /// Exhausted entities are included only when `include_exhausted` is set.
    pub fn leftovers(&self, include_exhausted: bool) -> [Vec<LeftoverEntity>; 2] {
        self.groups.clone().map(|slots| {
            slots
                .into_iter()
                .filter(|slot| include_exhausted || !slot.remaining.is_zero())
                .map(|slot| LeftoverEntity::new(slot.id, slot.remaining))
                .collect()
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
