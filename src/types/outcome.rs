//! Match output types.
//!
//! A [`MatchResult`] lists every pair that exchanged volume plus the residual
//! volume on each side. [`MatchReceipt`] condenses a result into totals and a
//! SHA-256 digest so downstream settlement can verify it was not altered.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{Side, Volume};

/// Volume exchanged between one demand entity and one supply entity.
///
/// Only emitted for pairs with a positive volume.
///
/// ## Example
///
/// ```
/// use spread_matcher::types::{Match, Volume};
///
/// let m = Match::new("consumerA", "generatorA", 25u64);
/// assert_eq!(m.demand_id(), "consumerA");
/// assert_eq!(m.supply_id(), "generatorA");
/// assert_eq!(m.volume, Volume::new(25));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    /// `[demand_id, supply_id]`
    pub entities: [String; 2],

    /// Matched volume, always positive
    pub volume: Volume,
}

impl Match {
    pub fn new(
        demand_id: impl Into<String>,
        supply_id: impl Into<String>,
        volume: impl Into<Volume>,
    ) -> Self {
        Self {
            entities: [demand_id.into(), supply_id.into()],
            volume: volume.into(),
        }
    }

    #[inline]
    pub fn demand_id(&self) -> &str {
        &self.entities[0]
    }

    #[inline]
    pub fn supply_id(&self) -> &str {
        &self.entities[1]
    }
}

/// Volume an entity still holds after matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeftoverEntity {
    pub id: String,
    pub volume: Volume,
}

impl LeftoverEntity {
    pub fn new(id: impl Into<String>, volume: impl Into<Volume>) -> Self {
        Self {
            id: id.into(),
            volume: volume.into(),
        }
    }
}

/// Output of one matcher invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Matches in traversal order
    pub matches: Vec<Match>,

    /// Leftover demand at index 0, excess supply at index 1,
    /// each in original entity-group order
    pub leftover_entities: [Vec<LeftoverEntity>; 2],
}

impl MatchResult {
    /// Unsatisfied demand
    pub fn leftover_demand(&self) -> &[LeftoverEntity] {
        &self.leftover_entities[Side::Demand.index()]
    }

    /// Unused supply
    pub fn excess_supply(&self) -> &[LeftoverEntity] {
        &self.leftover_entities[Side::Supply.index()]
    }

    /// Sum of every match volume
    pub fn matched_volume(&self) -> Volume {
        self.matches.iter().map(|m| m.volume).sum()
    }

    /// Total volume matched for `id` on `side`
    pub fn matched_for(&self, side: Side, id: &str) -> Volume {
        self.matches
            .iter()
            .filter(|m| m.entities[side.index()] == id)
            .map(|m| m.volume)
            .sum()
    }

    /// Residual volume for `id` on `side`, zero when the entity is not listed
    pub fn leftover_for(&self, side: Side, id: &str) -> Volume {
        self.leftover_entities[side.index()]
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.volume)
            .unwrap_or(Volume::ZERO)
    }

    /// Condense this result into totals and a digest
    pub fn receipt(&self) -> MatchReceipt {
        MatchReceipt {
            match_count: self.matches.len() as u64,
            matched_volume: self.matched_volume(),
            leftover_demand: self.leftover_demand().iter().map(|e| e.volume).sum(),
            excess_supply: self.excess_supply().iter().map(|e| e.volume).sum(),
            digest: MatchReceipt::compute_hash(&self.canonical_bytes()),
        }
    }

    /// Deterministic byte encoding of the whole result.
    ///
    /// Layout per section: entry count (u64 LE), then per entry each id as
    /// length (u64 LE) + UTF-8 bytes, followed by the volume (u128 LE).
    /// Sections: matches, leftover demand, excess supply.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64 * (self.matches.len() + 1));

        buf.extend_from_slice(&(self.matches.len() as u64).to_le_bytes());
        for m in &self.matches {
            put_str(&mut buf, m.demand_id());
            put_str(&mut buf, m.supply_id());
            buf.extend_from_slice(&m.volume.to_le_bytes());
        }

        for group in &self.leftover_entities {
            buf.extend_from_slice(&(group.len() as u64).to_le_bytes());
            for e in group {
                put_str(&mut buf, &e.id);
                buf.extend_from_slice(&e.volume.to_le_bytes());
            }
        }

        buf
    }
}

fn put_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u64).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

/// Summary of a [`MatchResult`].
///
/// ## Digest
///
/// The 32-byte digest is SHA-256 over [`MatchResult::canonical_bytes`].
/// Identical inputs to the matcher always produce identical digests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReceipt {
    /// Number of matches emitted
    pub match_count: u64,

    /// Sum of all match volumes
    pub matched_volume: Volume,

    /// Sum of leftover demand
    pub leftover_demand: Volume,

    /// Sum of excess supply
    pub excess_supply: Volume,

    /// SHA-256 of the canonical encoding
    pub digest: [u8; 32],
}

impl MatchReceipt {
    /// Compute SHA-256 hash of the given data
    pub fn compute_hash(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let result = hasher.finalize();

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }

    /// Get the digest as a hex string
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// True when nothing was matched
    pub fn is_empty(&self) -> bool {
        self.match_count == 0
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
