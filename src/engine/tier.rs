//! Fair-share resolution for one demand tier.
//!
//! ## Algorithm
//!
//! Progressive filling over the bipartite graph of active edges. An edge
//! `(d, s)` is active while `d` has demand left, `s` has supply left and `s`
//! sits in `d`'s current sub-tier (the first one with any supply left).
//!
//! Each round:
//!
//! 1. Every active entity offers `remaining / degree` per edge, where degree
//!    is its number of active edges.
//! 2. The smallest offer across both sides is the binding increment. If it
//!    is positive, every active edge receives exactly that increment.
//! 3. If it is zero, some entity holds fewer units than it has edges. The
//!    first such entity (demand members in tier order, then supply in group
//!    order) splits its remainder across its edges with
//!    [`splitter::split`], so the earliest peers get one unit each and the
//!    entity is exhausted.
//!
//! A positive round leaves the binding entity with `remaining < degree`, so
//! the round after it either exhausts an entity or runs with a smaller
//! degree because a counterpart was exhausted. Every two rounds at least one
//! entity leaves the active set, which bounds the loop.

use tracing::{debug, trace};

use crate::engine::ledger::Ledger;
use crate::engine::plan::TierPlan;
use crate::engine::splitter;
use crate::types::{Match, Side, Volume};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    /// Member index within the tier
    member: usize,
    /// Sub-tier index within the member's targets
    sub_tier: usize,
    /// Position within the sub-tier
    peer: usize,
    /// Supply slot
    supply: usize,
}

/// Per-tier working state.
struct TierResolver<'a> {
    tier: &'a TierPlan,

    /// Current sub-tier per member
    cursor: Vec<usize>,

    /// Accumulated volume per member / sub-tier / peer
    flows: Vec<Vec<Vec<Volume>>>,
}

impl<'a> TierResolver<'a> {
    fn new(tier: &'a TierPlan) -> Self {
        let flows = tier
            .members
            .iter()
            .map(|m| m.targets.iter().map(|t| vec![Volume::ZERO; t.len()]).collect())
            .collect();
        Self {
            tier,
            cursor: vec![0; tier.members.len()],
            flows,
        }
    }

    /// Move each member past sub-tiers whose supply is all used up.
    fn advance_cursors(&mut self, ledger: &Ledger) {
        for (m, member) in self.tier.members.iter().enumerate() {
            let cursor = &mut self.cursor[m];
            while *cursor < member.targets.len()
                && member.targets[*cursor]
                    .iter()
                    .all(|&s| ledger.remaining(Side::Supply, s).is_zero())
            {
                *cursor += 1;
            }
        }
    }

    fn active_edges(&self, ledger: &Ledger) -> Vec<Edge> {
        let mut edges = Vec::new();
        for (m, member) in self.tier.members.iter().enumerate() {
            if ledger.remaining(Side::Demand, member.demand).is_zero() {
                continue;
            }
            let sub_tier = self.cursor[m];
            let Some(peers) = member.targets.get(sub_tier) else {
                continue;
            };
            for (peer, &supply) in peers.iter().enumerate() {
                if !ledger.remaining(Side::Supply, supply).is_zero() {
                    edges.push(Edge {
                        member: m,
                        sub_tier,
                        peer,
                        supply,
                    });
                }
            }
        }
        edges
    }

    fn grant(&mut self, edge: Edge, volume: Volume, ledger: &mut Ledger) {
        let demand = self.tier.members[edge.member].demand;
        ledger.transfer(demand, edge.supply, volume);
        let flow = &mut self.flows[edge.member][edge.sub_tier][edge.peer];
        *flow = flow.saturating_add(volume);
    }

    /// Run rounds until no active edge remains. Returns the round count.
    fn run(&mut self, ledger: &mut Ledger) -> usize {
        let mut rounds = 0;
        let mut supply_degree = vec![0usize; ledger.len(Side::Supply)];

        loop {
            self.advance_cursors(ledger);
            let edges = self.active_edges(ledger);
            if edges.is_empty() {
                break;
            }
            rounds += 1;

            let mut member_degree = vec![0usize; self.tier.members.len()];
            supply_degree.iter_mut().for_each(|d| *d = 0);
            for edge in &edges {
                member_degree[edge.member] += 1;
                supply_degree[edge.supply] += 1;
            }

            let demand_offers = member_degree
                .iter()
                .enumerate()
                .filter(|&(_, &deg)| deg > 0)
                .map(|(m, &deg)| splitter::floor_share(self.member_remaining(m, ledger), deg));
            let supply_offers = supply_degree
                .iter()
                .enumerate()
                .filter(|&(_, &deg)| deg > 0)
                .map(|(s, &deg)| splitter::floor_share(ledger.remaining(Side::Supply, s), deg));
            let increment = demand_offers.chain(supply_offers).min().unwrap_or(Volume::ZERO);

            if !increment.is_zero() {
                trace!(round = rounds, edges = edges.len(), %increment, "uniform increment");
                for &edge in &edges {
                    self.grant(edge, increment, ledger);
                }
                continue;
            }

            // Some entity holds fewer units than it has edges
            let Some(holder) = self.remainder_holder(&member_degree, &supply_degree, ledger) else {
                debug_assert!(false, "zero increment without a remainder holder");
                break;
            };
            let peers: Vec<Edge> = edges.iter().copied().filter(|e| holder.owns(e)).collect();
            let remaining = match holder {
                Holder::Member(m) => self.member_remaining(m, ledger),
                Holder::Supply(s) => ledger.remaining(Side::Supply, s),
            };
            trace!(round = rounds, ?holder, %remaining, peers = peers.len(), "settling remainder");

            let parts = splitter::split(remaining, peers.len());
            for (edge, part) in peers.into_iter().zip(parts) {
                if !part.is_zero() {
                    self.grant(edge, part, ledger);
                }
            }
        }

        rounds
    }

    #[inline]
    fn member_remaining(&self, member: usize, ledger: &Ledger) -> Volume {
        ledger.remaining(Side::Demand, self.tier.members[member].demand)
    }

    fn remainder_holder(
        &self,
        member_degree: &[usize],
        supply_degree: &[usize],
        ledger: &Ledger,
    ) -> Option<Holder> {
        let short = |remaining: Volume, deg: usize| deg > 0 && remaining < Volume::new(deg as u128);

        let member = member_degree
            .iter()
            .enumerate()
            .find(|&(m, &deg)| short(self.member_remaining(m, ledger), deg))
            .map(|(m, _)| Holder::Member(m));

        member.or_else(|| {
            supply_degree
                .iter()
                .enumerate()
                .find(|&(s, &deg)| short(ledger.remaining(Side::Supply, s), deg))
                .map(|(s, _)| Holder::Supply(s))
        })
    }

    fn into_matches(self, ledger: &Ledger) -> Vec<Match> {
        let mut matches = Vec::new();
        for (member, member_flows) in self.tier.members.iter().zip(&self.flows) {
            let demand_id = ledger.id(Side::Demand, member.demand);
            for (peers, peer_flows) in member.targets.iter().zip(member_flows) {
                for (&supply, &volume) in peers.iter().zip(peer_flows) {
                    if !volume.is_zero() {
                        let supply_id = ledger.id(Side::Supply, supply);
                        matches.push(Match::new(demand_id, supply_id, volume));
                    }
                }
            }
        }
        matches
    }
}

/// Entity whose remainder is settled in a zero-increment round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Holder {
    Member(usize),
    Supply(usize),
}

impl Holder {
    fn owns(self, edge: &Edge) -> bool {
        match self {
            Holder::Member(m) => edge.member == m,
            Holder::Supply(s) => edge.supply == s,
        }
    }
}

/// Resolve one tier against the current ledger and return its matches in
/// traversal order: member order, then sub-tier order, then peer order.
pub fn resolve_tier(tier: &TierPlan, ledger: &mut Ledger) -> Vec<Match> {
    let mut resolver = TierResolver::new(tier);
    let rounds = resolver.run(ledger);
    let matches = resolver.into_matches(ledger);

    debug!(
        members = tier.members.len(),
        rounds,
        matches = matches.len(),
        matched = %matches.iter().map(|m| m.volume).sum::<Volume>(),
        "tier resolved"
    );

    matches
}

// ============================================================================
// Unit Tests
// ============================================================================
