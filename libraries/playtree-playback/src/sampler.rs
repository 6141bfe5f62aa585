//! Edge sampling
//!
//! Picks the next edge out of a node: keep the eligible edges (positive
//! shares, budget not exhausted), retain the highest priority tier, then
//! sample by shares. Counters key on edge identity, never on edge values,
//! which are ambiguous on duplicate edges.

use playtree_core::{EdgeIx, Node, NodeIx};
use rand::Rng;
use std::collections::HashMap;

/// Per-edge entry counters enforcing traversal budgets
#[derive(Debug, Clone, Default)]
pub struct EdgeCounters {
    counts: HashMap<EdgeIx, i64>,
}

impl EdgeCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Times an edge has been taken so far
    pub fn count(&self, edge: EdgeIx) -> i64 {
        self.counts.get(&edge).copied().unwrap_or(0)
    }

    /// Record one traversal of an edge
    pub fn record(&mut self, edge: EdgeIx) {
        *self.counts.entry(edge).or_insert(0) += 1;
    }
}

/// Pick the next edge out of `node`, or `None` when the playhead is done
///
/// An edge is eligible while `shares > 0` and its budget holds
/// (`limit < 0`, or the counter has not passed `limit`; an edge with
/// `limit = L ≥ 0` is taken at most `L + 1` times). Among eligible edges
/// only the highest priority tier is sampled; within the tier the pick is
/// share-weighted. The caller records the traversal when `limit ≥ 0`.
pub fn select_next_edge(
    node: &Node,
    node_ix: NodeIx,
    counters: &EdgeCounters,
    rng: &mut impl Rng,
) -> Option<usize> {
    let eligible: Vec<usize> = node
        .edges
        .iter()
        .enumerate()
        .filter(|(position, edge)| {
            edge.shares > 0
                && (edge.limit < 0
                    || counters.count(EdgeIx { node: node_ix, edge: *position }) <= edge.limit)
        })
        .map(|(position, _)| position)
        .collect();
    if eligible.is_empty() {
        return None;
    }

    let top = eligible.iter().map(|&pos| node.edges[pos].priority).max()?;
    let tier: Vec<usize> = eligible
        .into_iter()
        .filter(|&pos| node.edges[pos].priority == top)
        .collect();

    let total: u64 = tier.iter().map(|&pos| u64::from(node.edges[pos].shares)).sum();
    let sample = rng.gen_range(0..total);
    let mut upper = 0u64;
    for &pos in &tier {
        upper += u64::from(node.edges[pos].shares);
        if sample < upper {
            return Some(pos);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use playtree_core::types::{
        Playedge, Playitem, PlayitemKind, Playnode, PlaynodeKind, Playroot, Playscope, Plurality,
        Source,
    };
    use playtree_core::{validate, Playtree, PlaytreeDoc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn item(id: &str) -> Playitem {
        Playitem {
            id: id.to_string(),
            kind: PlayitemKind {
                source: Source::Local,
                plurality: Plurality::Single,
            },
            uri: format!("{id}.mp3"),
            name: id.to_string(),
            creator: String::new(),
            creator_uri: String::new(),
            exponent: 0,
            multiplier: 1,
            limit: -1,
        }
    }

    fn self_edge(priority: u32, shares: u32, limit: i64) -> Playedge {
        Playedge {
            target_id: "a".to_string(),
            priority,
            shares,
            limit,
        }
    }

    /// A single node "a" whose outgoing edges all loop back to itself
    fn tree_with_edges(edges: Vec<Playedge>) -> Playtree {
        let node = Playnode {
            id: "a".to_string(),
            name: "A".to_string(),
            kind: PlaynodeKind::Sequencer,
            repeat: 1,
            limit: -1,
            playscopes: Vec::new(),
            playitems: vec![item("i")],
            next: edges,
            position: None,
        };
        let doc = PlaytreeDoc {
            summary: playtree_core::types::Summary {
                id: "pt".to_string(),
                name: "T".to_string(),
                created_by: "u".to_string(),
                access: playtree_core::types::Access::Public,
            },
            playnodes: BTreeMap::from([("a".to_string(), node)]),
            playroots: BTreeMap::from([(
                "a".to_string(),
                Playroot {
                    index: 0,
                    name: "head".to_string(),
                },
            )]),
            playscopes: Vec::<Playscope>::new(),
        };
        validate(doc).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn no_edges_means_done() {
        let tree = tree_with_edges(Vec::new());
        let ix = tree.node_ix("a").unwrap();
        let pick = select_next_edge(tree.node(ix), ix, &EdgeCounters::new(), &mut rng());
        assert_eq!(pick, None);
    }

    #[test]
    fn zero_shares_is_ineligible() {
        let tree = tree_with_edges(vec![self_edge(0, 0, -1)]);
        let ix = tree.node_ix("a").unwrap();
        let pick = select_next_edge(tree.node(ix), ix, &EdgeCounters::new(), &mut rng());
        assert_eq!(pick, None);
    }

    #[test]
    fn higher_priority_excludes_lower() {
        // One eligible edge at priority 1, one heavily weighted at 0: the
        // higher tier always wins.
        let tree = tree_with_edges(vec![self_edge(1, 1, -1), self_edge(0, 100, -1)]);
        let ix = tree.node_ix("a").unwrap();
        let counters = EdgeCounters::new();
        let mut rng = rng();
        for _ in 0..200 {
            assert_eq!(select_next_edge(tree.node(ix), ix, &counters, &mut rng), Some(0));
        }
    }

    #[test]
    fn exhausted_tier_falls_through_to_lower_priority() {
        let tree = tree_with_edges(vec![self_edge(1, 1, 0), self_edge(0, 1, -1)]);
        let ix = tree.node_ix("a").unwrap();
        let mut counters = EdgeCounters::new();
        let mut rng = rng();

        // budget limit=0 allows exactly one traversal
        assert_eq!(select_next_edge(tree.node(ix), ix, &counters, &mut rng), Some(0));
        counters.record(EdgeIx { node: ix, edge: 0 });

        for _ in 0..50 {
            assert_eq!(select_next_edge(tree.node(ix), ix, &counters, &mut rng), Some(1));
        }
    }

    #[test]
    fn never_picks_over_budget_edge() {
        // Sampling never returns an edge whose counter has passed its
        // limit, no matter the counter state.
        let tree = tree_with_edges(vec![self_edge(0, 1, 2), self_edge(0, 3, -1)]);
        let ix = tree.node_ix("a").unwrap();
        let mut counters = EdgeCounters::new();
        let mut rng = rng();
        let mut first_edge_taken = 0;

        for _ in 0..1000 {
            let pick = select_next_edge(tree.node(ix), ix, &counters, &mut rng)
                .expect("the unlimited edge keeps the node alive");
            let edge = &tree.node(ix).edges[pick];
            if edge.limit >= 0 {
                let key = EdgeIx { node: ix, edge: pick };
                assert!(counters.count(key) <= edge.limit);
                counters.record(key);
            }
            if pick == 0 {
                first_edge_taken += 1;
            }
        }

        // limit 2 admits at most three traversals
        assert!(first_edge_taken <= 3);
        assert!(counters.count(EdgeIx { node: ix, edge: 0 }) <= 3);
    }

    #[test]
    fn share_weighted_frequencies_converge() {
        // shares 1:3 within one tier; chi-squared against the expected
        // quarter/three-quarter split, relaxed significance (df=1, p=0.001)
        let tree = tree_with_edges(vec![self_edge(0, 1, -1), self_edge(0, 3, -1)]);
        let ix = tree.node_ix("a").unwrap();
        let counters = EdgeCounters::new();
        let mut rng = rng();

        const DRAWS: usize = 8000;
        let mut observed = [0f64; 2];
        for _ in 0..DRAWS {
            let pick = select_next_edge(tree.node(ix), ix, &counters, &mut rng).unwrap();
            observed[pick] += 1.0;
        }

        let expected = [DRAWS as f64 * 0.25, DRAWS as f64 * 0.75];
        let chi_squared: f64 = observed
            .iter()
            .zip(expected.iter())
            .map(|(o, e)| (o - e).powi(2) / e)
            .sum();
        assert!(chi_squared < 10.83, "chi-squared {chi_squared} too large");
    }
}
