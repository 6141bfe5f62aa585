//! Property tests for edge sampling
//!
//! Whatever the edge set and counter state, sampling must never return an
//! over-budget, zero-share or lower-tier edge, and must return `None`
//! exactly when nothing is eligible.

use playtree_core::types::{
    Access, Playedge, Playitem, PlayitemKind, Playnode, PlaynodeKind, Plurality, Source, Summary,
};
use playtree_core::{validate, EdgeIx, Playtree, PlaytreeDoc};
use playtree_playback::sampler::{select_next_edge, EdgeCounters};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

fn lone_item() -> Playitem {
    Playitem {
        id: "i".to_string(),
        kind: PlayitemKind {
            source: Source::Local,
            plurality: Plurality::Single,
        },
        uri: "i.mp3".to_string(),
        name: "I".to_string(),
        creator: String::new(),
        creator_uri: String::new(),
        exponent: 0,
        multiplier: 1,
        limit: -1,
    }
}

/// A single node "a" whose outgoing edges all loop back to itself
fn self_loop_tree(edges: Vec<Playedge>) -> Playtree {
    let node = Playnode {
        id: "a".to_string(),
        name: "A".to_string(),
        kind: PlaynodeKind::Sequencer,
        repeat: 1,
        limit: -1,
        playscopes: Vec::new(),
        playitems: vec![lone_item()],
        next: edges,
        position: None,
    };
    let doc = PlaytreeDoc {
        summary: Summary {
            id: "pt".to_string(),
            name: "T".to_string(),
            created_by: "u".to_string(),
            access: Access::Public,
        },
        playnodes: BTreeMap::from([("a".to_string(), node)]),
        playroots: BTreeMap::new(),
        playscopes: Vec::new(),
    };
    validate(doc).expect("self-loop tree is valid")
}

fn arb_edges() -> impl Strategy<Value = Vec<(u32, u32, i64, i64)>> {
    // (priority, shares, limit, recorded traversals)
    prop::collection::vec(
        (0u32..4, 0u32..5, prop_oneof![Just(-1i64), 0i64..4], 0i64..6),
        0..6,
    )
}

proptest! {
    #[test]
    fn sampling_respects_budgets_and_tiers(edges in arb_edges(), seed in any::<u64>()) {
        let playedges = edges
            .iter()
            .map(|&(priority, shares, limit, _)| Playedge {
                target_id: "a".to_string(),
                priority,
                shares,
                limit,
            })
            .collect();
        let tree = self_loop_tree(playedges);
        let ix = tree.node_ix("a").unwrap();

        let mut counters = EdgeCounters::new();
        for (position, &(_, _, _, taken)) in edges.iter().enumerate() {
            for _ in 0..taken {
                counters.record(EdgeIx { node: ix, edge: position });
            }
        }

        let node = tree.node(ix);
        let eligible: Vec<usize> = node
            .edges
            .iter()
            .enumerate()
            .filter(|(position, edge)| {
                edge.shares > 0
                    && (edge.limit < 0
                        || counters.count(EdgeIx { node: ix, edge: *position }) <= edge.limit)
            })
            .map(|(position, _)| position)
            .collect();

        let mut rng = StdRng::seed_from_u64(seed);
        match select_next_edge(node, ix, &counters, &mut rng) {
            None => prop_assert!(eligible.is_empty()),
            Some(pick) => {
                prop_assert!(eligible.contains(&pick));
                let top = eligible.iter().map(|&p| node.edges[p].priority).max().unwrap();
                prop_assert_eq!(node.edges[pick].priority, top);
            }
        }
    }
}
