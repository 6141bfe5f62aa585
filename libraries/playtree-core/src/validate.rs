//! Semantic validation
//!
//! Admits a parsed document as a legal playtree or reports the first
//! violated invariant. One pass, three sweeps: structural, referential,
//! head discipline. The core never repairs a document.

use crate::document::PlaytreeDoc;
use crate::error::{PlaytreeError, Result};
use crate::graph::{Edge, HeadAnchor, Node, NodeIx, Playtree};
use std::collections::{HashMap, HashSet};

/// Validate a parsed document, yielding the immutable graph
pub fn validate(doc: PlaytreeDoc) -> Result<Playtree> {
    let PlaytreeDoc {
        summary,
        playnodes,
        playroots,
        playscopes,
    } = doc;

    // ----- structural sweep -----

    let mut scope_ids = HashSet::new();
    for scope in &playscopes {
        if !scope_ids.insert(scope.id) {
            return Err(PlaytreeError::DuplicateScope { id: scope.id });
        }
    }

    for (key, node) in &playnodes {
        if *key != node.id {
            return Err(PlaytreeError::NodeKeyMismatch {
                key: key.clone(),
                id: node.id.clone(),
            });
        }
        if node.playitems.is_empty() {
            return Err(PlaytreeError::EmptyPlayitems {
                id: node.id.clone(),
            });
        }
        if node.limit < -1 {
            return Err(PlaytreeError::LimitOutOfRange {
                entity: "playnode",
                id: node.id.clone(),
                limit: node.limit,
            });
        }
        for item in &node.playitems {
            if item.limit < -1 {
                return Err(PlaytreeError::LimitOutOfRange {
                    entity: "playitem",
                    id: item.id.clone(),
                    limit: item.limit,
                });
            }
        }
        for edge in &node.next {
            if edge.limit < -1 {
                return Err(PlaytreeError::LimitOutOfRange {
                    entity: "playedge",
                    id: format!("{} => {}", node.id, edge.target_id),
                    limit: edge.limit,
                });
            }
        }
    }

    // ----- referential sweep -----

    for node in playnodes.values() {
        for edge in &node.next {
            if !playnodes.contains_key(&edge.target_id) {
                return Err(PlaytreeError::UnknownTarget {
                    node: node.id.clone(),
                    target: edge.target_id.clone(),
                });
            }
        }
        for scope in &node.playscopes {
            if !scope_ids.contains(scope) {
                return Err(PlaytreeError::UnknownScope {
                    node: node.id.clone(),
                    scope: *scope,
                });
            }
        }
    }

    for node_id in playroots.keys() {
        if !playnodes.contains_key(node_id) {
            return Err(PlaytreeError::PlayrootOnUnknownNode {
                node: node_id.clone(),
            });
        }
    }

    // ----- head discipline sweep -----
    //
    // At most one playroot per node is inherent in the map shape; what is
    // left to check is that the indices are a dense permutation of [0, N).

    let count = playroots.len() as u32;
    let mut claimed = HashSet::new();
    for root in playroots.values() {
        if !claimed.insert(root.index) {
            return Err(PlaytreeError::DuplicatePlayrootIndex { index: root.index });
        }
    }
    for index in 0..count {
        if !claimed.contains(&index) {
            return Err(PlaytreeError::MissingPlayrootIndex { index });
        }
    }

    // ----- arena construction -----
    //
    // Two passes, as when wiring any cyclic graph: assign arena slots
    // first, then resolve edges against the finished id table.

    let mut ids = HashMap::with_capacity(playnodes.len());
    for (ix, id) in playnodes.keys().enumerate() {
        ids.insert(id.clone(), NodeIx(ix));
    }

    let mut anchors: Vec<Option<HeadAnchor>> = vec![None; playroots.len()];
    for (node_id, root) in &playroots {
        anchors[root.index as usize] = Some(HeadAnchor {
            name: root.name.clone(),
            node: ids[node_id.as_str()],
        });
    }
    let anchors = anchors.into_iter().flatten().collect();

    let nodes = playnodes
        .into_values()
        .map(|node| Node {
            edges: node
                .next
                .iter()
                .map(|edge| Edge {
                    target: ids[edge.target_id.as_str()],
                    priority: edge.priority,
                    shares: edge.shares,
                    limit: edge.limit,
                })
                .collect(),
            id: node.id,
            name: node.name,
            kind: node.kind,
            repeat: node.repeat,
            limit: node.limit,
            scopes: node.playscopes,
            playitems: node.playitems,
        })
        .collect();

    Ok(Playtree {
        summary,
        nodes,
        ids,
        anchors,
        playscopes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlaytreeDoc;

    fn doc(json: &str) -> PlaytreeDoc {
        PlaytreeDoc::from_str(json).expect("document should parse")
    }

    fn two_node_doc() -> String {
        r#"{
            "summary": { "id": "pt", "name": "T", "createdBy": "u1", "access": "public" },
            "playnodes": {
                "a": {
                    "id": "a", "name": "A", "type": "sequencer",
                    "playitems": [
                        { "id": "i1", "type": { "source": "local", "plurality": "single" },
                          "uri": "a.mp3", "name": "A1" }
                    ],
                    "next": [ { "targetID": "b" } ]
                },
                "b": {
                    "id": "b", "name": "B", "type": "selector",
                    "playitems": [
                        { "id": "i2", "type": { "source": "local", "plurality": "single" },
                          "uri": "b.mp3", "name": "B1" }
                    ]
                }
            },
            "playroots": {
                "a": { "index": 0, "name": "first" },
                "b": { "index": 1, "name": "second" }
            },
            "playscopes": [ { "id": 0, "name": "mood", "color": "teal" } ]
        }"#
        .to_string()
    }

    #[test]
    fn accepts_two_node_graph() {
        let tree = validate(doc(&two_node_doc())).unwrap();
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.anchors().len(), 2);
        assert_eq!(tree.anchors()[0].name, "first");
        assert_eq!(tree.anchors()[1].name, "second");

        let a = tree.node_by_id("a").unwrap();
        assert_eq!(a.edges.len(), 1);
        assert_eq!(tree.node(a.edges[0].target).id, "b");
    }

    #[test]
    fn accepts_self_cycle() {
        let json = two_node_doc().replace(r#""targetID": "b""#, r#""targetID": "a""#);
        let tree = validate(doc(&json)).unwrap();
        let a = tree.node_by_id("a").unwrap();
        assert_eq!(tree.node(a.edges[0].target).id, "a");
    }

    #[test]
    fn rejects_node_key_mismatch() {
        let json = two_node_doc().replace(r#""id": "b", "name": "B""#, r#""id": "c", "name": "B""#);
        let err = validate(doc(&json)).unwrap_err();
        assert!(matches!(err, PlaytreeError::NodeKeyMismatch { ref key, ref id } if key == "b" && id == "c"));
    }

    #[test]
    fn rejects_empty_playitems() {
        let json = two_node_doc().replace(
            r#"[
                        { "id": "i2", "type": { "source": "local", "plurality": "single" },
                          "uri": "b.mp3", "name": "B1" }
                    ]"#,
            "[]",
        );
        let err = validate(doc(&json)).unwrap_err();
        assert!(matches!(err, PlaytreeError::EmptyPlayitems { ref id } if id == "b"));
    }

    #[test]
    fn rejects_limit_below_minus_one() {
        let json = two_node_doc().replace(r#"{ "targetID": "b" }"#, r#"{ "targetID": "b", "limit": -2 }"#);
        let err = validate(doc(&json)).unwrap_err();
        assert!(matches!(err, PlaytreeError::LimitOutOfRange { limit: -2, .. }));
    }

    #[test]
    fn rejects_dangling_edge_target() {
        let json = two_node_doc().replace(r#""targetID": "b""#, r#""targetID": "ghost""#);
        let err = validate(doc(&json)).unwrap_err();
        assert!(matches!(err, PlaytreeError::UnknownTarget { ref target, .. } if target == "ghost"));
    }

    #[test]
    fn rejects_unknown_scope() {
        let json = two_node_doc().replace(
            r#""id": "a", "name": "A", "type": "sequencer","#,
            r#""id": "a", "name": "A", "type": "sequencer", "playscopes": [7],"#,
        );
        let err = validate(doc(&json)).unwrap_err();
        assert!(matches!(err, PlaytreeError::UnknownScope { scope: 7, .. }));
    }

    #[test]
    fn rejects_duplicate_scope_id() {
        let json = two_node_doc().replace(
            r#"[ { "id": 0, "name": "mood", "color": "teal" } ]"#,
            r#"[ { "id": 0, "name": "mood", "color": "teal" },
                 { "id": 0, "name": "tempo", "color": "red" } ]"#,
        );
        let err = validate(doc(&json)).unwrap_err();
        assert!(matches!(err, PlaytreeError::DuplicateScope { id: 0 }));
    }

    #[test]
    fn rejects_playroot_on_absent_node() {
        let json = two_node_doc().replace(
            r#""b": { "index": 1, "name": "second" }"#,
            r#""ghost": { "index": 1, "name": "second" }"#,
        );
        let err = validate(doc(&json)).unwrap_err();
        assert!(matches!(err, PlaytreeError::PlayrootOnUnknownNode { ref node } if node == "ghost"));
    }

    #[test]
    fn rejects_duplicate_playroot_index() {
        let json = two_node_doc().replace(r#""index": 1, "name": "second""#, r#""index": 0, "name": "second""#);
        let err = validate(doc(&json)).unwrap_err();
        assert!(matches!(err, PlaytreeError::DuplicatePlayrootIndex { index: 0 }));
    }

    #[test]
    fn rejects_sparse_playroot_indices() {
        // Indices {0, 2} on two playroots: index 1 is missing.
        let json = two_node_doc().replace(r#""index": 1, "name": "second""#, r#""index": 2, "name": "second""#);
        let err = validate(doc(&json)).unwrap_err();
        assert!(matches!(err, PlaytreeError::MissingPlayrootIndex { index: 1 }));
        assert!(err.to_string().contains("index 1 missing"));
    }

    #[test]
    fn playroot_indices_cover_zero_to_n() {
        // Any accepted document has playroot indices forming exactly [0, N).
        let tree = validate(doc(&two_node_doc())).unwrap();
        let n = tree.anchors().len();
        assert_eq!(n, 2);
        // anchors() is ordered by index, one anchor per slot
        assert!(tree.anchors().iter().all(|a| tree.node(a.node).id == "a"
            || tree.node(a.node).id == "b"));
    }

    #[test]
    fn rejection_is_deterministic() {
        // Byte-identical re-input must name the same first violation.
        let json = two_node_doc()
            .replace(r#""targetID": "b""#, r#""targetID": "ghost""#)
            .replace(r#""index": 1, "name": "second""#, r#""index": 2, "name": "second""#);
        let first = validate(doc(&json)).unwrap_err().to_string();
        for _ in 0..16 {
            assert_eq!(validate(doc(&json)).unwrap_err().to_string(), first);
        }
    }

    #[test]
    fn accepts_empty_playroots() {
        let json = two_node_doc().replace(
            r#""a": { "index": 0, "name": "first" },
                "b": { "index": 1, "name": "second" }"#,
            "",
        );
        let tree = validate(doc(&json)).unwrap();
        assert!(tree.anchors().is_empty());
    }
}
