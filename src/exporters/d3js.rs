use serde_derive::{Deserialize, Serialize};

use crate::node::{Entries, FrameNode};

/// Name of the synthetic child carrying an internal frame's own bytes.
pub const SELF_NODE_NAME: &str = "[self]";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
enum NodeKind {
    Value(u64),
    Children(Vec<Node>),
}

/// A node in the hierarchy format d3's treemap layout consumes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    #[serde(flatten)]
    kind: NodeKind,
}

impl Node {
    fn value(name: String, value: u64) -> Self {
        Self {
            name,
            kind: NodeKind::Value(value),
        }
    }
}

// Recursion is bounded by `max_depth`.
fn node_to_node(name: String, frame_node: &FrameNode, max_depth: u64) -> Node {
    if frame_node.is_leaf() || max_depth == 0 {
        return Node::value(name, frame_node.accumulated_allocation());
    }

    let mut children: Vec<Node> = frame_node
        .children()
        .iter()
        .map(|(name, child)| node_to_node(name.to_string(), child, max_depth - 1))
        .collect();
    // d3 only sums leaf values, so give the frame's own bytes a leaf.
    if frame_node.direct_allocation() > 0 {
        children.push(Node::value(
            SELF_NODE_NAME.to_string(),
            frame_node.direct_allocation(),
        ));
    }

    Node {
        name,
        kind: NodeKind::Children(children),
    }
}

/// Converts a forest into a single d3 hierarchy rooted at `"root"`.
///
/// Frames deeper than `max_depth` are folded into their ancestor's value.
pub fn export(entries: &Entries, max_depth: u64) -> Node {
    let children = entries
        .iter()
        .map(|(name, node)| node_to_node(name.to_string(), node, max_depth))
        .collect();
    let root = Node {
        name: "root".to_string(),
        kind: NodeKind::Children(children),
    };
    tracing::debug!(entries = entries.len(), max_depth, "exported d3 hierarchy");
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representation() {
        let structural = Node {
            name: "root".to_string(),
            kind: NodeKind::Children(vec![
                Node {
                    name: "a".to_string(),
                    kind: NodeKind::Value(1),
                },
                Node {
                    name: "b".to_string(),
                    kind: NodeKind::Children(vec![
                        Node {
                            name: "c".to_string(),
                            kind: NodeKind::Value(2),
                        },
                        Node {
                            name: "[self]".to_string(),
                            kind: NodeKind::Value(3),
                        },
                    ]),
                },
            ]),
        };

        let string: Node = serde_json::from_str(
            r#"
            {
                "name": "root",
                "children": [
                    {
                        "name": "a",
                        "value": 1
                    },
                    {
                        "name": "b",
                        "children": [
                            {
                                "name": "c",
                                "value": 2
                            },
                            {
                                "name": "[self]",
                                "value": 3
                            }
                        ]
                    }
                ]
            }
            "#,
        )
        .unwrap();

        assert_eq!(structural, string);
    }

    #[test]
    fn internal_allocation_becomes_self_child() {
        let entries = Entries::from([(
            "common".to_string(),
            FrameNode::with_children(10, [("leaf1", FrameNode::leaf(30))]),
        )]);

        let exported = export(&entries, 8);

        assert_eq!(
            exported,
            Node {
                name: "root".to_string(),
                kind: NodeKind::Children(vec![Node {
                    name: "common".to_string(),
                    kind: NodeKind::Children(vec![
                        Node::value("leaf1".to_string(), 30),
                        Node::value(SELF_NODE_NAME.to_string(), 10),
                    ]),
                }]),
            }
        );
    }

    #[test]
    fn depth_cut_keeps_accumulated_total() {
        let entries = Entries::from([(
            "common".to_string(),
            FrameNode::with_children(
                0,
                [("leaf1", FrameNode::leaf(30)), ("leaf2", FrameNode::leaf(40))],
            ),
        )]);

        let exported = export(&entries, 0);

        assert_eq!(
            exported,
            Node {
                name: "root".to_string(),
                kind: NodeKind::Children(vec![Node::value("common".to_string(), 70)]),
            }
        );
    }
}
