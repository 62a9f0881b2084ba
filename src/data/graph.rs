use std::collections::HashMap;

use serde::Deserialize;

pub type NodeId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Goal,
    Decision,
    Option,
    Action,
    Outcome,
    Observation,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Goal => "goal",
            Self::Decision => "decision",
            Self::Option => "option",
            Self::Action => "action",
            Self::Outcome => "outcome",
            Self::Observation => "observation",
        }
    }

    /// Fixed grouping order used by the chain details panel. Traversal output
    /// itself stays in BFS discovery order; this rank is presentation-only.
    pub fn display_rank(self) -> usize {
        match self {
            Self::Goal => 0,
            Self::Outcome => 1,
            Self::Decision => 2,
            Self::Option => 3,
            Self::Action => 4,
            Self::Observation => 5,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub title: String,
    pub description: Option<String>,
    /// Raw sidecar metadata as it appeared in the file. Interpreting it can
    /// fail per node; that failure never reaches the layout or traversal
    /// paths, only the detail presentation that calls `confidence`.
    pub metadata: Option<serde_json::Value>,
}

impl Node {
    pub fn confidence(&self) -> Option<f64> {
        let value = self.metadata.as_ref()?.get("confidence")?;
        match value {
            serde_json::Value::Number(number) => number.as_f64(),
            serde_json::Value::String(raw) => raw.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub edge_type: String,
    pub rationale: Option<String>,
}

/// The in-memory decision graph: node records plus directed edges and
/// adjacency lists. Adjacency preserves the file's edge order, which keeps
/// BFS discovery order stable across runs. Parallel edges between the same
/// pair stay distinct in `edges`; adjacency is deduplicated per neighbor.
#[derive(Clone, Debug, Default)]
pub struct DecisionGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    index_by_id: HashMap<NodeId, usize>,
    outgoing: HashMap<NodeId, Vec<NodeId>>,
    incoming: HashMap<NodeId, Vec<NodeId>>,
}

impl DecisionGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            index_by_id.insert(node.id, index);
        }

        let mut outgoing: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut incoming: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for edge in &edges {
            let forward = outgoing.entry(edge.from).or_default();
            if !forward.contains(&edge.to) {
                forward.push(edge.to);
            }
            let backward = incoming.entry(edge.to).or_default();
            if !backward.contains(&edge.from) {
                backward.push(edge.from);
            }
        }

        Self {
            nodes,
            edges,
            index_by_id,
            outgoing,
            incoming,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index_by_id.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index_by_id.get(&id).map(|&index| &self.nodes[index])
    }

    pub fn outgoing(&self, id: NodeId) -> &[NodeId] {
        self.outgoing.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn incoming(&self, id: NodeId) -> &[NodeId] {
        self.incoming.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes with no incoming edges, in node order. Used by the layered
    /// layout as layer-zero seeds.
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .map(|node| node.id)
            .filter(|id| self.incoming(*id).is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: NodeId, kind: NodeKind) -> Node {
        Node {
            id,
            kind,
            title: format!("node {id}"),
            description: None,
            metadata: None,
        }
    }

    fn edge(from: NodeId, to: NodeId) -> Edge {
        Edge {
            from,
            to,
            edge_type: "leads_to".to_owned(),
            rationale: None,
        }
    }

    #[test]
    fn adjacency_keeps_edge_order_and_dedupes_parallel_edges() {
        let graph = DecisionGraph::new(
            vec![
                node(1, NodeKind::Goal),
                node(2, NodeKind::Decision),
                node(3, NodeKind::Option),
            ],
            vec![edge(1, 3), edge(1, 2), edge(1, 2)],
        );

        assert_eq!(graph.outgoing(1), &[3, 2]);
        assert_eq!(graph.incoming(2), &[1]);
        // Parallel edges stay distinct as records.
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn roots_are_nodes_without_incoming_edges() {
        let graph = DecisionGraph::new(
            vec![
                node(1, NodeKind::Goal),
                node(2, NodeKind::Decision),
                node(3, NodeKind::Goal),
            ],
            vec![edge(1, 2)],
        );

        assert_eq!(graph.roots(), vec![1, 3]);
    }

    #[test]
    fn confidence_tolerates_malformed_metadata() {
        let mut with_string = node(1, NodeKind::Outcome);
        with_string.metadata = Some(serde_json::json!({ "confidence": "0.75" }));
        assert_eq!(with_string.confidence(), Some(0.75));

        let mut with_junk = node(2, NodeKind::Outcome);
        with_junk.metadata = Some(serde_json::json!({ "confidence": "high-ish" }));
        assert_eq!(with_junk.confidence(), None);

        assert_eq!(node(3, NodeKind::Outcome).confidence(), None);
    }
}
