use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use super::graph::{NodeId, NodeKind};

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawGraphFile {
    #[serde(default)]
    pub(super) nodes: Vec<RawNode>,
    #[serde(default)]
    pub(super) edges: Vec<RawEdge>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawNode {
    pub(super) id: NodeId,
    #[serde(rename = "type")]
    pub(super) kind: NodeKind,
    pub(super) title: String,
    #[serde(default)]
    pub(super) description: Option<String>,
    #[serde(default)]
    pub(super) metadata: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawEdge {
    #[serde(rename = "from_node_id")]
    pub(super) from: NodeId,
    #[serde(rename = "to_node_id")]
    pub(super) to: NodeId,
    #[serde(default = "default_edge_type", rename = "edge_type")]
    pub(super) edge_type: String,
    #[serde(default)]
    pub(super) rationale: Option<String>,
}

fn default_edge_type() -> String {
    "relates_to".to_owned()
}

pub(super) fn parse_graph_file(raw: &str) -> Result<RawGraphFile> {
    let parsed: RawGraphFile =
        serde_json::from_str(raw).context("invalid decision graph JSON")?;

    if parsed.nodes.is_empty() {
        return Err(anyhow!("decision graph file contains no nodes"));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_graph() {
        let raw = r#"{
            "nodes": [
                { "id": 1, "type": "goal", "title": "Ship v2" },
                { "id": 2, "type": "decision", "title": "Pick a stack", "description": "backend" }
            ],
            "edges": [
                { "from_node_id": 1, "to_node_id": 2, "edge_type": "motivates" }
            ]
        }"#;

        let parsed = parse_graph_file(raw).unwrap();
        assert_eq!(parsed.nodes.len(), 2);
        assert_eq!(parsed.nodes[0].kind, NodeKind::Goal);
        assert_eq!(parsed.edges[0].edge_type, "motivates");
    }

    #[test]
    fn missing_edge_type_gets_a_default() {
        let raw = r#"{
            "nodes": [{ "id": 1, "type": "action", "title": "do it" }],
            "edges": [{ "from_node_id": 1, "to_node_id": 1 }]
        }"#;

        let parsed = parse_graph_file(raw).unwrap();
        assert_eq!(parsed.edges[0].edge_type, "relates_to");
    }

    #[test]
    fn empty_node_list_is_an_error() {
        assert!(parse_graph_file(r#"{ "nodes": [], "edges": [] }"#).is_err());
    }

    #[test]
    fn malformed_metadata_survives_parsing() {
        let raw = r#"{
            "nodes": [{
                "id": 7, "type": "outcome", "title": "landed",
                "metadata": { "confidence": "not-a-number" }
            }],
            "edges": []
        }"#;

        let parsed = parse_graph_file(raw).unwrap();
        assert!(parsed.nodes[0].metadata.is_some());
    }
}
