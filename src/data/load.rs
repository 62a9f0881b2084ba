use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use super::graph::{DecisionGraph, Edge, Node};
use super::parse::parse_graph_file;

/// Reads and assembles a decision graph from a JSON file. Edges that point
/// at unknown node ids are dropped (with a warning) rather than failing the
/// whole load; duplicate node ids fail loudly since downstream lookups
/// assume uniqueness.
pub fn load_decision_graph(path: &str) -> Result<DecisionGraph> {
    let raw = fs::read_to_string(Path::new(path))
        .with_context(|| format!("failed to read decision graph file {path}"))?;
    let parsed = parse_graph_file(&raw)
        .with_context(|| format!("failed to parse decision graph file {path}"))?;

    let mut seen = HashSet::with_capacity(parsed.nodes.len());
    let mut nodes = Vec::with_capacity(parsed.nodes.len());
    for raw_node in parsed.nodes {
        if !seen.insert(raw_node.id) {
            return Err(anyhow!("duplicate node id {} in {path}", raw_node.id));
        }
        nodes.push(Node {
            id: raw_node.id,
            kind: raw_node.kind,
            title: raw_node.title,
            description: raw_node.description,
            metadata: raw_node.metadata,
        });
    }

    let mut edges = Vec::with_capacity(parsed.edges.len());
    let mut dangling = 0usize;
    for raw_edge in parsed.edges {
        if !seen.contains(&raw_edge.from) || !seen.contains(&raw_edge.to) {
            dangling += 1;
            continue;
        }
        edges.push(Edge {
            from: raw_edge.from,
            to: raw_edge.to,
            edge_type: raw_edge.edge_type,
            rationale: raw_edge.rationale,
        });
    }

    if dangling > 0 {
        warn!("dropped {dangling} edges referencing unknown node ids in {path}");
    }

    let graph = DecisionGraph::new(nodes, edges);
    info!(
        "loaded decision graph from {path}: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    Ok(graph)
}
