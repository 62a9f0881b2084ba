use std::collections::HashMap;

use eframe::egui::vec2;

use crate::data::{DecisionGraph, NodeId};

use super::visibility::GeometryEntry;

const LAYER_SPACING: f32 = 170.0;
const COLUMN_SPACING: f32 = 240.0;
const NODE_HEIGHT: f32 = 56.0;
const NODE_MIN_WIDTH: f32 = 120.0;
const NODE_MAX_WIDTH: f32 = 260.0;

/// Assigns base positions and sizes in graph coordinates: a simple layered
/// layout where a node's layer is its longest path from any root, layers
/// are rows, and rows are centered around the origin. This plays the
/// geometry-provider role; visibility and callout computation only ever see
/// its output map.
pub fn layered_layout(graph: &DecisionGraph) -> HashMap<NodeId, GeometryEntry> {
    let layers = assign_layers(graph);

    let mut by_layer: Vec<Vec<NodeId>> = Vec::new();
    for node in &graph.nodes {
        let layer = layers.get(&node.id).copied().unwrap_or(0);
        if by_layer.len() <= layer {
            by_layer.resize(layer + 1, Vec::new());
        }
        by_layer[layer].push(node.id);
    }

    let layer_count = by_layer.len();
    let mut geometry = HashMap::with_capacity(graph.node_count());

    for (layer, ids) in by_layer.iter().enumerate() {
        let row_offset = (ids.len() as f32 - 1.0) * 0.5;
        let y = (layer as f32 - (layer_count as f32 - 1.0) * 0.5) * LAYER_SPACING;

        for (column, &id) in ids.iter().enumerate() {
            let width = graph
                .node(id)
                .map(|node| {
                    (90.0 + node.title.chars().count() as f32 * 7.0)
                        .clamp(NODE_MIN_WIDTH, NODE_MAX_WIDTH)
                })
                .unwrap_or(NODE_MIN_WIDTH);

            geometry.insert(
                id,
                GeometryEntry {
                    center: vec2((column as f32 - row_offset) * COLUMN_SPACING, y),
                    size: vec2(width, NODE_HEIGHT),
                },
            );
        }
    }

    geometry
}

/// Longest-path layering via Kahn's algorithm. Nodes stuck in a cycle never
/// reach in-degree zero; they are dropped to layer zero rather than looping.
fn assign_layers(graph: &DecisionGraph) -> HashMap<NodeId, usize> {
    let mut in_degree = HashMap::with_capacity(graph.node_count());
    for node in &graph.nodes {
        in_degree.insert(node.id, graph.incoming(node.id).len());
    }

    let mut layers: HashMap<NodeId, usize> = HashMap::with_capacity(graph.node_count());
    let mut ready = graph.roots();
    for id in &ready {
        layers.insert(*id, 0);
    }

    while let Some(current) = ready.pop() {
        let current_layer = layers.get(&current).copied().unwrap_or(0);
        for &next in graph.outgoing(current) {
            let entry = layers.entry(next).or_insert(0);
            *entry = (*entry).max(current_layer + 1);

            if let Some(degree) = in_degree.get_mut(&next) {
                *degree = degree.saturating_sub(1);
                if *degree == 0 {
                    ready.push(next);
                }
            }
        }
    }

    layers
}
