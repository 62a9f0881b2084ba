mod graph;
mod load;
mod parse;

pub use graph::{DecisionGraph, Edge, Node, NodeId, NodeKind};
pub use load::load_decision_graph;
