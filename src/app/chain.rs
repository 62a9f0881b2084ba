use std::collections::{HashSet, VecDeque};

use crate::data::{DecisionGraph, NodeId};

/// Ancestors and descendants of one root, in BFS discovery order (nearest
/// relatives first). The root itself is never included and no node appears
/// twice, even when reachable along multiple paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainResult {
    pub root: NodeId,
    pub ancestors: Vec<NodeId>,
    pub descendants: Vec<NodeId>,
}

/// A filtered view over a `ChainResult`, keeping the pre-filter totals so
/// the panel can show "(filtered/total)" counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainView {
    pub ancestors: Vec<NodeId>,
    pub descendants: Vec<NodeId>,
    pub total_ancestors: usize,
    pub total_descendants: usize,
}

/// Bidirectional BFS rooted at `root`. The two directions are independent
/// searches with their own visited sets; each neighbor is enqueued exactly
/// once, so the walk is linear in touched edges and safe against cycles
/// regardless of whether the edge set really is a DAG. An unknown root
/// degrades to two empty lists.
pub fn traverse(root: NodeId, graph: &DecisionGraph) -> ChainResult {
    if !graph.contains(root) {
        return ChainResult {
            root,
            ..ChainResult::default()
        };
    }

    ChainResult {
        root,
        ancestors: bfs(root, |id| graph.incoming(id)),
        descendants: bfs(root, |id| graph.outgoing(id)),
    }
}

fn bfs<'g>(root: NodeId, neighbors: impl Fn(NodeId) -> &'g [NodeId]) -> Vec<NodeId> {
    let mut visited = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    let mut order = Vec::new();

    while let Some(current) = queue.pop_front() {
        for &next in neighbors(current) {
            if visited.insert(next) {
                order.push(next);
                queue.push_back(next);
            }
        }
    }

    order
}

/// Case-insensitive substring filter over a traversal result. Matches
/// against title, kind label, description (absent never matches) and the
/// decimal form of the id. Empty or whitespace-only queries are an
/// identity; ordering is always the traversal's, never re-ranked.
pub fn filter_chain(result: &ChainResult, graph: &DecisionGraph, query: &str) -> ChainView {
    let query = query.trim();
    if query.is_empty() {
        return ChainView {
            ancestors: result.ancestors.clone(),
            descendants: result.descendants.clone(),
            total_ancestors: result.ancestors.len(),
            total_descendants: result.descendants.len(),
        };
    }

    let needle = query.to_lowercase();
    let matches = |id: NodeId| -> bool {
        let Some(node) = graph.node(id) else {
            return false;
        };

        node.title.to_lowercase().contains(&needle)
            || node.kind.label().contains(&needle)
            || node
                .description
                .as_ref()
                .is_some_and(|text| text.to_lowercase().contains(&needle))
            || node.id.to_string().contains(&needle)
    };

    ChainView {
        ancestors: result
            .ancestors
            .iter()
            .copied()
            .filter(|&id| matches(id))
            .collect(),
        descendants: result
            .descendants
            .iter()
            .copied()
            .filter(|&id| matches(id))
            .collect(),
        total_ancestors: result.ancestors.len(),
        total_descendants: result.descendants.len(),
    }
}

/// Presentation ordering for the details panel: group by the fixed kind
/// priority (goal, outcome, decision, option, action, observation), ties by
/// discovery order. Applied after traversal and filtering, never inside
/// the engine.
pub fn rank_for_display(ids: &[NodeId], graph: &DecisionGraph) -> Vec<NodeId> {
    let mut ranked = ids
        .iter()
        .copied()
        .enumerate()
        .map(|(discovery, id)| {
            let rank = graph
                .node(id)
                .map(|node| node.kind.display_rank())
                .unwrap_or(usize::MAX);
            (rank, discovery, id)
        })
        .collect::<Vec<_>>();

    ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    ranked.into_iter().map(|(_, _, id)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Edge, Node, NodeKind};

    fn node(id: NodeId, kind: NodeKind, title: &str) -> Node {
        Node {
            id,
            kind,
            title: title.to_owned(),
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

    fn line_graph() -> DecisionGraph {
        // 1 -> 2 -> 3
        DecisionGraph::new(
            vec![
                node(1, NodeKind::Goal, "Root"),
                node(2, NodeKind::Decision, "Middle"),
                node(3, NodeKind::Outcome, "Leaf"),
            ],
            vec![edge(1, 2), edge(2, 3)],
        )
    }

    #[test]
    fn single_node_has_empty_chains() {
        let graph = DecisionGraph::new(vec![node(1, NodeKind::Goal, "Root")], vec![]);
        let result = traverse(1, &graph);
        assert!(result.ancestors.is_empty());
        assert!(result.descendants.is_empty());
    }

    #[test]
    fn middle_node_sees_both_directions() {
        let result = traverse(2, &line_graph());
        assert_eq!(result.ancestors, vec![1]);
        assert_eq!(result.descendants, vec![3]);
    }

    #[test]
    fn unknown_root_degrades_to_empty_lists() {
        let result = traverse(99, &line_graph());
        assert!(result.ancestors.is_empty());
        assert!(result.descendants.is_empty());
    }

    #[test]
    fn diamond_visits_each_node_once_in_bfs_order() {
        // 1 -> 2, 1 -> 3, 2 -> 4, 3 -> 4
        let graph = DecisionGraph::new(
            vec![
                node(1, NodeKind::Goal, "a"),
                node(2, NodeKind::Option, "b"),
                node(3, NodeKind::Option, "c"),
                node(4, NodeKind::Outcome, "d"),
            ],
            vec![edge(1, 2), edge(1, 3), edge(2, 4), edge(3, 4)],
        );

        let result = traverse(1, &graph);
        assert_eq!(result.descendants, vec![2, 3, 4]);

        let up = traverse(4, &graph);
        assert_eq!(up.ancestors, vec![2, 3, 1]);
    }

    #[test]
    fn cycles_do_not_hang_or_duplicate() {
        // Traversal must stay cycle-safe even though real data is a DAG.
        let graph = DecisionGraph::new(
            vec![
                node(1, NodeKind::Action, "a"),
                node(2, NodeKind::Action, "b"),
            ],
            vec![edge(1, 2), edge(2, 1)],
        );

        let result = traverse(1, &graph);
        assert_eq!(result.descendants, vec![2]);
        assert_eq!(result.ancestors, vec![2]);
    }

    #[test]
    fn traversal_is_idempotent() {
        let graph = line_graph();
        assert_eq!(traverse(2, &graph), traverse(2, &graph));
    }

    #[test]
    fn empty_query_is_the_identity() {
        let graph = line_graph();
        let result = traverse(2, &graph);
        let view = filter_chain(&result, &graph, "   ");
        assert_eq!(view.ancestors, result.ancestors);
        assert_eq!(view.descendants, result.descendants);
        assert_eq!(view.total_ancestors, result.ancestors.len());
    }

    #[test]
    fn filter_matches_title_kind_description_and_id() {
        let graph = DecisionGraph::new(
            vec![
                node(1, NodeKind::Goal, "Launch"),
                node(2, NodeKind::Decision, "Pick database"),
                Node {
                    description: Some("Postgres over SQLite".to_owned()),
                    ..node(3, NodeKind::Option, "Alternative")
                },
                node(40, NodeKind::Outcome, "Done"),
            ],
            vec![edge(1, 2), edge(1, 3), edge(1, 40)],
        );
        let result = traverse(1, &graph);

        assert_eq!(filter_chain(&result, &graph, "DataBase").descendants, vec![2]);
        assert_eq!(filter_chain(&result, &graph, "option").descendants, vec![3]);
        assert_eq!(filter_chain(&result, &graph, "postgres").descendants, vec![3]);
        assert_eq!(filter_chain(&result, &graph, "40").descendants, vec![40]);
        let view = filter_chain(&result, &graph, "nothing-matches-this");
        assert!(view.descendants.is_empty());
        assert_eq!(view.total_descendants, 3);
    }

    #[test]
    fn filtering_is_idempotent_and_order_preserving() {
        let graph = DecisionGraph::new(
            vec![
                node(1, NodeKind::Goal, "Root"),
                node(2, NodeKind::Action, "step one"),
                node(3, NodeKind::Action, "step two"),
                node(4, NodeKind::Outcome, "other"),
            ],
            vec![edge(1, 2), edge(1, 4), edge(2, 3)],
        );
        let result = traverse(1, &graph);

        let once = filter_chain(&result, &graph, "step");
        assert_eq!(once.descendants, vec![2, 3]);

        let narrowed = ChainResult {
            root: result.root,
            ancestors: once.ancestors.clone(),
            descendants: once.descendants.clone(),
        };
        let twice = filter_chain(&narrowed, &graph, "step");
        assert_eq!(twice.descendants, once.descendants);
    }

    #[test]
    fn display_rank_groups_by_kind_then_discovery_order() {
        let graph = DecisionGraph::new(
            vec![
                node(1, NodeKind::Goal, "root"),
                node(2, NodeKind::Observation, "seen"),
                node(3, NodeKind::Goal, "subgoal"),
                node(4, NodeKind::Outcome, "result"),
                node(5, NodeKind::Action, "do"),
            ],
            vec![edge(1, 2), edge(1, 3), edge(1, 4), edge(1, 5)],
        );
        let result = traverse(1, &graph);
        assert_eq!(result.descendants, vec![2, 3, 4, 5]);

        let display = rank_for_display(&result.descendants, &graph);
        assert_eq!(display, vec![3, 4, 5, 2]);
    }
}
