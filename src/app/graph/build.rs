use std::collections::HashSet;
use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::data::NodeId;

use super::super::geometry::layered_layout;
use super::super::{SearchMatchCache, ViewModel};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    /// Re-runs the geometry provider. Happens once per graph (re)load; the
    /// per-frame transform never touches base geometry.
    pub(in crate::app) fn rebuild_geometry(&mut self) {
        self.graph_revision = self.graph_revision.wrapping_add(1);
        self.search_match_cache = None;
        self.geometry = layered_layout(&self.graph);
        self.geometry_dirty = false;
        self.annotations_dirty = true;
    }

    /// The highlight source: fuzzy text matching over node titles and
    /// descriptions, cached per (query, graph revision). The annotation
    /// core only ever consumes the resulting id set.
    pub(in crate::app) fn cached_highlight_matches(&mut self) -> Option<Arc<HashSet<NodeId>>> {
        let search_query = self.search.trim();
        if search_query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.graph_revision == self.graph_revision
            && cached.query == search_query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .graph
            .nodes
            .iter()
            .filter_map(|node| {
                let title_hit = fuzzy_match_score(&matcher, &node.title, search_query).is_some();
                let description_hit = node
                    .description
                    .as_deref()
                    .is_some_and(|text| fuzzy_match_score(&matcher, text, search_query).is_some());
                (title_hit || description_hit).then_some(node.id)
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: search_query.to_owned(),
            graph_revision: self.graph_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }
}
