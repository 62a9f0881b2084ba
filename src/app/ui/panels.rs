use std::collections::{HashMap, HashSet};

use eframe::egui::{self, Align, Context, Layout};

use crate::data::{DecisionGraph, NodeId};

use super::super::callout::{CalloutConfig, CalloutLayout};
use super::super::chain::traverse;
use super::super::debounce::Debouncer;
use super::super::visibility::{ViewportTransform, VisibilityConfig};
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(graph: DecisionGraph) -> Self {
        Self {
            graph,
            graph_revision: 0,
            geometry: HashMap::new(),
            geometry_dirty: true,
            transform: ViewportTransform::default(),
            viewport: None,
            visibility: HashMap::new(),
            callouts: CalloutLayout::default(),
            offscreen_matches: Vec::new(),
            callout_scroll: 0.0,
            search: String::new(),
            search_match_cache: None,
            selected: None,
            chain: None,
            chain_members: HashSet::new(),
            chain_query: String::new(),
            debounce: Debouncer::default(),
            annotations_dirty: false,
            visibility_config: VisibilityConfig::default(),
            callout_config: CalloutConfig::default(),
            visible_count: 0,
            too_small_count: 0,
            off_screen_count: 0,
            hovered: None,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        graph_path: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("decigraph");
                    ui.separator();
                    ui.label(format!("file: {graph_path}"));
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    ui.label(format!("edges: {}", self.graph.edge_count()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload graph"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Re-layout").clicked() {
                        self.geometry_dirty = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "visible {} | tiny {} | off-screen {}",
                            self.visible_count, self.too_small_count, self.off_screen_count
                        ));
                        ui.label(format!("zoom {:.2}", self.transform.zoom));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("chain")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| self.draw_chain_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading decision graph...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }

    /// Applies a selection intent: the chain is recomputed for the new root
    /// (never cached across roots) and the member set used for edge
    /// emphasis is rebuilt alongside it.
    pub(in crate::app) fn set_selected(&mut self, selected: Option<NodeId>) {
        if self.selected == selected {
            return;
        }

        self.selected = selected;
        self.chain = selected.map(|root| traverse(root, &self.graph));
        self.chain_members = match &self.chain {
            Some(result) => {
                let mut members = HashSet::with_capacity(
                    1 + result.ancestors.len() + result.descendants.len(),
                );
                members.insert(result.root);
                members.extend(result.ancestors.iter().copied());
                members.extend(result.descendants.iter().copied());
                members
            }
            None => HashSet::new(),
        };
    }

    /// Applies a navigation intent: recenters the viewport on the node at
    /// the current zoom. Unknown or not-yet-laid-out ids are ignored.
    pub(in crate::app) fn navigate_to(&mut self, id: NodeId) {
        let Some(entry) = self.geometry.get(&id) else {
            return;
        };
        let Some(viewport) = self.viewport else {
            return;
        };

        self.transform.pan = viewport * 0.5 - entry.center * self.transform.zoom;
        self.annotations_dirty = true;
    }
}
