use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use crate::data::{DecisionGraph, NodeId, load_decision_graph};

mod callout;
mod chain;
mod debounce;
mod geometry;
mod graph;
mod render_utils;
mod ui;
mod visibility;

use callout::{CalloutConfig, CalloutLayout};
use chain::ChainResult;
use debounce::Debouncer;
use visibility::{GeometryEntry, VisibilityConfig, VisibilityInfo, ViewportTransform};

pub struct DecisionViewerApp {
    graph_path: String,
    state: AppState,
    reload_rx: Option<Receiver<Result<DecisionGraph, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<DecisionGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: DecisionGraph,
    graph_revision: u64,

    // Geometry-provider output plus the high-frequency transform.
    geometry: HashMap<NodeId, GeometryEntry>,
    geometry_dirty: bool,
    transform: ViewportTransform,
    /// Measured central-rect size; None until the first real layout pass
    /// has happened, during which nothing is classified visible.
    viewport: Option<Vec2>,

    // Derived annotation state, replaced wholesale each recomputation.
    visibility: HashMap<NodeId, VisibilityInfo>,
    callouts: CalloutLayout,
    offscreen_matches: Vec<NodeId>,
    callout_scroll: f32,

    // Search / highlight source.
    search: String,
    search_match_cache: Option<SearchMatchCache>,

    // Chain panel.
    selected: Option<NodeId>,
    chain: Option<ChainResult>,
    chain_members: HashSet<NodeId>,
    chain_query: String,

    debounce: Debouncer,
    /// Set when derived state must be rebuilt without waiting out the
    /// debounce window (navigation, selection, first measurement).
    annotations_dirty: bool,
    visibility_config: VisibilityConfig,
    callout_config: CalloutConfig,

    visible_count: usize,
    too_small_count: usize,
    off_screen_count: usize,
    hovered: Option<NodeId>,
}

struct SearchMatchCache {
    query: String,
    graph_revision: u64,
    matches: Arc<HashSet<NodeId>>,
}

/// Abstract host intents collected during a UI pass and applied afterwards.
/// The core never owns pan animation or selection state transitions itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NodeIntent {
    Select(NodeId),
    Navigate(NodeId),
}

impl DecisionViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, graph_path: String) -> Self {
        let state = Self::start_load(graph_path.clone());
        Self {
            graph_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(graph_path: String) -> Receiver<Result<DecisionGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_decision_graph(&graph_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(graph_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(graph_path),
        }
    }
}

impl eframe::App for DecisionViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(graph) => AppState::Ready(Box::new(ViewModel::new(graph))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading decision graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load decision graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.graph_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.graph_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.graph_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(graph) => AppState::Ready(Box::new(ViewModel::new(graph))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
