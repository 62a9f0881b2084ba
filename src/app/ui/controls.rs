use eframe::egui::{self, Ui};

use super::super::ViewModel;
use super::super::callout::StackStrategy;
use super::super::visibility::ViewportTransform;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Search");
        ui.add_space(4.0);

        let search_response = ui.add(
            egui::TextEdit::singleline(&mut self.search).hint_text("title or description..."),
        );
        if search_response.changed() {
            // Typing is debounced like pan/zoom; the match cache itself is
            // keyed by query so intermediate keystrokes stay cheap.
            self.search_match_cache = None;
            let now = ui.input(|input| input.time);
            self.debounce.note_change(now);
        }
        if !self.search.trim().is_empty()
            && let Some(matches) = self.cached_highlight_matches()
        {
            ui.small(format!("{} nodes match", matches.len()));
        }

        ui.add_space(10.0);
        ui.separator();
        ui.heading("Callouts");
        ui.add_space(4.0);

        let mut strategy = self.callout_config.strategy;
        ui.horizontal(|ui| {
            ui.selectable_value(&mut strategy, StackStrategy::Stacked, "Stacked");
            ui.selectable_value(&mut strategy, StackStrategy::Rows, "Scrolling rows");
        });
        if strategy != self.callout_config.strategy {
            self.callout_config.strategy = strategy;
            self.callout_scroll = 0.0;
            self.annotations_dirty = true;
        }

        let mut config_changed = false;
        config_changed |= ui
            .add(
                egui::Slider::new(&mut self.callout_config.panel_width, 160.0..=400.0)
                    .text("panel width"),
            )
            .changed();
        config_changed |= ui
            .add(
                egui::Slider::new(&mut self.callout_config.label_height, 24.0..=60.0)
                    .text("label height"),
            )
            .changed();

        ui.add_space(10.0);
        ui.separator();
        ui.heading("Visibility");
        ui.add_space(4.0);

        config_changed |= ui
            .add(
                egui::Slider::new(&mut self.visibility_config.min_readable, 5.0..=60.0)
                    .text("readable size (px)"),
            )
            .changed();
        config_changed |= ui
            .add(
                egui::Slider::new(&mut self.visibility_config.edge_padding, 0.0..=150.0)
                    .text("edge padding (px)"),
            )
            .changed();

        if config_changed {
            self.annotations_dirty = true;
        }

        ui.add_space(10.0);
        ui.separator();
        ui.heading("View");
        ui.add_space(4.0);

        if ui.button("Reset view").clicked() {
            self.transform = ViewportTransform::default();
            if let Some(viewport) = self.viewport {
                self.transform.pan = viewport * 0.5;
            }
            self.annotations_dirty = true;
        }
        ui.small("drag with right/middle mouse to pan, wheel to zoom");

        if let Some(hovered) = self.hovered
            && let Some(node) = self.graph.node(hovered)
        {
            ui.add_space(10.0);
            ui.separator();
            ui.small(format!("hovering: #{} {}", node.id, node.kind.label()));
        }
    }
}
