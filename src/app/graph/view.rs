use std::collections::HashSet;
use std::time::Duration;

use eframe::egui::{
    self, Align2, Color32, FontId, Sense, Stroke, StrokeKind, Ui, Vec2, pos2, vec2,
};

use crate::data::NodeId;
use crate::util::truncate_title;

use super::super::ViewModel;
use super::super::callout::{StackStrategy, layout_callouts, offscreen_highlights};
use super::super::render_utils::{
    blend_color, dim_color, draw_background, edge_visible, kind_color, local_to_painter,
    world_to_local,
};
use super::super::visibility::{VisibilityCategory, classify};

const MATCH_ACCENT: Color32 = Color32::from_rgb(103, 196, 255);
const SELECTED_ACCENT: Color32 = Color32::from_rgb(245, 206, 93);
const CHAIN_ACCENT: Color32 = Color32::from_rgb(241, 146, 94);

impl ViewModel {
    /// Rebuilds every piece of derived annotation state in one pass:
    /// visibility map, callout layout, off-screen summary, category counts.
    /// Called only from the debounced path; everything is replaced
    /// wholesale so no stale positions survive a pan or zoom.
    pub(in crate::app) fn recompute_annotations(&mut self, viewport: Vec2) {
        self.visibility = classify(
            &self.geometry,
            &self.transform,
            viewport,
            &self.visibility_config,
        );

        self.visible_count = 0;
        self.too_small_count = 0;
        self.off_screen_count = 0;
        for info in self.visibility.values() {
            match info.category {
                VisibilityCategory::Visible => self.visible_count += 1,
                VisibilityCategory::TooSmall => self.too_small_count += 1,
                VisibilityCategory::OffScreen => self.off_screen_count += 1,
            }
        }

        let matches = self.cached_highlight_matches();
        let empty = HashSet::new();
        let highlighted = matches.as_deref().unwrap_or(&empty);

        self.callouts = layout_callouts(
            highlighted,
            &self.visibility,
            |id| self.graph.node(id).map(|node| node.kind),
            viewport,
            &self.callout_config,
        );
        self.offscreen_matches = offscreen_highlights(highlighted, &self.visibility);
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.geometry_dirty {
            self.rebuild_geometry();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let now = ui.input(|input| input.time);

        // Deferred viewport measurement: the real size of this rect is only
        // known here, and may change on any resize. A materially different
        // measurement invalidates the derived state immediately.
        let measured = rect.size();
        if measured.x > 0.0 && measured.y > 0.0 {
            let changed = self.viewport.is_none_or(|previous| {
                (previous.x - measured.x).abs() > 0.5 || (previous.y - measured.y).abs() > 0.5
            });
            if changed {
                if self.viewport.is_none() {
                    // First measurement: put the graph origin mid-viewport.
                    self.transform.pan = measured * 0.5;
                }
                self.viewport = Some(measured);
                self.annotations_dirty = true;
            }
        }

        draw_background(&painter, rect, &self.transform);
        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(ui, &response);

        if self.annotations_dirty {
            self.annotations_dirty = false;
            self.debounce.fire_now(now);
        }
        if self.debounce.should_fire(now)
            && let Some(viewport) = self.viewport
        {
            self.recompute_annotations(viewport);
        }
        if let Some(remaining) = self.debounce.remaining(now) {
            ui.ctx().request_repaint_after(Duration::from_secs_f64(remaining));
        }

        let matches = self.cached_highlight_matches();
        let search_active = matches.as_ref().is_some_and(|set| !set.is_empty());
        let selection_active = self.selected.is_some();

        self.draw_edges(&painter, rect);

        let callout_hit = self.callout_hit(ui, rect);
        let hovered = if callout_hit.is_none() {
            self.hovered_node(ui, rect)
        } else {
            None
        };
        self.hovered = hovered;

        if hovered.is_some() || callout_hit.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let pending_selection = if response.clicked_by(egui::PointerButton::Primary) {
            Some(callout_hit.or(hovered))
        } else {
            None
        };

        let min_readable = self.visibility_config.min_readable;
        for node in &self.graph.nodes {
            let Some(node_rect) = self.node_painter_rect(rect, node.id) else {
                continue;
            };
            if !rect.intersects(node_rect.expand(2.0)) {
                continue;
            }

            let is_selected = self.selected == Some(node.id);
            let is_hovered = hovered == Some(node.id);
            let is_match = matches
                .as_ref()
                .is_some_and(|set| set.contains(&node.id));
            let on_chain = selection_active && self.chain_members.contains(&node.id);

            let base = kind_color(node.kind);
            let fill = if is_hovered {
                blend_color(base, Color32::WHITE, 0.25)
            } else if is_selected {
                blend_color(base, SELECTED_ACCENT, 0.55)
            } else if on_chain {
                blend_color(base, CHAIN_ACCENT, 0.40)
            } else if is_match {
                blend_color(base, MATCH_ACCENT, 0.35)
            } else if search_active || selection_active {
                dim_color(base, 0.45)
            } else {
                base
            };

            painter.rect_filled(node_rect, 4.0, fill);
            let stroke = if is_selected {
                Stroke::new(2.0, SELECTED_ACCENT)
            } else if is_match {
                Stroke::new(1.6, MATCH_ACCENT)
            } else {
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
            };
            painter.rect_stroke(node_rect, 4.0, stroke, StrokeKind::Inside);

            // Inline text only when the box is big enough to read; tiny
            // highlighted nodes get their text in the callout panel instead.
            if node_rect.width() >= min_readable * 3.0 && node_rect.height() >= min_readable {
                let max_chars = (node_rect.width() / 7.0) as usize;
                painter.text(
                    node_rect.center(),
                    Align2::CENTER_CENTER,
                    truncate_title(&node.title, max_chars.max(4)),
                    FontId::proportional(12.0),
                    Color32::from_gray(15),
                );
            }
        }

        self.draw_callouts(&painter, rect);

        if !self.offscreen_matches.is_empty() {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{} matches off-screen", self.offscreen_matches.len()),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if let Some(hovered_id) = hovered
            && let Some(node) = self.graph.node(hovered_id)
        {
            let info = format!(
                "{}  |  {}  |  in {} / out {}",
                truncate_title(&node.title, 48),
                node.kind.label(),
                self.graph.incoming(node.id).len(),
                self.graph.outgoing(node.id).len()
            );
            painter.text(
                rect.left_bottom() + vec2(10.0, -10.0),
                Align2::LEFT_BOTTOM,
                info,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if let Some(selection) = pending_selection {
            self.set_selected(selection);
        }
    }

    fn draw_edges(&self, painter: &egui::Painter, rect: egui::Rect) {
        let zoom_sqrt = self.transform.zoom.sqrt();
        let selection_active = self.selected.is_some();

        for edge in &self.graph.edges {
            let (Some(from), Some(to)) = (
                self.geometry.get(&edge.from),
                self.geometry.get(&edge.to),
            ) else {
                continue;
            };

            let start = local_to_painter(rect, world_to_local(&self.transform, from.center));
            let end = local_to_painter(rect, world_to_local(&self.transform, to.center));
            if !edge_visible(rect, start, end, 2.5) {
                continue;
            }

            let on_chain = selection_active
                && self.chain_members.contains(&edge.from)
                && self.chain_members.contains(&edge.to);

            let (width, color) = if on_chain {
                (
                    (2.5 * zoom_sqrt).clamp(1.2, 4.4),
                    CHAIN_ACCENT,
                )
            } else if selection_active {
                (
                    (0.82 * zoom_sqrt).clamp(0.45, 2.0),
                    Color32::from_rgba_unmultiplied(80, 90, 104, 140),
                )
            } else {
                (
                    (1.18 * zoom_sqrt).clamp(0.6, 3.4),
                    Color32::from_rgba_unmultiplied(110, 110, 110, 200),
                )
            };

            painter.line_segment([start, end], Stroke::new(width, color));
        }
    }

    /// Scroll offset applied to callout rows; Stacked entries sit at their
    /// computed absolute positions.
    fn callout_offset(&self) -> f32 {
        match self.callout_config.strategy {
            StackStrategy::Stacked => 0.0,
            StackStrategy::Rows => self.callout_scroll,
        }
    }

    fn callout_hit(&self, ui: &Ui, rect: egui::Rect) -> Option<NodeId> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        let offset = self.callout_offset();

        self.callouts
            .entries
            .iter()
            .find(|entry| {
                let label = entry.label_rect.translate(vec2(rect.left(), rect.top() - offset));
                label.contains(pointer)
            })
            .map(|entry| entry.node_id)
    }

    fn draw_callouts(&self, painter: &egui::Painter, rect: egui::Rect) {
        if self.callouts.entries.is_empty() && self.callouts.overflow == 0 {
            return;
        }

        let offset = self.callout_offset();
        let band_top = rect.top() + self.callout_config.top_reserved;

        for entry in &self.callouts.entries {
            let label = entry
                .label_rect
                .translate(vec2(rect.left(), rect.top() - offset));
            if label.bottom() < band_top || label.top() > rect.bottom() {
                continue;
            }

            let line_start = local_to_painter(rect, entry.line_start);
            let line_end = entry.line_end() + vec2(rect.left(), rect.top() - offset);
            painter.line_segment(
                [line_start, line_end],
                Stroke::new(1.2, entry.color.gamma_multiply(0.9)),
            );

            painter.rect_filled(label, 4.0, Color32::from_rgb(28, 33, 41));
            painter.rect_stroke(label, 4.0, Stroke::new(1.0, entry.color), StrokeKind::Inside);
            painter.rect_filled(
                egui::Rect::from_min_size(label.min, vec2(4.0, label.height())),
                0.0,
                entry.color,
            );

            let Some(node) = self.graph.node(entry.node_id) else {
                continue;
            };
            painter.text(
                pos2(label.left() + 10.0, label.top() + 6.0),
                Align2::LEFT_TOP,
                truncate_title(&node.title, 30),
                FontId::proportional(12.0),
                Color32::from_gray(235),
            );
            painter.text(
                pos2(label.left() + 10.0, label.bottom() - 6.0),
                Align2::LEFT_BOTTOM,
                node.kind.label(),
                FontId::proportional(10.0),
                Color32::from_gray(170),
            );
        }

        if self.callouts.overflow > 0 {
            painter.text(
                pos2(rect.right() - 10.0, rect.bottom() - 8.0),
                Align2::RIGHT_BOTTOM,
                format!("+{} more matches", self.callouts.overflow),
                FontId::proportional(12.0),
                Color32::from_gray(200),
            );
        }
    }
}
