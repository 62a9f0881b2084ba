use eframe::egui::{self, Pos2, Rect, Ui, vec2};

use crate::data::NodeId;

use super::super::ViewModel;
use super::super::callout::StackStrategy;
use super::super::render_utils::{local_to_painter, local_to_world, painter_to_local, world_to_local};

impl ViewModel {
    /// Painter-space rectangle of a node at the current transform, or None
    /// when the node has no geometry (not yet laid out).
    pub(in crate::app) fn node_painter_rect(&self, rect: Rect, id: NodeId) -> Option<Rect> {
        let entry = self.geometry.get(&id)?;
        let center = local_to_painter(rect, world_to_local(&self.transform, entry.center));
        let size = entry.size * self.transform.zoom;
        Some(Rect::from_center_size(center, size))
    }

    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());

        // The wheel scrolls the callout panel when hovering it in rows mode.
        if self.wheel_feeds_callout_panel(rect, pointer) {
            self.scroll_callout_panel(rect, scroll);
            return;
        }

        let local = painter_to_local(rect, pointer);
        let world_before = local_to_world(&self.transform, local);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.transform.zoom = (self.transform.zoom * zoom_factor).clamp(0.05, 6.0);
        self.transform.pan = local.to_vec2() - (world_before * self.transform.zoom);
        self.debounce.note_change(ui.input(|input| input.time));
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, ui: &Ui, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            let delta = response.drag_delta();
            if delta != vec2(0.0, 0.0) {
                self.transform.pan += delta;
                self.debounce.note_change(ui.input(|input| input.time));
            }
        }
    }

    fn wheel_feeds_callout_panel(&self, rect: Rect, pointer: Pos2) -> bool {
        self.callout_config.strategy == StackStrategy::Rows
            && !self.callouts.entries.is_empty()
            && pointer.x >= rect.right() - self.callout_config.panel_width
            && pointer.y >= rect.top() + self.callout_config.top_reserved
    }

    fn scroll_callout_panel(&mut self, rect: Rect, scroll: f32) {
        let row_height = self.callout_config.label_height + self.callout_config.gap;
        let content = self.callouts.entries.len() as f32 * row_height;
        let view = (rect.height() - self.callout_config.top_reserved).max(0.0);
        let max_scroll = (content - view).max(0.0);
        self.callout_scroll = (self.callout_scroll - scroll).clamp(0.0, max_scroll);
    }

    pub(in crate::app) fn hovered_node(&self, ui: &Ui, rect: Rect) -> Option<NodeId> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }

        self.graph
            .nodes
            .iter()
            .map(|node| node.id)
            .find(|&id| {
                self.node_painter_rect(rect, id)
                    .is_some_and(|node_rect| node_rect.contains(pointer))
            })
    }
}
