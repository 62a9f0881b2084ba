use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, pos2};

use crate::data::NodeKind;

use super::visibility::ViewportTransform;

/// Fixed palette per node kind, shared by node fills and callout accents.
pub(super) fn kind_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Goal => Color32::from_rgb(245, 206, 93),
        NodeKind::Decision => Color32::from_rgb(103, 196, 255),
        NodeKind::Option => Color32::from_rgb(181, 140, 255),
        NodeKind::Action => Color32::from_rgb(125, 221, 143),
        NodeKind::Outcome => Color32::from_rgb(241, 146, 94),
        NodeKind::Observation => Color32::from_rgb(154, 165, 177),
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

/// Graph coordinates to viewport-local screen coordinates (origin at the
/// central rect's top-left), matching the classifier's convention.
pub(super) fn world_to_local(transform: &ViewportTransform, world: Vec2) -> Pos2 {
    let screen = world * transform.zoom + transform.pan;
    pos2(screen.x, screen.y)
}

pub(super) fn local_to_world(transform: &ViewportTransform, local: Pos2) -> Vec2 {
    (local.to_vec2() - transform.pan) / transform.zoom
}

/// Viewport-local coordinates to painter coordinates.
pub(super) fn local_to_painter(rect: Rect, local: Pos2) -> Pos2 {
    rect.min + local.to_vec2()
}

pub(super) fn painter_to_local(rect: Rect, painter: Pos2) -> Pos2 {
    (painter - rect.min).to_pos2()
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, transform: &ViewportTransform) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * transform.zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + transform.pan;

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [pos2(x, rect.top()), pos2(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [pos2(rect.left(), y), pos2(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}

/// Conservative screen-space cull for an edge segment: bounding-box reject,
/// endpoint containment, then segment-vs-border intersection.
pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    if max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom() {
        return false;
    }

    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    let top_left = rect.left_top();
    let top_right = rect.right_top();
    let bottom_left = rect.left_bottom();
    let bottom_right = rect.right_bottom();

    segments_intersect(start, end, top_left, top_right)
        || segments_intersect(start, end, top_right, bottom_right)
        || segments_intersect(start, end, bottom_right, bottom_left)
        || segments_intersect(start, end, bottom_left, top_left)
}

fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    let a_min_x = a1.x.min(a2.x);
    let a_max_x = a1.x.max(a2.x);
    let a_min_y = a1.y.min(a2.y);
    let a_max_y = a1.y.max(a2.y);
    let b_min_x = b1.x.min(b2.x);
    let b_max_x = b1.x.max(b2.x);
    let b_min_y = b1.y.min(b2.y);
    let b_max_y = b1.y.max(b2.y);

    if a_max_x < b_min_x || b_max_x < a_min_x || a_max_y < b_min_y || b_max_y < a_min_y {
        return false;
    }

    let c1 = cross(a1, a2, b1);
    let c2 = cross(a1, a2, b2);
    let c3 = cross(b1, b2, a1);
    let c4 = cross(b1, b2, a2);

    (c1 <= 0.0 && c2 >= 0.0 || c1 >= 0.0 && c2 <= 0.0)
        && (c3 <= 0.0 && c4 >= 0.0 || c3 >= 0.0 && c4 <= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    #[test]
    fn world_local_round_trip() {
        let transform = ViewportTransform {
            zoom: 1.6,
            pan: vec2(40.0, -12.0),
        };
        let world = vec2(123.0, -45.0);
        let local = world_to_local(&transform, world);
        let back = local_to_world(&transform, local);
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn edge_crossing_the_viewport_is_visible_without_contained_endpoints() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(100.0, 100.0));
        assert!(edge_visible(
            rect,
            pos2(-50.0, 50.0),
            pos2(150.0, 50.0),
            0.0
        ));
        assert!(!edge_visible(
            rect,
            pos2(-50.0, 200.0),
            pos2(150.0, 200.0),
            0.0
        ));
    }
}
