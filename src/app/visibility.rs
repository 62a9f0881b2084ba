use std::collections::HashMap;

use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::data::NodeId;

/// Per-node base geometry in graph coordinates, produced by the layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryEntry {
    pub center: Vec2,
    pub size: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTransform {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityCategory {
    Visible,
    TooSmall,
    OffScreen,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityInfo {
    pub category: VisibilityCategory,
    pub screen_rect: Rect,
}

impl VisibilityInfo {
    pub fn screen_center(&self) -> Pos2 {
        self.screen_rect.center()
    }
}

/// Tunable thresholds. The exact pixel values are empirical, not
/// correctness-critical; the padding keeps nodes from flickering between
/// categories right at the viewport edge.
#[derive(Clone, Copy, Debug)]
pub struct VisibilityConfig {
    pub edge_padding: f32,
    pub min_readable: f32,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            edge_padding: 50.0,
            min_readable: 20.0,
        }
    }
}

/// Classifies every laid-out node against the current viewport. Pure affine
/// transform of its inputs: `screen_center = center * zoom + pan`,
/// `screen_size = size * zoom`. An unmeasured viewport (either dimension
/// non-positive) means nothing is visible yet and yields an empty map.
pub fn classify(
    geometry: &HashMap<NodeId, GeometryEntry>,
    transform: &ViewportTransform,
    viewport: Vec2,
    config: &VisibilityConfig,
) -> HashMap<NodeId, VisibilityInfo> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return HashMap::new();
    }

    let viewport_rect = Rect::from_min_size(Pos2::ZERO, viewport);
    let mut result = HashMap::with_capacity(geometry.len());

    for (&id, entry) in geometry {
        let screen_center = entry.center * transform.zoom + transform.pan;
        let screen_size = entry.size * transform.zoom;
        let screen_rect = Rect::from_center_size(
            pos2(screen_center.x, screen_center.y),
            vec2(screen_size.x, screen_size.y),
        );

        let padded = screen_rect.expand(config.edge_padding);
        let category = if !padded.intersects(viewport_rect) {
            VisibilityCategory::OffScreen
        } else if screen_size.x < config.min_readable || screen_size.y < config.min_readable {
            // Degenerate zero-size geometry lands here as well; it can
            // never be Visible.
            VisibilityCategory::TooSmall
        } else {
            VisibilityCategory::Visible
        };

        result.insert(
            id,
            VisibilityInfo {
                category,
                screen_rect,
            },
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cx: f32, cy: f32, w: f32, h: f32) -> GeometryEntry {
        GeometryEntry {
            center: vec2(cx, cy),
            size: vec2(w, h),
        }
    }

    fn classify_one(
        entry: GeometryEntry,
        transform: ViewportTransform,
        viewport: Vec2,
    ) -> Option<VisibilityInfo> {
        let geometry = HashMap::from([(1, entry)]);
        classify(&geometry, &transform, viewport, &VisibilityConfig::default())
            .get(&1)
            .copied()
    }

    #[test]
    fn screen_rect_is_a_pure_affine_transform() {
        let info = classify_one(
            entry(100.0, 50.0, 40.0, 30.0),
            ViewportTransform {
                zoom: 2.0,
                pan: vec2(10.0, -5.0),
            },
            vec2(1000.0, 800.0),
        )
        .unwrap();

        // center * zoom + pan - size * zoom / 2
        assert_eq!(info.screen_rect.min, pos2(170.0, 65.0));
        assert_eq!(info.screen_rect.size(), vec2(80.0, 60.0));
        assert_eq!(info.category, VisibilityCategory::Visible);
    }

    #[test]
    fn small_node_in_view_is_too_small() {
        // Scenario: viewport 1000x800, zoom 1, node center (50,50) size 10x10.
        let info = classify_one(
            entry(50.0, 50.0, 10.0, 10.0),
            ViewportTransform::default(),
            vec2(1000.0, 800.0),
        )
        .unwrap();

        assert_eq!(info.screen_rect.min, pos2(45.0, 45.0));
        assert_eq!(info.category, VisibilityCategory::TooSmall);
    }

    #[test]
    fn deep_zoom_out_keeps_too_small_while_center_stays_in_view() {
        let info = classify_one(
            entry(50.0, 50.0, 10.0, 10.0),
            ViewportTransform {
                zoom: 0.01,
                pan: Vec2::ZERO,
            },
            vec2(1000.0, 800.0),
        )
        .unwrap();

        assert_eq!(info.category, VisibilityCategory::TooSmall);
    }

    #[test]
    fn far_away_node_is_off_screen_never_too_small() {
        let info = classify_one(
            entry(5000.0, 5000.0, 10.0, 10.0),
            ViewportTransform::default(),
            vec2(1000.0, 800.0),
        )
        .unwrap();

        assert_eq!(info.category, VisibilityCategory::OffScreen);
    }

    #[test]
    fn edge_padding_rescues_nodes_just_outside_the_viewport() {
        // 30px past the right edge, inside the 50px padded band.
        let info = classify_one(
            entry(1025.0, 400.0, 10.0, 10.0),
            ViewportTransform::default(),
            vec2(1000.0, 800.0),
        )
        .unwrap();

        assert_eq!(info.category, VisibilityCategory::TooSmall);
    }

    #[test]
    fn degenerate_geometry_is_always_too_small_in_view() {
        let info = classify_one(
            entry(500.0, 400.0, 0.0, 120.0),
            ViewportTransform::default(),
            vec2(1000.0, 800.0),
        )
        .unwrap();

        assert_eq!(info.category, VisibilityCategory::TooSmall);
    }

    #[test]
    fn unmeasured_viewport_classifies_nothing() {
        let geometry = HashMap::from([(1, entry(50.0, 50.0, 100.0, 100.0))]);
        let result = classify(
            &geometry,
            &ViewportTransform::default(),
            vec2(0.0, 800.0),
            &VisibilityConfig::default(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn empty_geometry_yields_empty_result() {
        let result = classify(
            &HashMap::new(),
            &ViewportTransform::default(),
            vec2(1000.0, 800.0),
            &VisibilityConfig::default(),
        );
        assert!(result.is_empty());
    }
}
