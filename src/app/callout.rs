use std::collections::{HashMap, HashSet};

use eframe::egui::{Color32, Pos2, Rect, Vec2, pos2, vec2};

use crate::data::{NodeId, NodeKind};

use super::render_utils::kind_color;
use super::visibility::{VisibilityCategory, VisibilityInfo};

/// How callout labels are stacked inside the reserved side panel.
///
/// `Stacked` places fixed-height boxes at collision-avoided absolute
/// positions and drops whatever cannot fit (reported as overflow).
/// `Rows` gives every entry a uniform slot and lets the panel scroll, so no
/// entry is ever dropped regardless of match count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackStrategy {
    Stacked,
    Rows,
}

#[derive(Clone, Copy, Debug)]
pub struct CalloutConfig {
    pub panel_width: f32,
    pub top_reserved: f32,
    pub label_height: f32,
    pub gap: f32,
    pub strategy: StackStrategy,
}

impl Default for CalloutConfig {
    fn default() -> Self {
        Self {
            panel_width: 260.0,
            top_reserved: 48.0,
            label_height: 34.0,
            gap: 6.0,
            strategy: StackStrategy::Stacked,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalloutEntry {
    pub node_id: NodeId,
    /// Node's on-screen center, the visual anchor of the connecting line.
    pub anchor: Pos2,
    /// Anchor with its Y clamped into the reserved vertical band, so lines
    /// never run above the header or below the viewport.
    pub line_start: Pos2,
    pub label_rect: Rect,
    pub color: Color32,
}

impl CalloutEntry {
    /// Where the connecting line meets the label: left edge, centered.
    pub fn line_end(&self) -> Pos2 {
        pos2(self.label_rect.left(), self.label_rect.center().y)
    }
}

/// One recomputation pass's worth of callouts. Rebuilt wholesale every pass;
/// nothing here survives a pan or zoom.
#[derive(Clone, Debug, Default)]
pub struct CalloutLayout {
    pub entries: Vec<CalloutEntry>,
    /// Candidates that could not be given a geometric slot (Stacked only).
    pub overflow: usize,
}

/// Lays out callouts for every highlighted node classified too-small.
/// Off-screen matches are deliberately not laid out here; the view layer
/// summarizes them by count instead of connecting them with lines.
///
/// Deterministic: candidates are ordered by ascending anchor Y, ties broken
/// by node id, so equal inputs always produce the identical layout.
pub fn layout_callouts(
    highlighted: &HashSet<NodeId>,
    visibility: &HashMap<NodeId, VisibilityInfo>,
    kind_of: impl Fn(NodeId) -> Option<NodeKind>,
    viewport: Vec2,
    config: &CalloutConfig,
) -> CalloutLayout {
    let mut candidates = highlighted
        .iter()
        .filter_map(|&id| {
            let info = visibility.get(&id)?;
            if info.category != VisibilityCategory::TooSmall {
                return None;
            }
            // Stale ids with no metadata degrade to "no callout".
            let kind = kind_of(id)?;
            Some((id, info.screen_center(), kind))
        })
        .collect::<Vec<_>>();

    candidates.sort_by(|a, b| a.1.y.total_cmp(&b.1.y).then_with(|| a.0.cmp(&b.0)));

    let panel_left = viewport.x - config.panel_width;
    let panel_top = config.top_reserved;
    if panel_left <= 0.0 || viewport.y - panel_top <= config.label_height {
        // Viewport not measured yet, or too cramped for even one label.
        return CalloutLayout {
            entries: Vec::new(),
            overflow: candidates.len(),
        };
    }

    let band_bottom = viewport.y;
    let mut entries = Vec::with_capacity(candidates.len());
    let mut overflow = 0usize;
    let mut next_free = panel_top;

    for (slot, (id, anchor, kind)) in candidates.iter().copied().enumerate() {
        let label_y = match config.strategy {
            StackStrategy::Stacked => {
                // Prefer a slot centered on the anchor, then push down past
                // anything already placed. Candidates arrive in ascending
                // anchor order, so one forward pass cannot collide.
                let preferred = (anchor.y - config.label_height * 0.5).max(panel_top);
                let placed = preferred.max(next_free);
                if placed + config.label_height > band_bottom {
                    overflow += 1;
                    continue;
                }
                next_free = placed + config.label_height + config.gap;
                placed
            }
            StackStrategy::Rows => {
                // Uniform rows; the panel scrolls, so slots may extend past
                // the bottom of the viewport.
                panel_top + slot as f32 * (config.label_height + config.gap)
            }
        };

        let label_rect = Rect::from_min_size(
            pos2(panel_left, label_y),
            vec2(config.panel_width, config.label_height),
        );
        let line_start = pos2(anchor.x, anchor.y.clamp(panel_top, band_bottom));

        entries.push(CalloutEntry {
            node_id: id,
            anchor,
            line_start,
            label_rect,
            color: kind_color(kind),
        });
    }

    CalloutLayout { entries, overflow }
}

/// Highlighted nodes currently classified off-screen, for the coarse
/// "+N off-screen" affordance. Ordered by node id for a stable summary.
pub fn offscreen_highlights(
    highlighted: &HashSet<NodeId>,
    visibility: &HashMap<NodeId, VisibilityInfo>,
) -> Vec<NodeId> {
    let mut ids = highlighted
        .iter()
        .copied()
        .filter(|id| {
            visibility
                .get(id)
                .is_some_and(|info| info.category == VisibilityCategory::OffScreen)
        })
        .collect::<Vec<_>>();
    ids.sort_unstable();
    ids
}
