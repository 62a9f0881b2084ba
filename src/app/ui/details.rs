use eframe::egui::{self, RichText, Ui};

use crate::data::NodeId;
use crate::util::{format_count_pair, truncate_title};

use super::super::chain::{filter_chain, rank_for_display};
use super::super::{NodeIntent, ViewModel};

impl ViewModel {
    pub(in crate::app) fn draw_chain_panel(&mut self, ui: &mut Ui) {
        ui.heading("Chain");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected else {
            ui.label("Select a node in the diagram or a callout label to expand its chain.");
            return;
        };

        let Some(node) = self.graph.node(selected_id) else {
            // The selection can go stale when a reload swaps the node set.
            ui.label("Selected node no longer exists in the loaded graph.");
            return;
        };

        ui.label(RichText::new(node.title.clone()).strong());
        ui.small(format!("#{}  {}", node.id, node.kind.label()));
        if let Some(description) = &node.description {
            ui.add_space(4.0);
            ui.label(description.clone());
        }
        if let Some(confidence) = node.confidence() {
            ui.small(format!("confidence: {confidence:.2}"));
        }

        let relations = self
            .graph
            .edges
            .iter()
            .filter(|edge| edge.from == selected_id || edge.to == selected_id)
            .take(8)
            .collect::<Vec<_>>();
        if !relations.is_empty() {
            ui.add_space(6.0);
            ui.label(RichText::new("Direct relations").strong());
            for edge in relations {
                let arrow = if edge.from == selected_id {
                    format!("{} -> #{}", edge.edge_type, edge.to)
                } else {
                    format!("#{} {} ->", edge.from, edge.edge_type)
                };
                match &edge.rationale {
                    Some(rationale) => {
                        ui.small(format!("{arrow}  ({})", truncate_title(rationale, 40)))
                    }
                    None => ui.small(arrow),
                };
            }
        }

        ui.add_space(8.0);
        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Filter:");
            ui.add(
                egui::TextEdit::singleline(&mut self.chain_query)
                    .hint_text("title, type, id..."),
            );
        });
        ui.add_space(6.0);

        let Some(chain) = &self.chain else {
            return;
        };
        let view = filter_chain(chain, &self.graph, &self.chain_query);

        let mut intent = None;
        intent = intent.or(self.chain_section(
            ui,
            "Ancestors",
            &view.ancestors,
            view.total_ancestors,
        ));
        ui.add_space(8.0);
        intent = intent.or(self.chain_section(
            ui,
            "Descendants",
            &view.descendants,
            view.total_descendants,
        ));

        match intent {
            Some(NodeIntent::Select(id)) => self.set_selected(Some(id)),
            Some(NodeIntent::Navigate(id)) => self.navigate_to(id),
            None => {}
        }
    }

    /// One expandable list of chain members, grouped by display rank. Rows
    /// emit abstract intents; selection and navigation are applied by the
    /// caller after the UI pass.
    fn chain_section(
        &self,
        ui: &mut Ui,
        label: &str,
        ids: &[NodeId],
        total: usize,
    ) -> Option<NodeIntent> {
        ui.label(
            RichText::new(format!(
                "{label} ({})",
                format_count_pair(ids.len(), total)
            ))
            .strong(),
        );

        if total == 0 {
            ui.small("none");
            return None;
        }
        if ids.is_empty() {
            ui.small("no matches for the current filter");
            return None;
        }

        let display = rank_for_display(ids, &self.graph);
        let mut intent = None;

        egui::ScrollArea::vertical()
            .id_salt(label)
            .max_height(260.0)
            .auto_shrink([false, true])
            .show_rows(ui, 22.0, display.len(), |ui, row_range| {
                for index in row_range {
                    let Some(&id) = display.get(index) else {
                        continue;
                    };
                    let Some(node) = self.graph.node(id) else {
                        continue;
                    };

                    ui.horizontal(|ui| {
                        let text = format!(
                            "{}  {}",
                            node.kind.label(),
                            truncate_title(&node.title, 36)
                        );
                        if ui
                            .link(text)
                            .on_hover_text(format!("#{}", node.id))
                            .clicked()
                        {
                            intent = Some(NodeIntent::Select(id));
                        }
                        if ui.small_button("center").clicked() {
                            intent = Some(NodeIntent::Navigate(id));
                        }
                    });
                }
            });

        intent
    }
}
