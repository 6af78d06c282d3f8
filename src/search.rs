use crate::dom::{Dom, Mutation};

pub const INPUT_ID: &str = "dashboardSearch";
pub const CARD_CLASS: &str = "grievance-card";

/// Shows cards whose text contains `query`, case-insensitively, and hides the
/// rest. An empty query shows everything.
pub fn plan_filter<D: Dom>(dom: &D, query: &str) -> Vec<Mutation<D::Node>> {
    let needle = query.to_lowercase();
    dom.elements_by_class(CARD_CLASS)
        .into_iter()
        .map(|card| {
            if dom.text_content(&card).to_lowercase().contains(&needle) {
                Mutation::ClearStyle {
                    node: card,
                    property: "display",
                }
            } else {
                Mutation::SetStyle {
                    node: card,
                    property: "display",
                    value: "none".to_string(),
                }
            }
        })
        .collect()
}
