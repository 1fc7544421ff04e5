//! # Property Type Filter
//!
//! The projects grid is not a slider: it shows a row of tabs ("All Projects"
//! plus one per property type) and hides the cards that do not match the
//! selected tab. Types are taken from the rendered items, lower-cased; when no
//! item carries one, the usual four types are offered.
//!
//! Filtering only toggles the [`HIDDEN`] class. Children and render state stay
//! as the renderer left them, so switching back to [`ALL_FILTER`] restores the
//! grid exactly.

use super::layout::{type_key, type_label};
use super::region::{Node, Region};
use crate::model::Item;

/// Tab value that shows every card.
pub const ALL_FILTER: &str = "all";
/// Class carried by filtered-out cards.
pub const HIDDEN: &str = "hidden";
/// Tabs offered before any typed data is known.
pub const DEFAULT_TYPES: [&str; 4] = ["villa", "apartment", "penthouse", "townhouse"];

/// Distinct property types of `items`, first-seen order.
pub fn property_types(items: &[Item]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for item in items.iter().filter(|i| i.property_type.as_deref().is_some_and(|t| !t.trim().is_empty())) {
        let key = type_key(item);
        if !types.contains(&key) {
            types.push(key);
        }
    }
    if types.is_empty() {
        return DEFAULT_TYPES.iter().map(|t| (*t).to_string()).collect();
    }
    types
}

/// The tab row, with `active` marked.
pub fn filter_tabs(types: &[String], active: &str) -> Node {
    let active = active.trim().to_lowercase();
    let tab = |value: &str, label: String| {
        let mut button = Node::new("button").class("filter-tab").attr("data-filter", value).text(label);
        if value == active {
            button.add_class("active");
        }
        button
    };

    types.iter().fold(
        Node::new("div")
            .class("projects-filter-tabs")
            .child(tab(ALL_FILTER, "All Projects".to_string())),
        |row, kind| row.child(tab(kind, type_label(kind))),
    )
}

/// Shows the cards whose `data-type` matches `filter` (case-insensitive) and
/// hides the rest. Returns the number of visible cards.
pub fn apply_type_filter(region: &mut Region, filter: &str) -> usize {
    let filter = filter.trim().to_lowercase();
    let mut visible = 0;

    for card in region.children_mut() {
        let kind = card.get_attr("data-type").map(str::to_lowercase);
        let shown = filter == ALL_FILTER || kind.as_deref() == Some(filter.as_str());
        if shown {
            card.remove_class(HIDDEN);
            visible += 1;
        } else {
            card.add_class(HIDDEN);
        }
    }

    log::debug!("Region '{}' filtered by '{}': {} card(s) visible", region.id(), filter, visible);
    visible
}
