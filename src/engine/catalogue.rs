use crate::model::Catalogue;
use std::collections::BTreeMap;
use tracing::debug;

/// Merges previously saved catalogue entries into the configured defaults.
///
/// For a category in `defaults`, the result is the default list followed by every saved entry
/// not already in it, in saved order. Categories only in `saved` are copied through. Nothing is
/// removed, and merging the output with the same `saved` again changes nothing.
pub fn merge_catalogue(defaults: &Catalogue, saved: &Catalogue) -> Catalogue {
    let mut merged: BTreeMap<String, Vec<String>> = defaults.inner().clone();
    for (category, entries) in saved.categories() {
        match merged.get_mut(category) {
            Some(list) => {
                for entry in entries {
                    if !list.contains(entry) {
                        debug!("Adding saved ticket {entry} to {category}");
                        list.push(entry.clone());
                    }
                }
            }
            None => {
                let _ = merged.insert(category.clone(), entries.clone());
            }
        }
    }
    Catalogue::new(merged)
}
