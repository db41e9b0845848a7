use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Known ticket-catalogue numbers, grouped by category (a denomination such as `$5`).
///
/// Ticket numbers are free text. Lists keep their insertion order.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalogue(BTreeMap<String, Vec<String>>);

impl Catalogue {
    pub fn new(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self(entries)
    }

    pub fn get(&self, category: &str) -> Option<&Vec<String>> {
        self.0.get(category)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    pub fn contains(&self, category: &str, entry: &str) -> bool {
        self.0
            .get(category)
            .is_some_and(|list| list.iter().any(|e| e == entry))
    }

    /// Appends `entry` to `category` unless it is already listed. Returns whether it was added.
    pub fn add(&mut self, category: impl Into<String>, entry: impl Into<String>) -> bool {
        let list = self.0.entry(category.into()).or_default();
        let entry = entry.into();
        if list.contains(&entry) {
            return false;
        }
        list.push(entry);
        true
    }

    /// Removes every occurrence of `entry` from `category`. Returns whether anything was removed.
    pub fn remove(&mut self, category: &str, entry: &str) -> bool {
        match self.0.get_mut(category) {
            Some(list) => {
                let before = list.len();
                list.retain(|e| e != entry);
                list.len() < before
            }
            None => false,
        }
    }

    pub(crate) fn inner(&self) -> &BTreeMap<String, Vec<String>> {
        &self.0
    }
}

impl<C, E, I> FromIterator<(C, I)> for Catalogue
where
    C: Into<String>,
    E: Into<String>,
    I: IntoIterator<Item = E>,
{
    fn from_iter<T: IntoIterator<Item = (C, I)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(c, list)| (c.into(), list.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }
}
