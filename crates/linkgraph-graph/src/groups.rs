use std::collections::HashMap;

use linkgraph_core::types::Document;

/// Group key for posts without tags.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Primary tag → group number, numbered in first-seen order.
///
/// Numbering depends on the order documents are fed in; the reader sorts
/// files by name so repeated runs agree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupIndex {
    by_tag: HashMap<String, usize>,
    order: Vec<String>,
}

impl GroupIndex {
    pub fn new() -> Self { Self::default() }

    /// Group for `doc`, allocating the next number if its primary tag is new.
    pub fn assign(&mut self, doc: &Document) -> usize {
        let key = doc.primary_tag().unwrap_or(UNCATEGORIZED);
        if let Some(&group) = self.by_tag.get(key) {
            return group;
        }
        let group = self.order.len();
        self.by_tag.insert(key.to_string(), group);
        self.order.push(key.to_string());
        group
    }

    pub fn group_of(&self, tag: &str) -> Option<usize> { self.by_tag.get(tag).copied() }
}
