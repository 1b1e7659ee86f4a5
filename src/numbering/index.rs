//! Lookup tables over a decoded numbering part.

use super::{AbstractNum, Numbering};
use std::collections::HashMap;

/// numId → abstractNumId and abstractNumId → definition, built in one pass.
///
/// Entries whose ids are not integers are skipped. When an id appears more
/// than once, the last entry wins.
#[derive(Debug, Default)]
pub struct NumberingIndex<'a> {
    abstract_ids: HashMap<i64, i64>,
    definitions: HashMap<i64, &'a AbstractNum>,
}

impl<'a> NumberingIndex<'a> {
    /// Index a numbering part.
    pub fn build(numbering: &'a Numbering) -> Self {
        let mut index = Self::default();
        for num in &numbering.nums {
            let (Some(num_id), Some(abstract_id)) = (
                parse_id(num.id(), "numId"),
                parse_id(num.abstract_num_id.as_deref(), "abstractNumId"),
            ) else {
                continue;
            };
            index.abstract_ids.insert(num_id, abstract_id);
        }
        for def in &numbering.abstract_nums {
            if let Some(id) = parse_id(def.id(), "abstractNumId") {
                index.definitions.insert(id, def);
            }
        }
        log::debug!(
            "indexed {} numbering instances over {} definitions",
            index.abstract_ids.len(),
            index.definitions.len()
        );
        index
    }

    /// The abstract definition id behind a numbering instance.
    pub fn abstract_id(&self, num_id: i64) -> Option<i64> {
        self.abstract_ids.get(&num_id).copied()
    }

    /// An abstract definition by id.
    pub fn definition(&self, abstract_id: i64) -> Option<&'a AbstractNum> {
        self.definitions.get(&abstract_id).copied()
    }

    /// Both lookups at once.
    pub fn resolve(&self, num_id: i64) -> Option<(i64, &'a AbstractNum)> {
        let abstract_id = self.abstract_id(num_id)?;
        Some((abstract_id, self.definition(abstract_id)?))
    }
}

fn parse_id(raw: Option<&str>, what: &str) -> Option<i64> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(id) => Some(id),
        Err(_) => {
            log::warn!("skipping numbering entry with invalid {} {:?}", what, raw);
            None
        }
    }
}
