//! List label resolution.

use super::{
    AbstractNum, CounterTable, Level, Numbering, NumberingIndex, NumberingOptions, RestartMode,
    TemplateMode, UnresolvedMode,
};
use crate::error::{Error, Result};
use crate::model::NumberingReference;
use std::collections::HashMap;

/// One numbering session over one document.
///
/// Owns the lookup index (built on first use) and the counters, so two
/// sessions never see each other's state. Labels must be requested in
/// reading order.
#[derive(Debug)]
pub struct NumberingResolver<'a> {
    numbering: &'a Numbering,
    options: NumberingOptions,
    index: Option<NumberingIndex<'a>>,
    counters: CounterTable,
    occurrences: HashMap<i64, u32>,
    previous: Option<i64>,
}

impl<'a> NumberingResolver<'a> {
    /// Start a session with default options.
    pub fn new(numbering: &'a Numbering) -> Self {
        Self::with_options(numbering, NumberingOptions::default())
    }

    /// Start a session with the given options.
    pub fn with_options(numbering: &'a Numbering, options: NumberingOptions) -> Self {
        Self {
            numbering,
            options,
            index: None,
            counters: CounterTable::new(),
            occurrences: HashMap::new(),
            previous: None,
        }
    }

    /// Options in effect.
    pub fn options(&self) -> &NumberingOptions {
        &self.options
    }

    /// Current counter state.
    pub fn counters(&self) -> &CounterTable {
        &self.counters
    }

    /// Drop all counters and occurrence history, as if no label had been
    /// requested yet.
    pub fn reset(&mut self) {
        self.counters.clear();
        self.occurrences.clear();
        self.previous = None;
    }

    /// Label for a paragraph's numbering reference.
    ///
    /// `numId` 0 removes numbering and yields an empty label.
    pub fn label(&mut self, reference: &NumberingReference) -> Result<String> {
        let ilvl = reference.level();
        match reference.list_id() {
            Some(0) => Ok(String::new()),
            Some(num_id) => self.label_for(num_id, ilvl),
            None => self.unresolved(reference.num_id.as_deref().unwrap_or(""), ilvl),
        }
    }

    /// Label for level `ilvl` of numbering instance `num_id`.
    pub fn label_for(&mut self, num_id: i64, ilvl: usize) -> Result<String> {
        let seen = self.occurrences.entry(num_id).or_insert(0);
        let first = *seen == 0;
        *seen += 1;
        let restart = match self.options.restart {
            RestartMode::OncePerNumId => first,
            RestartMode::PerListInstance => self.previous != Some(num_id),
        };
        self.previous = Some(num_id);

        let Some((abstract_id, def)) = self.index().resolve(num_id) else {
            return self.unresolved(&num_id.to_string(), ilvl);
        };
        let Some(level) = def.level(ilvl).filter(|level| !level.placeholder) else {
            return self.unresolved(&num_id.to_string(), ilvl);
        };

        let start_of = |k: usize| def.level(k).map_or(0, Level::start_value);
        let counts = if restart {
            let seed = start_of(0);
            match self.options.restart {
                RestartMode::OncePerNumId => self.counters.restart(abstract_id, seed).to_vec(),
                RestartMode::PerListInstance if ilvl > 0 => {
                    self.counters.restart(abstract_id, seed);
                    self.counters.advance(abstract_id, ilvl, start_of).to_vec()
                }
                RestartMode::PerListInstance => self.counters.restart(abstract_id, seed).to_vec(),
            }
        } else {
            let counts = self.counters.advance(abstract_id, ilvl, start_of).to_vec();
            if self.options.restart == RestartMode::PerListInstance {
                self.counters.truncate(abstract_id, ilvl);
            }
            counts
        };

        Ok(self.render(def, level, ilvl, &counts))
    }

    fn index(&mut self) -> &NumberingIndex<'a> {
        let numbering = self.numbering;
        self.index
            .get_or_insert_with(|| NumberingIndex::build(numbering))
    }

    fn render(&self, def: &AbstractNum, level: &Level, ilvl: usize, counts: &[u32]) -> String {
        let template = level.template();
        match self.options.substitution {
            TemplateMode::LastLevelOnly => match counts.last() {
                Some(&value) => template.replace(
                    &format!("%{}", ilvl + 1),
                    &level.number_format().render(value),
                ),
                None => template.to_string(),
            },
            TemplateMode::AllLevels => {
                let mut out = template.to_string();
                for k in (0..=ilvl).rev() {
                    let source = def.level(k);
                    let value = counts
                        .get(k)
                        .copied()
                        .unwrap_or_else(|| source.map_or(0, Level::start_value));
                    let format = source.map(Level::number_format).unwrap_or_default();
                    out = out.replace(&format!("%{}", k + 1), &format.render(value));
                }
                out
            }
        }
    }

    fn unresolved(&self, num_id: &str, ilvl: usize) -> Result<String> {
        match &self.options.unresolved {
            UnresolvedMode::Placeholder(marker) => {
                log::warn!(
                    "unresolved numbering reference numId={} ilvl={}",
                    num_id,
                    ilvl
                );
                Ok(marker.clone())
            }
            UnresolvedMode::Error => Err(Error::UnresolvedNumbering {
                num_id: num_id.to_string(),
                ilvl: ilvl.to_string(),
            }),
        }
    }
}
