//! List numbering: definitions, lookup, counters and label rendering.
//!
//! A [`Numbering`] is decoded once per document. Labels are produced by a
//! [`NumberingResolver`], which owns the [`NumberingIndex`] and the
//! [`CounterTable`] for one pass over the document and renders each count
//! through [`NumberFormat`].

mod counter;
mod definition;
mod format;
mod index;
mod options;
mod resolver;

pub use counter::CounterTable;
pub use definition::{AbstractNum, Level, Num, Numbering, MAX_LEVEL};
pub use format::{format_number, NumberFormat};
pub use index::NumberingIndex;
pub use options::{NumberingOptions, RestartMode, TemplateMode, UnresolvedMode, UNRESOLVED_MARKER};
pub use resolver::NumberingResolver;
