//! Typed tree of a WordprocessingML main document.
//!
//! Every container keeps its children in document order. Element kinds
//! with a typed form decode into their own structs; a small set of known
//! kinds that need no interpretation (field characters, proofing marks,
//! table properties, drawings) are kept as verbatim markup; anything else
//! is dropped unless [`DecodeOptions::preserve_unknown`] is set.
//!
//! [`DecodeOptions::preserve_unknown`]: crate::xml::DecodeOptions::preserve_unknown

mod document;
mod paragraph;
mod properties;
mod run;
mod sdt;
mod table;

pub use document::*;
pub use paragraph::*;
pub use properties::*;
pub use run::*;
pub use sdt::*;
pub use table::*;
