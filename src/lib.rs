//! # redocx
//!
//! Order-preserving WordprocessingML decoding with list numbering labels.
//!
//! A `.docx` main document decodes into a typed tree that keeps every
//! paragraph's children in document order. Numbered paragraphs get the
//! label a word processor would display ("1.", "③", "ロ", "１２"), computed
//! by a numbering session scoped to one render. The tree serializes back to
//! markup with empty elements in `<tag attrs />` form.
//!
//! ## Quick Start
//!
//! ```no_run
//! use redocx::{Docx, RenderOptions};
//!
//! // Text with list labels
//! let text = redocx::extract_text("document.docx")?;
//! println!("{}", text);
//!
//! // Full access to the tree
//! let docx = Docx::open("document.docx")?;
//! println!("Blocks: {}", docx.document().body.items.len());
//! println!("Labels: {:?}", docx.numbering_labels()?);
//!
//! // Write it back out
//! docx.save("copy.docx")?;
//! # Ok::<(), redocx::Error>(())
//! ```
//!
//! ## Numbering sessions
//!
//! ```
//! use redocx::numbering::{AbstractNum, Level, Num, Numbering, NumberingResolver};
//!
//! let mut numbering = Numbering::new();
//! numbering
//!     .abstract_nums
//!     .push(AbstractNum::new(0).with_level(Level::new(0, 1, "decimal", "%1.")));
//! numbering.nums.push(Num::new(1, 0));
//!
//! let mut resolver = NumberingResolver::new(&numbering);
//! assert_eq!(resolver.label_for(1, 0)?, "1.");
//! assert_eq!(resolver.label_for(1, 0)?, "2.");
//! # Ok::<(), redocx::Error>(())
//! ```
//!
//! ## Features
//!
//! - `async`: [`Docx::open_async`] reads the file with Tokio

pub mod docx;
pub mod error;
pub mod model;
pub mod numbering;
pub mod package;
pub mod render;
pub mod xml;

// Re-exports
pub use docx::Docx;
pub use error::{Error, Result};
pub use model::{Body, BodyItem, Document, Hyperlink, Node, Paragraph, Run, RunContent};
pub use numbering::{Numbering, NumberingOptions, NumberingResolver};
pub use package::{Package, Relationship, RelationshipResolver, Relationships};
pub use render::{HyperlinkStyle, RenderOptions};
pub use xml::DecodeOptions;

use std::path::Path;

/// Open and decode a `.docx` file.
pub fn open(path: impl AsRef<Path>) -> Result<Docx> {
    Docx::open(path)
}

/// Extract plain text with list labels using default options.
///
/// # Example
///
/// ```no_run
/// let text = redocx::extract_text("document.docx")?;
/// # Ok::<(), redocx::Error>(())
/// ```
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    Docx::open(path)?.plain_text(&RenderOptions::default())
}

/// Extract plain text from a `.docx` held in memory.
pub fn extract_text_from_bytes(data: &[u8]) -> Result<String> {
    Docx::from_bytes(data.to_vec())?.plain_text(&RenderOptions::default())
}
