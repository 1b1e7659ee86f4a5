//! Output rendering for decoded documents.
//!
//! Plain text walks the body in reading order and resolves list labels
//! through one numbering session per render. JSON serializes the decoded
//! tree as is.
//!
//! # Example
//!
//! ```no_run
//! use redocx::render::{to_json, JsonFormat, RenderOptions};
//! use redocx::Docx;
//!
//! let docx = Docx::open("report.docx")?;
//!
//! let text = docx.plain_text(&RenderOptions::default())?;
//! let json = to_json(docx.document(), JsonFormat::Pretty)?;
//! # Ok::<(), redocx::Error>(())
//! ```

mod json;
mod options;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::{HyperlinkStyle, RenderOptions};
pub use text::{to_text, TextRenderer};
