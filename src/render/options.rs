//! Rendering options configuration.

use crate::numbering::NumberingOptions;

/// How hyperlinks appear in plain text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HyperlinkStyle {
    /// `[text](target)`, falling back to the relationship id, then to
    /// `#anchor`
    #[default]
    Markdown,
    /// Link text only
    TextOnly,
}

/// Options for plain-text rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Numbering session options
    pub numbering: NumberingOptions,

    /// Hyperlink rendering
    pub hyperlinks: HyperlinkStyle,

    /// Text placed between block-level items
    pub paragraph_separator: String,

    /// Include empty paragraphs in output
    pub include_empty_paragraphs: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            numbering: NumberingOptions::default(),
            hyperlinks: HyperlinkStyle::Markdown,
            paragraph_separator: "\n".to_string(),
            include_empty_paragraphs: false,
        }
    }
}

impl RenderOptions {
    /// Create new render options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the numbering options.
    pub fn with_numbering(mut self, numbering: NumberingOptions) -> Self {
        self.numbering = numbering;
        self
    }

    /// Set the hyperlink style.
    pub fn with_hyperlinks(mut self, style: HyperlinkStyle) -> Self {
        self.hyperlinks = style;
        self
    }

    /// Set the block separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.paragraph_separator = separator.into();
        self
    }

    /// Keep paragraphs that render to nothing.
    pub fn with_empty_paragraphs(mut self, include: bool) -> Self {
        self.include_empty_paragraphs = include;
        self
    }
}
