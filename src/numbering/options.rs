//! Numbering resolution options.

/// Marker rendered for a numbering reference that cannot be resolved.
pub const UNRESOLVED_MARKER: &str = "＠";

/// When a list's counters start over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RestartMode {
    /// Restart only on the very first reference to a numId in a session.
    /// A numId that reappears later continues where it left off.
    #[default]
    OncePerNumId,
    /// Restart whenever the previous numbered paragraph used a different
    /// numId, and drop deeper counters when a shallower level advances.
    PerListInstance,
}

/// How level-text placeholders (`%1`, `%2`, ...) are filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemplateMode {
    /// Substitute only the paragraph's own level placeholder. The value is
    /// the deepest counter the list has reached so far, not necessarily the
    /// paragraph's own level: after `1.`, `a)`, `b)`, `c)` a return to
    /// level 0 renders `3.` from the nested count. Other placeholders stay in the
    /// text.
    #[default]
    LastLevelOnly,
    /// Substitute every placeholder up to the paragraph's level, each with
    /// its own level's count and format.
    AllLevels,
}

/// What to do with a reference to a missing numId, definition or level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedMode {
    /// Render the given marker instead of a label.
    Placeholder(String),
    /// Fail with [`Error::UnresolvedNumbering`](crate::Error::UnresolvedNumbering).
    Error,
}

impl Default for UnresolvedMode {
    fn default() -> Self {
        Self::Placeholder(UNRESOLVED_MARKER.to_string())
    }
}

/// Options for a numbering resolution session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberingOptions {
    /// Counter restart behaviour
    pub restart: RestartMode,

    /// Level-text substitution behaviour
    pub substitution: TemplateMode,

    /// Handling of unresolvable references
    pub unresolved: UnresolvedMode,
}

impl NumberingOptions {
    /// Create default numbering options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the restart mode.
    pub fn with_restart(mut self, restart: RestartMode) -> Self {
        self.restart = restart;
        self
    }

    /// Set the template substitution mode.
    pub fn with_substitution(mut self, substitution: TemplateMode) -> Self {
        self.substitution = substitution;
        self
    }

    /// Set the handling of unresolvable references.
    pub fn with_unresolved(mut self, unresolved: UnresolvedMode) -> Self {
        self.unresolved = unresolved;
        self
    }

    /// Restart per list instance and substitute all levels, the way word
    /// processors display lists.
    pub fn conventional() -> Self {
        Self::new()
            .with_restart(RestartMode::PerListInstance)
            .with_substitution(TemplateMode::AllLevels)
    }
}
