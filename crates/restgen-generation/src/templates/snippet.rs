//! Named template snippets with declared symbol dependencies

/// One template of a generator, plus the symbols it defines and refers to
///
/// A generator resolves its snippets in order. A snippet may only use a
/// symbol that an earlier snippet (or the snippet itself) introduces, or that
/// the generator declares as external.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// Name used in diagnostics
    pub name: String,
    /// Template text
    pub body: String,
    /// Symbols defined by this snippet
    pub introduces: Vec<String>,
    /// Symbols this snippet refers to
    pub uses: Vec<String>,
}

impl Snippet {
    /// Create a snippet with no declared symbols
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            introduces: Vec::new(),
            uses: Vec::new(),
        }
    }

    /// Declare symbols this snippet defines
    pub fn introduces<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.introduces.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Declare symbols this snippet refers to
    pub fn uses<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uses.extend(symbols.into_iter().map(Into::into));
        self
    }
}
