//! Parser options

/// Which raw commits survive classification
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Keep commits without a conventional prefix, typed `unknown`
    pub include_untyped: bool,
    /// Keep `Merge ...` commits
    pub include_merges: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            include_untyped: true,
            include_merges: false,
        }
    }
}

impl ParserConfig {
    pub fn with_untyped(mut self, include: bool) -> Self {
        self.include_untyped = include;
        self
    }

    pub fn with_merges(mut self, include: bool) -> Self {
        self.include_merges = include;
        self
    }
}
