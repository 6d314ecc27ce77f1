/// Parser knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Recursion budget before failing with `Error::TooDeep`.
    ///
    /// Every recursive rule entered charges one level: a type, a signature, a parameter list, a
    /// struct or interface body, an expression, an operand. One `func(` of nesting therefore costs
    /// three levels. Block braces count against the same budget.
    pub max_nesting_depth: usize,
}

impl ParseOptions {
    /// Fits every recursion shape in a 2 MiB thread stack, unoptimized builds included.
    pub const DEFAULT_MAX_NESTING_DEPTH: usize = 128;

    #[inline]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: Self::DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}
