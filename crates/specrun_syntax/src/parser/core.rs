/// Parser state and top-level entrypoint.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module.
/// - The parser is single-pass and recovers from errors where possible by
///   synchronizing at statement boundaries.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<CompileError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the entire token stream into a [`Program`].
    ///
    /// ## Errors
    /// Returns a list of [`CompileError`]s if parsing fails. The parser attempts
    /// to recover and continue after an error to report multiple issues in one pass.
    pub fn parse(mut self) -> Result<Program, Vec<CompileError>> {
        let mut body = Vec::new();

        self.skip_newlines();
        // Stray top-level DEDENT can appear after error recovery; ignore it at
        // the module level to avoid cascaded errors.
        self.skip_dedents();

        while !self.is_at_end() {
            match self.statement() {
                Ok(stmt) => body.push(stmt),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
            self.skip_newlines();
            self.skip_dedents();
        }

        if self.errors.is_empty() {
            Ok(Program { body })
        } else {
            Err(self.errors)
        }
    }
}
