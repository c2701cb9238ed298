use crate::parser::ParseError;

/// Point at the token a structural [`ParseError`] refers to.
///
/// ```
/// # use cmdopts_builder as cmdopts;
/// use cmdopts::ErrorContext;
///
/// let context = ErrorContext::new(1, &["-v", "blah", "input.txt"]);
/// assert_eq!(context.to_string(), "-v blah input.txt\n   ^^^^");
/// ```
///
/// The caret is placed after the final token when the index runs past the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    index: usize,
    tokens: Vec<String>,
}

impl ErrorContext {
    /// Create the context for the `index`-th input token.
    pub fn new<S: AsRef<str>>(index: usize, tokens: &[S]) -> Self {
        Self {
            index,
            tokens: tokens.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }

    /// Create the context for a structural error, or `None` for a constraint error.
    ///
    /// The caret is placed under the input token the error came from, so an error inside a packed cluster points at the whole cluster.
    pub fn from_error<S: AsRef<str>>(error: &ParseError, tokens: &[S]) -> Option<Self> {
        error.token().map(|index| Self::new(index, tokens))
    }

    /// The offending token, if it is one of the input tokens.
    pub fn token(&self) -> Option<&str> {
        self.tokens.get(self.index).map(String::as_str)
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let line = self.tokens.join(" ");
        let (offset, width) = match self.token() {
            Some(token) => {
                let offset: usize = self.tokens[..self.index]
                    .iter()
                    .map(|t| t.chars().count() + 1)
                    .sum();
                (offset, std::cmp::max(token.chars().count(), 1))
            }
            None if line.is_empty() => (0, 1),
            None => (line.chars().count() + 1, 1),
        };

        writeln!(f, "{line}")?;
        write!(f, "{:offset$}{}", "", "^".repeat(width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec!["1", "blah"], 1, "1 blah\n  ^^^^")]
    #[case(vec!["1", "blah"], 0, "1 blah\n^")]
    #[case(vec!["--flag", "", "x"], 1, "--flag  x\n       ^")]
    #[case(vec!["-abc"], 2, "-abc\n     ^")]
    #[case(vec![], 0, "\n^")]
    #[case(vec!["é", "ü"], 1, "é ü\n  ^")]
    fn display(#[case] tokens: Vec<&str>, #[case] index: usize, #[case] expected: &str) {
        // Setup
        let context = ErrorContext::new(index, &tokens);

        // Execute
        let out = context.to_string();

        // Verify
        assert_eq!(out, expected);
    }

    #[test]
    fn from_error() {
        // Setup
        let tokens = vec!["-x".to_string()];
        let structural = ParseError::UnknownOption {
            position: 0,
            argument: 0,
            token: 0,
        };
        let constraint = ParseError::Occurrence {
            key: "x".to_string(),
            min: 1,
            max: 1,
            occurrences: 0,
        };

        // Execute
        let structural_context = ErrorContext::from_error(&structural, &tokens);
        let constraint_context = ErrorContext::from_error(&constraint, &tokens);

        // Verify
        assert_eq!(structural_context.unwrap().token(), Some("-x"));
        assert_eq!(constraint_context, None);
    }

    #[test]
    fn from_error_after_packed() {
        // Setup
        let tokens = vec!["-ab", "x", "-z", "y"];
        let error = ParseError::UnknownOption {
            position: 2,
            argument: 3,
            token: 2,
        };

        // Execute
        let context = ErrorContext::from_error(&error, &tokens).unwrap();

        // Verify
        assert_eq!(context.token(), Some("-z"));
        assert_eq!(context.to_string(), "-ab x -z y\n      ^^");
    }
}
