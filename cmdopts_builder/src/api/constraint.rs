use crate::parser::{ConfigError, ParseError, VariableMap};

/// Declarative limits on one stored key, checked after a full parse.
///
/// By default a key may occur any number of times (including zero), and is unrelated to every other key.
///
/// ### Example
/// ```
/// # use cmdopts_builder as cmdopts;
/// use cmdopts::{make_flag, parse_arguments, Constraint, OptionSpec, ParseError};
///
/// let group = vec![
///     make_flag(OptionSpec::long("quiet"), Constraint::new().mutually_exclusive(["verbose"])).unwrap(),
///     make_flag(OptionSpec::long("verbose"), Constraint::new().at_most(3)).unwrap(),
/// ];
///
/// assert!(parse_arguments(["--verbose", "--verbose"], &group).is_ok());
/// assert!(matches!(
///     parse_arguments(["--quiet", "--verbose"], &group),
///     Err(ParseError::MutuallyExclusive { .. })
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    position: Option<usize>,
    argument: Option<usize>,
    min: usize,
    max: usize,
    mutually_exclusive: Vec<String>,
    mutually_inclusive: Vec<String>,
}

impl Default for Constraint {
    fn default() -> Self {
        Self {
            position: None,
            argument: None,
            min: 0,
            max: usize::MAX,
            mutually_exclusive: Vec::default(),
            mutually_inclusive: Vec::default(),
        }
    }
}

impl Constraint {
    /// Create an unconstrained constraint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept the operand at this operand position (0-based).
    pub fn at_position(mut self, position: usize) -> Self {
        self.position.replace(position);
        self
    }

    /// Only accept the operand at this argument index (0-based).
    pub fn at_argument(mut self, argument: usize) -> Self {
        self.argument.replace(argument);
        self
    }

    /// Require precisely `n` occurrences.
    pub fn occurrences(self, n: usize) -> Self {
        self.occurrences_between(n, n)
    }

    /// Require between `min` and `max` occurrences (inclusive).
    pub fn occurrences_between(mut self, min: usize, max: usize) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Require at least `min` occurrences.
    pub fn at_least(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    /// Allow at most `max` occurrences.
    pub fn at_most(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    /// When this key occurs, none of `keys` may occur.
    ///
    /// Exclusion is one-directional: state it on both keys for the symmetric rule.
    pub fn mutually_exclusive<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mutually_exclusive
            .extend(keys.into_iter().map(Into::into));
        self
    }

    /// When this key occurs, all of `keys` must occur.
    pub fn mutually_inclusive<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mutually_inclusive
            .extend(keys.into_iter().map(Into::into));
        self
    }

    /// The minimum occurrences.
    pub fn min_occurrences(&self) -> usize {
        self.min
    }

    /// The maximum occurrences (`usize::MAX` is unbounded).
    pub fn max_occurrences(&self) -> usize {
        self.max
    }

    /// Whether a position or argument pin is set.
    pub fn is_pinned(&self) -> bool {
        self.position.is_some() || self.argument.is_some()
    }

    /// Whether the pins (if any) match the operand `position` and `argument`.
    pub fn pins(&self, position: usize, argument: usize) -> bool {
        self.position.map_or(true, |p| p == position) && self.argument.map_or(true, |a| a == argument)
    }

    /// Whether there is nothing to check after a parse.
    pub fn is_unconstrained(&self) -> bool {
        self.min == 0
            && self.max == usize::MAX
            && self.mutually_exclusive.is_empty()
            && self.mutually_inclusive.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidOccurrences {
                min: self.min,
                max: self.max,
            });
        }

        Ok(())
    }

    /// Check `key` against the final `map`.
    ///
    /// Occurrences are checked first, then exclusion, then inclusion.
    /// Exclusion and inclusion only apply when `key` occurs.
    pub fn check(&self, key: &str, map: &VariableMap) -> Result<(), ParseError> {
        let occurrences = map.count(key);

        if occurrences < self.min || occurrences > self.max {
            return Err(ParseError::Occurrence {
                key: key.to_string(),
                min: self.min,
                max: self.max,
                occurrences,
            });
        }

        if occurrences > 0 {
            if let Some(exclusive) = self.mutually_exclusive.iter().find(|k| map.contains(k)) {
                return Err(ParseError::MutuallyExclusive {
                    key: key.to_string(),
                    exclusive: exclusive.clone(),
                });
            }

            if let Some(inclusive) = self.mutually_inclusive.iter().find(|k| !map.contains(k)) {
                return Err(ParseError::MutuallyInclusive {
                    key: key.to_string(),
                    inclusive: inclusive.clone(),
                });
            }
        }

        Ok(())
    }
}
