use std::env;

use crate::api::Description;
use crate::constant::DEFAULT_END_OF_OPTIONS;
use crate::parser::base::*;
use crate::parser::{ErrorContext, VariableMap};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Parse `tokens` against `group`, then check every finalizer.
///
/// Uses an empty seed and the default end of options sentinel `--`.
/// See [`ArgumentParser`] for the configurable form.
///
/// ### Example
/// ```
/// # use cmdopts_builder as cmdopts;
/// use cmdopts::{make_flag, make_operand, parse_arguments, Constraint, OptionSpec, ValueSpec};
///
/// let group = vec![
///     make_flag(OptionSpec::long("verbose").with_short('v'), Constraint::new()).unwrap(),
///     make_operand("file", ValueSpec::<String>::new(), Constraint::new()).unwrap(),
/// ];
/// let map = parse_arguments(["-v", "input.txt"], &group).unwrap();
///
/// assert!(map.contains("verbose"));
/// assert_eq!(map.value_of::<String>("file").unwrap(), "input.txt");
/// ```
pub fn parse_arguments<'d, I, S>(
    tokens: I,
    group: &[Description<'d>],
) -> Result<VariableMap, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ArgumentParser::new(group).parse(tokens)
}

/// Parse `tokens` against `group`, without checking any finalizer.
///
/// Uses an empty seed and the default end of options sentinel `--`.
pub fn parse_incremental_arguments<'d, I, S>(
    tokens: I,
    group: &[Description<'d>],
) -> Result<VariableMap, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ArgumentParser::new(group).parse_incremental(tokens)
}

/// Check every finalizer of `group` against `map`, in group order.
/// The first violation is returned.
pub fn finalize(group: &[Description<'_>], map: &VariableMap) -> Result<(), ParseError> {
    for description in group {
        if let Err(error) = description.finalize(map) {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Finalize failed: {error}");
            }

            return Err(error);
        }
    }

    Ok(())
}

/// The configurable parse entry point.
///
/// ### Example
/// ```
/// # use cmdopts_builder as cmdopts;
/// use cmdopts::{make_option, ArgumentParser, Constraint, OptionSpec, ValueSpec};
///
/// let group = vec![
///     make_option(OptionSpec::long("level"), ValueSpec::<u32>::new(), Constraint::new()).unwrap(),
/// ];
///
/// // Layer the command line over a configuration file.
/// let configured = ArgumentParser::new(&group)
///     .parse_incremental(["--level=1"])
///     .unwrap();
/// let map = ArgumentParser::new(&group)
///     .seed(configured)
///     .parse(["--level", "3"])
///     .unwrap();
///
/// assert_eq!(map.count("level"), 2);
/// assert_eq!(map.value_of::<u32>("level").unwrap(), 3);
/// ```
pub struct ArgumentParser<'a, 'd> {
    group: &'a [Description<'d>],
    end_of_options: String,
    seed: VariableMap,
}

impl<'a, 'd> std::fmt::Debug for ArgumentParser<'a, 'd> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgumentParser")
            .field("end_of_options", &self.end_of_options)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl<'a, 'd> ArgumentParser<'a, 'd> {
    /// Create an argument parser for the description `group`.
    pub fn new(group: &'a [Description<'d>]) -> Self {
        Self {
            group,
            end_of_options: DEFAULT_END_OF_OPTIONS.to_string(),
            seed: VariableMap::default(),
        }
    }

    /// Set the end of options sentinel (default `--`).
    /// Once the sentinel is consumed, every remaining token is an operand.
    pub fn end_of_options(mut self, sentinel: impl Into<String>) -> Self {
        self.end_of_options = sentinel.into();
        self
    }

    /// Set the map to start from.
    /// The parse copies it, so the caller's map is never mutated.
    pub fn seed(mut self, map: VariableMap) -> Self {
        self.seed = map;
        self
    }

    /// Parse `tokens`, without checking any finalizer.
    pub fn parse_incremental<I, S>(&self, tokens: I) -> Result<VariableMap, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|token| token.as_ref().to_string())
            .collect();

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Parsing tokens {tokens:?}.");
        }

        Parser::new(self.group, &self.end_of_options, tokens, &self.seed).consume()
    }

    /// Parse `tokens`, then check every finalizer.
    pub fn parse<I, S>(&self, tokens: I) -> Result<VariableMap, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let map = self.parse_incremental(tokens)?;
        finalize(self.group, &map)?;
        Ok(map)
    }

    /// Parse the Cli [`env::args`], then check every finalizer.
    pub fn parse_env(&self) -> Result<VariableMap, ParseError> {
        self.parse(env::args().skip(1))
    }

    /// Parse the Cli [`env::args`], then check every finalizer.
    ///
    /// If at any point the parse fails, the error (and the offending token) is printed,
    /// and the program exits with error code `1` (via [`std::process::exit`]).
    pub fn parse_env_or_exit(&self) -> VariableMap {
        let tokens: Vec<String> = env::args().skip(1).collect();

        match self.parse(&tokens) {
            Ok(map) => map,
            Err(error) => {
                eprintln!("{error}");

                if let Some(context) = ErrorContext::from_error(&error, &tokens) {
                    eprintln!("{context}");
                }

                std::process::exit(1);
            }
        }
    }
}
