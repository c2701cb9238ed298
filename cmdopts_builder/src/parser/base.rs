use thiserror::Error;

use crate::api::{Description, MakeImplicit, MakeValue, OptionDescription, OptionValue};
use crate::model::Value;
use crate::parser::VariableMap;
use crate::unpack::OptionPack;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
/// A mistake in how a description was configured.
pub enum ConfigError {
    /// A long option name must be non-empty, printable ASCII, and free of `=` or a leading `-`.
    #[error("Config error: invalid long option name '{0}'.")]
    InvalidLongName(String),
    /// A short option name must be printable ASCII, other than `-` or `=`.
    #[error("Config error: invalid short option name '{0}'.")]
    InvalidShortName(char),
    /// An operand key must be non-empty.
    #[error("Config error: operand key must not be empty.")]
    EmptyKey,
    /// The minimum occurrences exceeds the maximum.
    #[error("Config error: minimum occurrences {min} exceeds maximum occurrences {max}.")]
    InvalidOccurrences {
        /// The configured minimum.
        min: usize,
        /// The configured maximum.
        max: usize,
    },
    /// Position and argument pins only apply to operands.
    #[error("Config error: option '{0}' cannot be pinned to a position or argument.")]
    PinnedOption(String),
    /// A constraint needs a stored key to count.
    #[error("Config error: an option accepting any key needs an explicit key to be constrained.")]
    UnkeyedConstraint,
    /// A switch stores its implicit value, so it must have one.
    #[error("Config error: switch '{0}' must have an implicit value.")]
    MissingImplicit(String),
}

/// The reasons a parse may fail.
///
/// Structural errors carry the running `position` (option count for options, operand count for operands)
/// and `argument` (count of consumed tokens) at the point of failure.
/// Packed arguments are counted as arguments of their own, so `token` records which input token the failure is in.
/// Constraint errors carry the stored keys involved.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A token has option syntax, but no option accepts its key.
    #[error("Parse error: unknown option (option {position}, argument {argument}).")]
    UnknownOption {
        /// The option count.
        position: usize,
        /// The argument count.
        argument: usize,
        /// The index of the input token the argument came from.
        token: usize,
    },
    /// An option requires a value, but none is available.
    #[error("Parse error: missing argument for option (option {position}, argument {argument}).")]
    MissingArgument {
        /// The option count.
        position: usize,
        /// The argument count.
        argument: usize,
        /// The index of the input token the argument came from.
        token: usize,
    },
    /// A value was given inline to an option that takes none.
    #[error("Parse error: option does not take an argument (option {position}, argument {argument}).")]
    UnexpectedArgument {
        /// The option count.
        position: usize,
        /// The argument count.
        argument: usize,
        /// The index of the input token the argument came from.
        token: usize,
    },
    /// No operand accepts a token.
    #[error("Parse error: unexpected operand (operand {position}, argument {argument}).")]
    UnexpectedOperand {
        /// The operand count.
        position: usize,
        /// The argument count.
        argument: usize,
        /// The index of the input token the argument came from.
        token: usize,
    },
    /// A value could not be converted.
    #[error("Parse error: invalid argument (position {position}, argument {argument}): {source}")]
    InvalidArgument {
        /// The option or operand count.
        position: usize,
        /// The argument count of the option or operand.
        argument: usize,
        /// The index of the input token the argument came from.
        token: usize,
        /// The conversion failure.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A key occurred too few or too many times.
    #[error("Parse error: '{key}' must occur {} times, but occurred {occurrences}.", bounds(.min, .max))]
    Occurrence {
        /// The constrained key.
        key: String,
        /// The minimum occurrences.
        min: usize,
        /// The maximum occurrences (`usize::MAX` is unbounded).
        max: usize,
        /// The actual occurrences.
        occurrences: usize,
    },
    /// A key occurred alongside a key it excludes.
    #[error("Parse error: '{key}' cannot be used with '{exclusive}'.")]
    MutuallyExclusive {
        /// The constrained key.
        key: String,
        /// The excluded key that occurred.
        exclusive: String,
    },
    /// A key occurred without a key it requires.
    #[error("Parse error: '{key}' must be used with '{inclusive}'.")]
    MutuallyInclusive {
        /// The constrained key.
        key: String,
        /// The required key that did not occur.
        inclusive: String,
    },
    /// A custom finalizer rejected the map.
    #[error("Parse error: '{key}' {message}.")]
    Constraint {
        /// The constrained key.
        key: String,
        /// Why the map was rejected.
        message: String,
    },
}

fn bounds(min: &usize, max: &usize) -> String {
    if min == max {
        format!("exactly {min}")
    } else if *max == usize::MAX {
        format!("at least {min}")
    } else {
        format!("between {min} and {max}")
    }
}

impl ParseError {
    /// The option or operand count, for structural errors.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::UnknownOption { position, .. }
            | ParseError::MissingArgument { position, .. }
            | ParseError::UnexpectedArgument { position, .. }
            | ParseError::UnexpectedOperand { position, .. }
            | ParseError::InvalidArgument { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// The argument count, for structural errors.
    pub fn argument(&self) -> Option<usize> {
        match self {
            ParseError::UnknownOption { argument, .. }
            | ParseError::MissingArgument { argument, .. }
            | ParseError::UnexpectedArgument { argument, .. }
            | ParseError::UnexpectedOperand { argument, .. }
            | ParseError::InvalidArgument { argument, .. } => Some(*argument),
            _ => None,
        }
    }

    /// The index of the input token, for structural errors.
    pub fn token(&self) -> Option<usize> {
        match self {
            ParseError::UnknownOption { token, .. }
            | ParseError::MissingArgument { token, .. }
            | ParseError::UnexpectedArgument { token, .. }
            | ParseError::UnexpectedOperand { token, .. }
            | ParseError::InvalidArgument { token, .. } => Some(*token),
            _ => None,
        }
    }

    /// A [`ParseError::InvalidArgument`] for a value conversion.
    ///
    /// `token` starts out as `argument`, and the engine sets the input token index as the error passes through.
    pub fn invalid_argument(
        position: usize,
        argument: usize,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ParseError::InvalidArgument {
            position,
            argument,
            token: argument,
            source: source.into(),
        }
    }

    fn relocate(mut self, index: usize) -> Self {
        match &mut self {
            ParseError::UnknownOption { token, .. }
            | ParseError::MissingArgument { token, .. }
            | ParseError::UnexpectedArgument { token, .. }
            | ParseError::UnexpectedOperand { token, .. }
            | ParseError::InvalidArgument { token, .. } => *token = index,
            _ => {}
        }

        self
    }

    /// The constrained key, for constraint errors.
    pub fn key(&self) -> Option<&str> {
        match self {
            ParseError::Occurrence { key, .. }
            | ParseError::MutuallyExclusive { key, .. }
            | ParseError::MutuallyInclusive { key, .. }
            | ParseError::Constraint { key, .. } => Some(key.as_str()),
            _ => None,
        }
    }

    /// Whether this error came from a finalizer, rather than from consuming tokens.
    pub fn is_constraint(&self) -> bool {
        self.key().is_some()
    }
}

enum Classification<'a, 'd> {
    Option {
        description: &'a OptionDescription<'d>,
        key: String,
        pack: OptionPack,
    },
    Unknown,
    Operand,
}

/// The parse state machine.
///
/// Pending tokens live on a stack of batches, each stored reversed so the next token is at the back.
/// The bottom batch holds the input tokens; packed arguments are pushed as new batches on top.
pub(crate) struct Parser<'a, 'd> {
    group: &'a [Description<'d>],
    end_of_options: &'a str,
    stack: Vec<Vec<String>>,
    map: VariableMap,
    argument: usize,
    option: usize,
    operand: usize,
    // The input token the current argument came from, and the count of input tokens taken.
    token: usize,
    inputs: usize,
    options_ended: bool,
}

impl<'a, 'd> std::fmt::Debug for Parser<'a, 'd> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser{..}").finish()
    }
}

impl<'a, 'd> Parser<'a, 'd> {
    pub(crate) fn new(
        group: &'a [Description<'d>],
        end_of_options: &'a str,
        tokens: Vec<String>,
        seed: &VariableMap,
    ) -> Self {
        let mut batch = tokens;
        batch.reverse();

        Self {
            group,
            end_of_options,
            stack: vec![batch],
            map: seed.clone(),
            argument: 0,
            option: 0,
            operand: 0,
            token: 0,
            inputs: 0,
            options_ended: false,
        }
    }

    pub(crate) fn consume(mut self) -> Result<VariableMap, ParseError> {
        while let Some(token) = self.next_token() {
            if self.options_ended {
                self.operand(token)?;
                continue;
            }

            // Packed arguments never end option processing, even when they look like the sentinel.
            if self.stack.len() == 1 && token == self.end_of_options {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!(
                        "End of options '{token}' at argument {argument}.",
                        argument = self.argument
                    );
                }

                self.options_ended = true;
                continue;
            }

            match self.classify(&token) {
                Classification::Option {
                    description,
                    key,
                    pack,
                } => self.option(description, key, pack)?,
                Classification::Unknown => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Token '{token}' unpacks, but no option accepts it.");
                    }

                    return Err(ParseError::UnknownOption {
                        position: self.option,
                        argument: self.argument,
                        token: self.token,
                    });
                }
                Classification::Operand => self.operand(token)?,
            }
        }

        Ok(self.map)
    }

    fn next_token(&mut self) -> Option<String> {
        loop {
            match self.pop() {
                Some(token) => return Some(token),
                None if self.stack.len() > 1 => {
                    self.stack.pop();
                }
                None => return None,
            }
        }
    }

    /// Take the next token of the active batch only.
    fn pop(&mut self) -> Option<String> {
        let input = self.stack.len() == 1;
        let token = self.stack.last_mut()?.pop()?;

        if input {
            self.token = self.inputs;
            self.inputs += 1;
        }

        Some(token)
    }

    fn classify(&self, token: &str) -> Classification<'a, 'd> {
        let group: &'a [Description<'d>] = self.group;
        let mut unpacked = false;

        for description in group.iter().filter_map(Description::as_option) {
            if let Some(pack) = description.unpack(token) {
                if pack.raw_key.is_empty() {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Token '{token}' unpacks to an empty key.");
                    }

                    unpacked = true;
                    continue;
                }

                match description.accepts(&pack.raw_key, self.option, self.argument, &self.map) {
                    Some(key) => {
                        #[cfg(feature = "tracing_debug")]
                        {
                            debug!("Token '{token}' is the option '{key}'.");
                        }

                        return Classification::Option {
                            description,
                            key,
                            pack,
                        };
                    }
                    None => unpacked = true,
                }
            }
        }

        if unpacked {
            Classification::Unknown
        } else {
            Classification::Operand
        }
    }

    fn option(
        &mut self,
        description: &'a OptionDescription<'d>,
        key: String,
        pack: OptionPack,
    ) -> Result<(), ParseError> {
        let OptionPack {
            value,
            packed_arguments,
            ..
        } = pack;

        let stored = match description.value() {
            OptionValue::Flag { implicit } => {
                if value.is_some() {
                    return Err(ParseError::UnexpectedArgument {
                        position: self.option,
                        argument: self.argument,
                        token: self.token,
                    });
                }

                match implicit {
                    Some(implicit) => implicit(&key, &self.map),
                    None => Value::Empty,
                }
            }
            OptionValue::Required(make_value) => self.option_value(&key, make_value, value, None)?,
            OptionValue::Optional {
                make_value,
                implicit,
            } => self.option_value(&key, make_value, value, Some(implicit))?,
        };

        self.map.insert(key, stored);

        if !packed_arguments.is_empty() {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Pushing packed arguments {packed_arguments:?}.");
            }

            let mut batch = packed_arguments;
            batch.reverse();
            self.stack.push(batch);
        }

        self.option += 1;
        self.argument += 1;
        Ok(())
    }

    fn option_value(
        &mut self,
        key: &str,
        make_value: &MakeValue<'d>,
        inline: Option<String>,
        implicit: Option<&MakeImplicit<'d>>,
    ) -> Result<Value, ParseError> {
        if let Some(raw) = inline {
            return make_value(key, self.option, self.argument, &raw, &self.map)
                .map_err(|error| error.relocate(self.token));
        }

        if let Some(implicit) = implicit {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Option '{key}' takes its implicit value.");
            }

            return Ok(implicit(key, &self.map));
        }

        let missing = ParseError::MissingArgument {
            position: self.option,
            argument: self.argument,
            token: self.token,
        };

        // Only the active batch may supply the value.
        let ambiguous = match self.stack.last().and_then(|batch| batch.last()) {
            Some(next) => self.is_option_shaped(next),
            None => return Err(missing),
        };

        if ambiguous {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Option '{key}' is followed by another option, not its value.");
            }

            return Err(missing);
        }

        // The value is converted against the option's argument, and counted after.
        // Any packed arguments still belong to the option's input token.
        let token = self.token;
        let raw = match self.pop() {
            Some(raw) => raw,
            None => return Err(missing),
        };
        self.token = token;
        let value = make_value(key, self.option, self.argument, &raw, &self.map)
            .map_err(|error| error.relocate(self.token))?;
        self.argument += 1;
        Ok(value)
    }

    fn is_option_shaped(&self, token: &str) -> bool {
        self.group
            .iter()
            .any(|description| description.unpack(token).is_some())
    }

    fn operand(&mut self, token: String) -> Result<(), ParseError> {
        let group: &'a [Description<'d>] = self.group;

        for description in group.iter().filter_map(Description::as_operand) {
            if let Some(key) = description.accepts(&token, self.operand, self.argument, &self.map)
            {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Token '{token}' is the operand '{key}'.");
                }

                let value = description
                    .make_value(&key, self.operand, self.argument, &token, &self.map)
                    .map_err(|error| error.relocate(self.token))?;
                self.map.insert(key, value);
                self.operand += 1;
                self.argument += 1;
                return Ok(());
            }
        }

        Err(ParseError::UnexpectedOperand {
            position: self.operand,
            argument: self.argument,
            token: self.token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{OperandDescription, OptionDescription};
    use crate::constant::DEFAULT_END_OF_OPTIONS;
    use crate::test::assert_contains;
    use crate::unpack::{Gnu, Posix};
    use rstest::rstest;
    use std::rc::Rc;

    fn run(group: &[Description], tokens: &[&str]) -> Result<VariableMap, ParseError> {
        let tokens = tokens.iter().map(|t| t.to_string()).collect();
        Parser::new(group, DEFAULT_END_OF_OPTIONS, tokens, &VariableMap::new()).consume()
    }

    fn raw_string<'d>() -> MakeValue<'d> {
        Rc::new(
            |_: &str, _: usize, _: usize, raw: &str, _: &VariableMap| -> Result<Value, ParseError> {
                Ok(Value::Str(raw.to_string()))
            },
        )
    }

    fn named(names: &'static [&'static str]) -> impl Fn(&str, usize, usize, &VariableMap) -> Option<String> {
        move |raw, _, _, _| names.contains(&raw).then(|| raw.to_string())
    }

    fn flags(names: &'static [&'static str]) -> Description<'static> {
        OptionDescription::new(Gnu::packed())
            .with_accepts(named(names))
            .into()
    }

    fn required(names: &'static [&'static str]) -> Description<'static> {
        OptionDescription::new(Gnu::unpacked())
            .with_accepts(named(names))
            .with_value(OptionValue::Required(raw_string()))
            .into()
    }

    fn files() -> Description<'static> {
        OperandDescription::new(|_, _, _, _| Some("file".to_string()))
            .with_value(|_, _, _, raw, _| Ok(Value::Str(raw.to_string())))
            .into()
    }

    fn entries(map: &VariableMap) -> Vec<(String, Value)> {
        map.iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn s(value: &str) -> Value {
        Value::Str(value.to_string())
    }

    #[test]
    fn empty_tokens() {
        // Setup
        let group = vec![flags(&["a"]), files()];
        let mut seed = VariableMap::new();
        seed.insert("a", Value::Empty);
        let tokens: &[&str] = &[];

        // Execute
        let map = Parser::new(&group, "--", Vec::default(), &seed)
            .consume()
            .unwrap();

        // Verify
        assert_eq!(map, seed);
        assert!(run(&group, tokens).unwrap().is_empty());
    }

    #[test]
    fn seed_not_mutated() {
        // Setup
        let group = vec![flags(&["a"])];
        let mut seed = VariableMap::new();
        seed.insert("a", Value::Empty);

        // Execute
        let map = Parser::new(&group, "--", vec!["-a".to_string()], &seed)
            .consume()
            .unwrap();

        // Verify
        assert_eq!(seed.count("a"), 1);
        assert_eq!(map.count("a"), 2);
    }

    #[rstest]
    #[case(vec!["-abc"])]
    #[case(vec!["-a", "-b", "-c"])]
    #[case(vec!["-ab", "-c"])]
    #[case(vec!["-a", "-bc"])]
    fn packed_flags(#[case] tokens: Vec<&str>) {
        // Setup
        let group = vec![flags(&["a", "b", "c"])];

        // Execute
        let map = run(&group, &tokens).unwrap();

        // Verify
        assert_eq!(
            entries(&map),
            vec![
                ("a".to_string(), Value::Empty),
                ("b".to_string(), Value::Empty),
                ("c".to_string(), Value::Empty),
            ]
        );
    }

    #[rstest]
    #[case(vec!["--foo=bar"])]
    #[case(vec!["--foo", "bar"])]
    fn inline_or_next(#[case] tokens: Vec<&str>) {
        // Setup
        let group = vec![required(&["foo"])];

        // Execute
        let map = run(&group, &tokens).unwrap();

        // Verify
        assert_eq!(entries(&map), vec![("foo".to_string(), s("bar"))]);
    }

    #[test]
    fn inline_empty_value() {
        let group = vec![required(&["foo"])];
        let map = run(&group, &["--foo="]).unwrap();
        assert_eq!(entries(&map), vec![("foo".to_string(), s(""))]);
    }

    #[test]
    fn posix_inline_value() {
        // Setup
        let group = vec![OptionDescription::new(Posix::unpacked())
            .with_accepts(named(&["o"]))
            .with_value(OptionValue::Required(raw_string()))
            .into()];

        // Execute
        let map = run(&group, &["-ofile", "-o", "other"]).unwrap();

        // Verify
        assert_eq!(
            entries(&map),
            vec![("o".to_string(), s("file")), ("o".to_string(), s("other"))]
        );
    }

    #[rstest]
    #[case(vec!["--foo", "--bar"], 0, 0)]
    #[case(vec!["--bar", "--foo", "--bar"], 1, 1)]
    #[case(vec!["--foo", "-x"], 0, 0)]
    #[case(vec!["--foo"], 0, 0)]
    #[case(vec!["x", "--foo"], 0, 1)]
    fn missing_argument(
        #[case] tokens: Vec<&str>,
        #[case] position: usize,
        #[case] argument: usize,
    ) {
        // Setup
        let group = vec![required(&["foo"]), flags(&["bar"]), files()];

        // Execute
        let result = run(&group, &tokens);

        // Verify
        assert_matches!(result, Err(ParseError::MissingArgument { position: p, argument: a, .. }) if p == position && a == argument);
    }

    #[test]
    fn missing_argument_packed_frame() {
        // Setup
        let group = vec![
            OptionDescription::new(Posix::packed())
                .with_accepts(named(&["a"]))
                .into(),
            OptionDescription::new(Posix::unpacked())
                .with_accepts(named(&["b"]))
                .with_value(OptionValue::Required(raw_string()))
                .into(),
            files(),
        ];

        // Execute
        let result = run(&group, &["-ab", "value"]);

        // Verify
        assert_matches!(
            result,
            Err(ParseError::MissingArgument {
                position: 1,
                argument: 1,
                token: 0
            })
        );
    }

    #[test]
    fn unexpected_argument() {
        let group = vec![flags(&["bar"])];
        assert_matches!(
            run(&group, &["--bar", "--bar=1"]),
            Err(ParseError::UnexpectedArgument {
                position: 1,
                argument: 1,
                token: 1
            })
        );
    }

    #[test]
    fn unknown_option() {
        // Setup
        let group = vec![flags(&["a"]), files()];

        // Execute
        let result = run(&group, &["x", "-a", "--b"]);

        // Verify
        assert_matches!(
            result,
            Err(ParseError::UnknownOption {
                position: 1,
                argument: 2,
                token: 2
            })
        );
    }

    #[test]
    fn unknown_option_later_acceptance() {
        // Setup
        let group = vec![flags(&["a"]), flags(&["b"])];

        // Execute
        let map = run(&group, &["--b"]).unwrap();

        // Verify
        assert_eq!(entries(&map), vec![("b".to_string(), Value::Empty)]);
    }

    #[test]
    fn unexpected_operand() {
        let group = vec![flags(&["a"])];
        assert_matches!(
            run(&group, &["-a", "x"]),
            Err(ParseError::UnexpectedOperand {
                position: 0,
                argument: 1,
                token: 1
            })
        );
    }

    #[test]
    fn end_of_options() {
        // Setup
        let group = vec![flags(&["a"]), files()];

        // Execute
        let map = run(&group, &["-a", "--", "-a", "--", "x"]).unwrap();

        // Verify
        assert_eq!(
            entries(&map),
            vec![
                ("a".to_string(), Value::Empty),
                ("file".to_string(), s("-a")),
                ("file".to_string(), s("--")),
                ("file".to_string(), s("x")),
            ]
        );
    }

    #[test]
    fn end_of_options_custom() {
        // Setup
        let group = vec![flags(&["a"]), files()];
        let tokens = vec!["::".to_string(), "-a".to_string()];

        // Execute
        let map = Parser::new(&group, "::", tokens, &VariableMap::new())
            .consume()
            .unwrap();

        // Verify
        assert_eq!(entries(&map), vec![("file".to_string(), s("-a"))]);
    }

    #[test]
    fn end_of_options_counters() {
        // Setup
        let group = vec![OperandDescription::new(|_, position, argument, _| {
            Some(format!("{position}:{argument}"))
        })
        .into()];

        // Execute
        let map = run(&group, &["a", "--", "b"]).unwrap();

        // Verify
        assert_eq!(map.keys(), vec!["0:0", "1:1"]);
    }

    #[test]
    fn embedded_end_of_options() {
        // Setup
        let group = vec![flags(&["a", "-"]), files()];

        // Execute
        let map = run(&group, &["-a--", "-a"]).unwrap();

        // Verify
        assert_eq!(
            entries(&map),
            vec![
                ("a".to_string(), Value::Empty),
                ("-".to_string(), Value::Empty),
                ("-".to_string(), Value::Empty),
                ("a".to_string(), Value::Empty),
            ]
        );
    }

    #[test]
    fn flag_implicit() {
        // Setup
        let group = vec![OptionDescription::new(Gnu::packed())
            .with_value(OptionValue::Flag {
                implicit: Some(Rc::new(|key: &str, map: &VariableMap| {
                    Value::UInt(map.count(key) as u64)
                })),
            })
            .into()];

        // Execute
        let map = run(&group, &["-v", "-vv"]).unwrap();

        // Verify
        assert_eq!(
            map.get_all("v"),
            vec![&Value::UInt(0), &Value::UInt(1), &Value::UInt(2)]
        );
    }

    #[rstest]
    #[case(vec!["--level"], Value::UInt(1))]
    #[case(vec!["--level=7"], s("7"))]
    #[case(vec!["--level="], s(""))]
    fn optional_value(#[case] tokens: Vec<&str>, #[case] expected: Value) {
        // Setup
        let group = vec![OptionDescription::new(Gnu::unpacked())
            .with_value(OptionValue::Optional {
                make_value: raw_string(),
                implicit: Rc::new(|_: &str, _: &VariableMap| Value::UInt(1)),
            })
            .into()];

        // Execute
        let map = run(&group, &tokens).unwrap();

        // Verify
        assert_eq!(map.get("level"), Some(&expected));
    }

    #[test]
    fn optional_value_never_takes_next() {
        // Setup
        let group = vec![
            OptionDescription::new(Gnu::unpacked())
                .with_value(OptionValue::Optional {
                    make_value: raw_string(),
                    implicit: Rc::new(|_: &str, _: &VariableMap| Value::Empty),
                })
                .into(),
            files(),
        ];

        // Execute
        let map = run(&group, &["--level", "x"]).unwrap();

        // Verify
        assert_eq!(
            entries(&map),
            vec![("level".to_string(), Value::Empty), ("file".to_string(), s("x"))]
        );
    }

    #[test]
    fn value_positions() {
        // Setup
        let group = vec![
            OptionDescription::new(Gnu::unpacked())
                .with_value(OptionValue::Required(Rc::new(
                    |_: &str,
                     position: usize,
                     argument: usize,
                     _: &str,
                     _: &VariableMap|
                     -> Result<Value, ParseError> {
                        Ok(Value::Str(format!("{position}:{argument}")))
                    },
                )))
                .into(),
            OperandDescription::new(|_, _, _, _| Some("file".to_string()))
                .with_value(|_, position, argument, _, _| {
                    Ok(Value::Str(format!("{position}:{argument}")))
                })
                .into(),
        ];

        // Execute
        let map = run(&group, &["--a=1", "x", "--b", "2", "y", "--c", "3"]).unwrap();

        // Verify
        assert_eq!(
            entries(&map),
            vec![
                ("a".to_string(), s("0:0")),
                ("file".to_string(), s("0:1")),
                ("b".to_string(), s("1:2")),
                ("file".to_string(), s("1:4")),
                ("c".to_string(), s("2:5")),
            ]
        );
    }

    #[test]
    fn operand_order() {
        // Setup
        let group = vec![
            OperandDescription::new(|_, position, _, _| (position == 0).then(|| "first".to_string()))
                .into(),
            OperandDescription::new(|_, _, _, _| Some("rest".to_string())).into(),
        ];

        // Execute
        let map = run(&group, &["a", "b", "c"]).unwrap();

        // Verify
        assert_eq!(map.keys(), vec!["first", "rest"]);
        assert_eq!(map.count("rest"), 2);
    }

    #[test]
    fn operand_value_error() {
        // Setup
        let group = vec![OperandDescription::new(|_, _, _, _| Some("n".to_string()))
            .with_value(|_, position, argument, raw, _| {
                raw.parse::<u32>()
                    .map(|n| Value::UInt(n as u64))
                    .map_err(|e| ParseError::invalid_argument(position, argument, e))
            })
            .into()];

        // Execute
        let result = run(&group, &["1", "x"]);

        // Verify
        let error = result.unwrap_err();
        assert_matches!(
            error,
            ParseError::InvalidArgument {
                position: 1,
                argument: 1,
                token: 1,
                ..
            }
        );
        assert_contains!(error.to_string(), "invalid digit");
    }

    #[test]
    fn next_value_error_at_option() {
        // Setup
        let group = vec![OptionDescription::new(Gnu::unpacked())
            .with_value(OptionValue::Required(Rc::new(
                |_: &str,
                 position: usize,
                 argument: usize,
                 raw: &str,
                 _: &VariableMap|
                 -> Result<Value, ParseError> {
                    raw.parse::<u32>()
                        .map(|n| Value::UInt(n as u64))
                        .map_err(|e| ParseError::invalid_argument(position, argument, e))
                },
            )))
            .into()];

        // Execute
        let result = run(&group, &["--level", "x"]);

        // Verify
        assert_matches!(
            result,
            Err(ParseError::InvalidArgument {
                position: 0,
                argument: 0,
                token: 0,
                ..
            })
        );
    }

    #[rstest]
    #[case(vec!["-ab", "x", "-z", "y"], 2, 3, 2)]
    #[case(vec!["-abz"], 2, 2, 0)]
    #[case(vec!["x", "-ba", "-az"], 3, 4, 2)]
    fn unknown_option_after_packed(
        #[case] tokens: Vec<&str>,
        #[case] position: usize,
        #[case] argument: usize,
        #[case] token: usize,
    ) {
        // Setup
        let group = vec![flags(&["a", "b"]), files()];

        // Execute
        let result = run(&group, &tokens);

        // Verify
        assert_matches!(
            result,
            Err(ParseError::UnknownOption { position: p, argument: a, token: t })
                if p == position && a == argument && t == token
        );
    }

    #[test]
    fn packed_after_next_value() {
        // Setup
        let group = vec![
            OptionDescription::new(Posix::packed())
                .with_accepts(named(&["a"]))
                .with_value(OptionValue::Required(raw_string()))
                .into(),
            flags(&["b"]),
        ];

        // Execute
        let result = run(&group, &["-abz", "value"]);

        // Verify
        assert_matches!(
            result,
            Err(ParseError::UnknownOption {
                position: 2,
                argument: 3,
                token: 0
            })
        );
    }

    #[test]
    fn operand_token_after_packed() {
        // Setup
        let group = vec![flags(&["a", "b"])];

        // Execute
        let result = run(&group, &["-ab", "-ba", "x"]);

        // Verify
        assert_matches!(
            result,
            Err(ParseError::UnexpectedOperand {
                position: 0,
                argument: 4,
                token: 2
            })
        );
    }

    #[rstest]
    #[case(vec!["+"])]
    #[case(vec!["x", "+", "y"])]
    fn empty_raw_key_is_unknown(#[case] tokens: Vec<&str>) {
        // Setup
        let group = vec![
            OptionDescription::new(|token: &str| {
                token
                    .strip_prefix('+')
                    .map(|rest| OptionPack::new("+", rest))
            })
            .into(),
            files(),
        ];

        // Execute
        let result = run(&group, &tokens);

        // Verify
        assert_matches!(result, Err(ParseError::UnknownOption { .. }));
        assert_eq!(run(&group, &["+a"]).unwrap().keys(), vec!["a"]);
    }

    #[test]
    fn accessors() {
        let error = ParseError::MissingArgument {
            position: 2,
            argument: 5,
            token: 3,
        };
        assert_eq!(error.position(), Some(2));
        assert_eq!(error.argument(), Some(5));
        assert_eq!(error.token(), Some(3));
        assert_eq!(error.key(), None);
        assert!(!error.is_constraint());

        let error = ParseError::MutuallyExclusive {
            key: "a".to_string(),
            exclusive: "b".to_string(),
        };
        assert_eq!(error.position(), None);
        assert_eq!(error.token(), None);
        assert_eq!(error.key(), Some("a"));
        assert!(error.is_constraint());
    }

    #[rstest]
    #[case(1, 1, "exactly 1")]
    #[case(2, usize::MAX, "at least 2")]
    #[case(0, 3, "between 0 and 3")]
    fn occurrence_message(#[case] min: usize, #[case] max: usize, #[case] expected: &str) {
        let error = ParseError::Occurrence {
            key: "a".to_string(),
            min,
            max,
            occurrences: 0,
        };
        assert_contains!(error.to_string(), expected);
    }
}
