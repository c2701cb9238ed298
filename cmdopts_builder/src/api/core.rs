use std::str::FromStr;

use crate::api::{
    Constraint, Description, HelpText, OperandDescription, OptionDescription, OptionValue,
    ValueSpec,
};
use crate::parser::{ConfigError, VariableMap};
use crate::prelude::ValueType;
use crate::unpack::{Gnu, Posix};

/// The names of an option.
///
/// An option with a long name (and optionally a short name) uses [`Gnu`] syntax,
/// while an option with only a short name uses [`Posix`] syntax.
/// The stored key is the explicit [`OptionSpec::key`], else the long name, else the short name.
///
/// An option without a help message is hidden: it has no key description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSpec {
    long: Option<String>,
    short: Option<char>,
    key: Option<String>,
    help: Option<String>,
}

impl OptionSpec {
    /// An option with the long name `--name`.
    pub fn long(name: impl Into<String>) -> Self {
        Self::default().with_long(name)
    }

    /// An option with the short name `-name`.
    pub fn short(name: char) -> Self {
        Self::default().with_short(name)
    }

    /// An option that accepts every key.
    /// Without an explicit [`OptionSpec::key`], each occurrence is stored under its raw key.
    pub fn any() -> Self {
        Self::default()
    }

    /// Add the long name `--name`.
    pub fn with_long(mut self, name: impl Into<String>) -> Self {
        self.long.replace(name.into());
        self
    }

    /// Add the short name `-name`.
    pub fn with_short(mut self, name: char) -> Self {
        self.short.replace(name);
        self
    }

    /// Store under `key` rather than the option's name.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key.replace(key.into());
        self
    }

    /// Document the option.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(long) = &self.long {
            if long.is_empty()
                || long.starts_with('-')
                || long.contains('=')
                || !long.chars().all(|c| c.is_ascii_graphic())
            {
                return Err(ConfigError::InvalidLongName(long.clone()));
            }
        }

        if let Some(short) = self.short {
            if short == '-' || short == '=' || !short.is_ascii_graphic() {
                return Err(ConfigError::InvalidShortName(short));
            }
        }

        Ok(())
    }

    fn stored_key(&self) -> Option<String> {
        self.key
            .clone()
            .or_else(|| self.long.clone())
            .or_else(|| self.short.map(String::from))
    }

    fn key_description(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), Some(short)) => format!("--{long}, -{short}"),
            (Some(long), None) => format!("--{long}"),
            (None, Some(short)) => format!("-{short}"),
            (None, None) => "--*, -*".to_string(),
        }
    }

    fn help_text(&self) -> HelpText {
        match &self.help {
            Some(help) => HelpText::new()
                .key(self.key_description())
                .extended(help.clone()),
            None => HelpText::new(),
        }
    }

    fn describe<'d>(&self, packed_flags: bool) -> OptionDescription<'d> {
        let description = match (&self.long, self.short) {
            (None, Some(_)) => OptionDescription::new(Posix::new(packed_flags)),
            _ => OptionDescription::new(Gnu::new(packed_flags)),
        };

        match (self.long.clone(), self.short, self.stored_key()) {
            (None, None, None) => description,
            (None, None, Some(key)) => description.with_accepts(move |_, _, _, _| Some(key.clone())),
            (long, short, key) => {
                let key = key.unwrap_or_default();
                description.with_accepts(move |raw, _, _, _| {
                    let matched = long.as_deref() == Some(raw) || is_short(short, raw);
                    matched.then(|| key.clone())
                })
            }
        }
    }

    fn finalize<'d>(
        &self,
        description: OptionDescription<'d>,
        constraint: Constraint,
    ) -> Result<OptionDescription<'d>, ConfigError> {
        constraint.validate()?;

        if constraint.is_pinned() {
            return Err(ConfigError::PinnedOption(self.key_description()));
        }

        match self.stored_key() {
            Some(key) => Ok(description.with_finalize(move |map| constraint.check(&key, map))),
            None if constraint.is_unconstrained() => Ok(description),
            None => Err(ConfigError::UnkeyedConstraint),
        }
    }
}

fn is_short(short: Option<char>, raw: &str) -> bool {
    match short {
        Some(short) => {
            let mut chars = raw.chars();
            chars.next() == Some(short) && chars.next().is_none()
        }
        None => false,
    }
}

/// Describe an option that takes no value, storing [`Value::Empty`](crate::Value::Empty).
///
/// Flags allow packing: `-abc` is the same as `-a -b -c`.
pub fn make_flag<'d>(spec: OptionSpec, constraint: Constraint) -> Result<Description<'d>, ConfigError> {
    spec.validate()?;
    let description = spec.describe(true).with_help(spec.help_text());
    Ok(spec.finalize(description, constraint)?.into())
}

/// Describe an option that takes no value, storing the implicit value of `value`.
///
/// ### Example
/// ```
/// # use cmdopts_builder as cmdopts;
/// use cmdopts::{make_switch, parse_arguments, Constraint, OptionSpec, ValueSpec};
///
/// let mut verbose = false;
/// let group = vec![make_switch(
///     OptionSpec::long("verbose").with_short('v'),
///     ValueSpec::new().bind(&mut verbose).implicit(true),
///     Constraint::new(),
/// )
/// .unwrap()];
///
/// let map = parse_arguments(["-v"], &group).unwrap();
/// assert_eq!(map.value_of::<bool>("verbose").unwrap(), true);
/// drop(group);
///
/// assert!(verbose);
/// ```
pub fn make_switch<'d, T>(
    spec: OptionSpec,
    value: ValueSpec<'d, T>,
    constraint: Constraint,
) -> Result<Description<'d>, ConfigError>
where
    T: FromStr + ValueType + Clone + 'd,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    spec.validate()?;

    if !value.has_implicit() {
        return Err(ConfigError::MissingImplicit(spec.key_description()));
    }

    let parts = value.into_parts();
    let help = merge(spec.help_text(), parts.help);
    let description = spec
        .describe(true)
        .with_value(OptionValue::Flag {
            implicit: parts.implicit,
        })
        .with_help(help);
    Ok(spec.finalize(description, constraint)?.into())
}

/// Describe an option that takes a value.
///
/// Without an implicit value, the value is required: either inline (`--level=3`, `-l3`) or as the next token (`--level 3`).
/// The next token is never taken when any option in the group would unpack it.
///
/// With an implicit value, the value is optional: it must be inline, or else the implicit value is stored.
pub fn make_option<'d, T>(
    spec: OptionSpec,
    value: ValueSpec<'d, T>,
    constraint: Constraint,
) -> Result<Description<'d>, ConfigError>
where
    T: FromStr + ValueType + Clone + 'd,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    spec.validate()?;
    let parts = value.into_parts();
    let option_value = match parts.implicit {
        Some(implicit) => OptionValue::Optional {
            make_value: parts.make_value,
            implicit,
        },
        None => OptionValue::Required(parts.make_value),
    };
    let help = merge(spec.help_text(), parts.help);
    let description = spec.describe(false).with_value(option_value).with_help(help);
    Ok(spec.finalize(description, constraint)?.into())
}

/// Describe an operand, stored under `key`.
///
/// Without pins, the operand accepts every operand token that reaches it.
/// With an implicit value, the token is ignored and the implicit value is stored instead.
pub fn make_operand<'d, T>(
    key: impl Into<String>,
    value: ValueSpec<'d, T>,
    constraint: Constraint,
) -> Result<Description<'d>, ConfigError>
where
    T: FromStr + ValueType + Clone + 'd,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let key = key.into();
    let parts = value.into_parts();
    let description = operand(&key, &constraint)?.with_help(parts.help.key(key.clone()));

    let description = match parts.implicit {
        Some(implicit) => description.with_value(move |key, _, _, _, map| Ok(implicit(key, map))),
        None => {
            let make_value = parts.make_value;
            description.with_value(move |key, position, argument, token, map| {
                make_value(key, position, argument, token, map)
            })
        }
    };

    Ok(finalize_operand(description, key, constraint).into())
}

/// Describe an operand that stores [`Value::Empty`](crate::Value::Empty), under `key`.
pub fn make_bare_operand<'d>(
    key: impl Into<String>,
    constraint: Constraint,
) -> Result<Description<'d>, ConfigError> {
    let key = key.into();
    let description = operand(&key, &constraint)?.with_help(HelpText::new().key(key.clone()));
    Ok(finalize_operand(description, key, constraint).into())
}

/// Describe an option that rejects every key.
///
/// Placed last in a group, this turns every option shaped token that no other option accepts into an
/// [`UnknownOption`](crate::ParseError::UnknownOption) error.
/// This is useful for operand-only programs, where it would otherwise be an
/// [`UnexpectedOperand`](crate::ParseError::UnexpectedOperand).
pub fn make_options_error<'d>() -> Description<'d> {
    OptionDescription::new(Gnu::unpacked())
        .with_accepts(|_, _, _, _| None)
        .into()
}

fn operand<'d>(key: &str, constraint: &Constraint) -> Result<OperandDescription<'d>, ConfigError> {
    if key.is_empty() {
        return Err(ConfigError::EmptyKey);
    }

    constraint.validate()?;
    let mapped = key.to_string();
    let pins = constraint.clone();
    Ok(OperandDescription::new(
        move |_, position, argument, _: &VariableMap| pins.pins(position, argument).then(|| mapped.clone()),
    ))
}

fn finalize_operand<'d>(
    description: OperandDescription<'d>,
    key: String,
    constraint: Constraint,
) -> OperandDescription<'d> {
    description.with_finalize(move |map| constraint.check(&key, map))
}

fn merge(names: HelpText, value: HelpText) -> HelpText {
    let mut help = HelpText::new();

    if let Some(key) = names.key_description() {
        help = help.key(key);
    }

    if let Some(extended) = names.extended_description() {
        help = help.extended(extended);
    }

    if let Some(description) = value.value_description() {
        help = help.value(description);
    }

    if let Some(implicit) = value.implicit_value_description() {
        help = help.implicit(implicit);
    }

    help
}
