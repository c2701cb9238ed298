use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use crate::api::capture::*;
use crate::api::description::{HelpText, MakeImplicit, MakeValue};
use crate::constant::DEFAULT_VALUE_DESCRIPTION;
use crate::model::Value;
use crate::parser::{ParseError, VariableMap};
use crate::prelude::ValueType;

/// The typed value of an option or operand.
///
/// Raw values are converted via [`std::str::FromStr`] and stored in the [`VariableMap`] via [`ValueType`].
/// Every stored value may also be written into a bound program variable and/or handed to a callback.
///
/// ### Example
/// ```
/// # use cmdopts_builder as cmdopts;
/// use cmdopts::{make_option, parse_arguments, Constraint, OptionSpec, ValueSpec};
///
/// let mut level: u32 = 0;
/// let group = vec![make_option(
///     OptionSpec::long("level"),
///     ValueSpec::new()
///         .bind(&mut level)
///         .validate(|level: &u32| if *level <= 5 { Ok(()) } else { Err("must be at most 5".to_string()) }),
///     Constraint::new(),
/// )
/// .unwrap()];
///
/// parse_arguments(["--level=3"], &group).unwrap();
/// assert!(parse_arguments(["--level=7"], &group).is_err());
/// drop(group);
///
/// assert_eq!(level, 3);
/// ```
pub struct ValueSpec<'d, T> {
    variable: Option<&'d mut T>,
    implicit: Option<T>,
    description: String,
    implicit_description: Option<String>,
    transform: Option<Box<dyn Fn(&str) -> String + 'd>>,
    validate: Option<Box<dyn Fn(&T) -> Result<(), String> + 'd>>,
    callback: Option<Box<dyn Fn(&T) + 'd>>,
}

impl<'d, T> Default for ValueSpec<'d, T> {
    fn default() -> Self {
        Self {
            variable: None,
            implicit: None,
            description: DEFAULT_VALUE_DESCRIPTION.to_string(),
            implicit_description: None,
            transform: None,
            validate: None,
            callback: None,
        }
    }
}

impl<'d, T> ValueSpec<'d, T> {
    /// Create a value specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write every stored value into `variable`.
    pub fn bind(mut self, variable: &'d mut T) -> Self {
        self.variable.replace(variable);
        self
    }

    /// Call `callback` with every stored value.
    pub fn callback(mut self, callback: impl Fn(&T) + 'd) -> Self {
        self.callback.replace(Box::new(callback));
        self
    }

    /// Rewrite the raw value before it is converted.
    pub fn transform(mut self, transform: impl Fn(&str) -> String + 'd) -> Self {
        self.transform.replace(Box::new(transform));
        self
    }

    /// Reject converted values, with a message.
    pub fn validate(mut self, validate: impl Fn(&T) -> Result<(), String> + 'd) -> Self {
        self.validate.replace(Box::new(validate));
        self
    }

    /// Document the value (default `arg`).
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether an implicit value is set.
    pub fn has_implicit(&self) -> bool {
        self.implicit.is_some()
    }
}

impl<'d, T> ValueSpec<'d, T>
where
    T: std::fmt::Display,
{
    /// Set the implicit value.
    ///
    /// For an option, this makes the value optional: the implicit value is stored when none is given inline.
    /// For an operand, the token is ignored and the implicit value is stored instead.
    pub fn implicit(mut self, value: T) -> Self {
        self.implicit_description.replace(value.to_string());
        self.implicit.replace(value);
        self
    }
}

pub(crate) struct ValueParts<'d> {
    pub(crate) make_value: MakeValue<'d>,
    pub(crate) implicit: Option<MakeImplicit<'d>>,
    pub(crate) help: HelpText,
}

impl<'d, T> ValueSpec<'d, T>
where
    T: FromStr + ValueType + Clone + 'd,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    pub(crate) fn into_parts(self) -> ValueParts<'d> {
        let ValueSpec {
            variable,
            implicit,
            description,
            implicit_description,
            transform,
            validate,
            callback,
        } = self;
        let capture = Rc::new(Capture {
            variable: variable.map(RefCell::new),
            transform,
            validate,
            callback,
        });

        let convert = Rc::clone(&capture);
        let make_value: MakeValue<'d> = Rc::new(
            move |_key: &str,
                  position: usize,
                  argument: usize,
                  raw: &str,
                  _map: &VariableMap|
                  -> Result<Value, ParseError> {
                convert
                    .convert(raw)
                    .map_err(|error| ParseError::invalid_argument(position, argument, error))
            },
        );

        let implicit = implicit.map(|value| {
            let store = Rc::clone(&capture);
            let generate: MakeImplicit<'d> =
                Rc::new(move |_key: &str, _map: &VariableMap| store.store(value.clone()));
            generate
        });

        let mut help = HelpText::new().value(description);

        if let Some(implicit_description) = implicit_description {
            help = help.implicit(implicit_description);
        }

        ValueParts {
            make_value,
            implicit,
            help,
        }
    }
}

struct Capture<'d, T> {
    variable: Option<RefCell<&'d mut T>>,
    transform: Option<Box<dyn Fn(&str) -> String + 'd>>,
    validate: Option<Box<dyn Fn(&T) -> Result<(), String> + 'd>>,
    callback: Option<Box<dyn Fn(&T) + 'd>>,
}

impl<'d, T> Capture<'d, T>
where
    T: FromStr + ValueType + Clone,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    fn convert(&self, raw: &str) -> Result<Value, InvalidCapture> {
        let token = match &self.transform {
            Some(transform) => transform(raw),
            None => raw.to_string(),
        };
        let value = T::from_str(&token).map_err(|error| InvalidCapture::InvalidConversion {
            token: token.clone(),
            type_name: std::any::type_name::<T>(),
            cause: Box::new(error),
        })?;

        if let Some(validate) = &self.validate {
            validate(&value).map_err(|message| InvalidCapture::Rejected { token, message })?;
        }

        Ok(self.store(value))
    }

    fn store(&self, value: T) -> Value {
        if let Some(callback) = &self.callback {
            callback(&value);
        }

        if let Some(variable) = &self.variable {
            **variable.borrow_mut() = value.clone();
        }

        value.into_value()
    }
}
