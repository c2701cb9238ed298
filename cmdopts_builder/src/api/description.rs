use std::rc::Rc;

use crate::model::Value;
use crate::parser::{ParseError, VariableMap};
use crate::unpack::{OptionPack, Unpack};

/// Map a raw key to its stored key: `(raw_key, position, argument, map) -> Option<stored_key>`.
///
/// `position` is the running option count for options, and the running operand count for operands.
/// `argument` is the running count of consumed tokens.
pub type KeyMapper<'d> = Rc<dyn Fn(&str, usize, usize, &VariableMap) -> Option<String> + 'd>;

/// Convert a raw value: `(stored_key, position, argument, raw_value, map) -> Value`.
pub type MakeValue<'d> =
    Rc<dyn Fn(&str, usize, usize, &str, &VariableMap) -> Result<Value, ParseError> + 'd>;

/// Generate the value for an option given without one: `(stored_key, map) -> Value`.
pub type MakeImplicit<'d> = Rc<dyn Fn(&str, &VariableMap) -> Value + 'd>;

/// Check the final map after a full parse.
pub type Finalize<'d> = Rc<dyn Fn(&VariableMap) -> Result<(), ParseError> + 'd>;

/// The value shape of an option.
#[derive(Clone)]
pub enum OptionValue<'d> {
    /// Takes no value.
    /// An inline value is an error.
    /// Stores the implicit value when present, otherwise [`Value::Empty`].
    Flag {
        /// The generator for the stored value.
        implicit: Option<MakeImplicit<'d>>,
    },
    /// Takes a value, either inline or from the next token.
    Required(MakeValue<'d>),
    /// Takes an inline value, falling back to the implicit value otherwise.
    /// Never consumes the next token.
    Optional {
        /// The conversion for an inline value.
        make_value: MakeValue<'d>,
        /// The generator for a value when none is given inline.
        implicit: MakeImplicit<'d>,
    },
}

impl<'d> OptionValue<'d> {
    fn shape(&self) -> &'static str {
        match self {
            OptionValue::Flag { .. } => "Flag",
            OptionValue::Required(_) => "Required",
            OptionValue::Optional { .. } => "Optional",
        }
    }
}

impl<'d> std::fmt::Debug for OptionValue<'d> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{{..}}", self.shape())
    }
}

/// The help metadata of a description.
///
/// Parsing never reads these; they are kept for usage/help formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpText {
    key: Option<String>,
    value: Option<String>,
    implicit: Option<String>,
    extended: Option<String>,
}

impl HelpText {
    /// Create empty help metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key description (ex: `--level, -l`).
    pub fn key(mut self, description: impl Into<String>) -> Self {
        self.key.replace(description.into());
        self
    }

    /// Set the value description (ex: `arg`).
    pub fn value(mut self, description: impl Into<String>) -> Self {
        self.value.replace(description.into());
        self
    }

    /// Set the implicit value description.
    pub fn implicit(mut self, description: impl Into<String>) -> Self {
        self.implicit.replace(description.into());
        self
    }

    /// Set the extended description.
    pub fn extended(mut self, description: impl Into<String>) -> Self {
        self.extended.replace(description.into());
        self
    }

    /// The key description.
    pub fn key_description(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The value description.
    pub fn value_description(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The implicit value description.
    pub fn implicit_value_description(&self) -> Option<&str> {
        self.implicit.as_deref()
    }

    /// The extended description.
    pub fn extended_description(&self) -> Option<&str> {
        self.extended.as_deref()
    }
}

/// The description of an option: a token that unpacks with the description's dialect.
#[derive(Clone)]
pub struct OptionDescription<'d> {
    unpack: Rc<dyn Unpack + 'd>,
    accepts: Option<KeyMapper<'d>>,
    value: OptionValue<'d>,
    finalize: Option<Finalize<'d>>,
    help: HelpText,
}

impl<'d> std::fmt::Debug for OptionDescription<'d> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionDescription")
            .field("accepts", &self.accepts.is_some())
            .field("value", &self.value)
            .field("finalize", &self.finalize.is_some())
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}

impl<'d> OptionDescription<'d> {
    /// Create an option description.
    /// By default it accepts every raw key that `unpack` produces (stored as the raw key), and takes no value.
    pub fn new(unpack: impl Unpack + 'd) -> Self {
        Self {
            unpack: Rc::new(unpack),
            accepts: None,
            value: OptionValue::Flag { implicit: None },
            finalize: None,
            help: HelpText::default(),
        }
    }

    /// Set the key mapper.
    pub fn with_accepts(
        mut self,
        accepts: impl Fn(&str, usize, usize, &VariableMap) -> Option<String> + 'd,
    ) -> Self {
        self.accepts.replace(Rc::new(accepts));
        self
    }

    /// Set the value shape.
    pub fn with_value(mut self, value: OptionValue<'d>) -> Self {
        self.value = value;
        self
    }

    /// Set the finalizer.
    pub fn with_finalize(
        mut self,
        finalize: impl Fn(&VariableMap) -> Result<(), ParseError> + 'd,
    ) -> Self {
        self.finalize.replace(Rc::new(finalize));
        self
    }

    /// Set the help metadata.
    pub fn with_help(mut self, help: HelpText) -> Self {
        self.help = help;
        self
    }

    /// Decompose `token` with this option's dialect.
    pub fn unpack(&self, token: &str) -> Option<OptionPack> {
        self.unpack.unpack(token)
    }

    /// Map `raw_key` to its stored key, or `None` if this option does not handle it.
    pub fn accepts(
        &self,
        raw_key: &str,
        position: usize,
        argument: usize,
        map: &VariableMap,
    ) -> Option<String> {
        match &self.accepts {
            Some(accepts) => accepts(raw_key, position, argument, map),
            None => Some(raw_key.to_string()),
        }
    }

    /// The value shape.
    pub fn value(&self) -> &OptionValue<'d> {
        &self.value
    }

    /// The help metadata.
    pub fn help(&self) -> &HelpText {
        &self.help
    }
}

/// The description of an operand: a token that no option dialect unpacks.
#[derive(Clone)]
pub struct OperandDescription<'d> {
    accepts: KeyMapper<'d>,
    make_value: Option<MakeValue<'d>>,
    finalize: Option<Finalize<'d>>,
    help: HelpText,
}

impl<'d> std::fmt::Debug for OperandDescription<'d> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperandDescription")
            .field("make_value", &self.make_value.is_some())
            .field("finalize", &self.finalize.is_some())
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}

impl<'d> OperandDescription<'d> {
    /// Create an operand description.
    /// The key mapper receives the operand token as its raw key.
    /// By default the operand stores [`Value::Empty`].
    pub fn new(accepts: impl Fn(&str, usize, usize, &VariableMap) -> Option<String> + 'd) -> Self {
        Self {
            accepts: Rc::new(accepts),
            make_value: None,
            finalize: None,
            help: HelpText::default(),
        }
    }

    /// Set the value conversion.
    pub fn with_value(
        mut self,
        make_value: impl Fn(&str, usize, usize, &str, &VariableMap) -> Result<Value, ParseError> + 'd,
    ) -> Self {
        self.make_value.replace(Rc::new(make_value));
        self
    }

    /// Set the finalizer.
    pub fn with_finalize(
        mut self,
        finalize: impl Fn(&VariableMap) -> Result<(), ParseError> + 'd,
    ) -> Self {
        self.finalize.replace(Rc::new(finalize));
        self
    }

    /// Set the help metadata.
    pub fn with_help(mut self, help: HelpText) -> Self {
        self.help = help;
        self
    }

    /// Map the operand `token` to its stored key, or `None` if this operand does not handle it.
    pub fn accepts(
        &self,
        token: &str,
        position: usize,
        argument: usize,
        map: &VariableMap,
    ) -> Option<String> {
        (self.accepts)(token, position, argument, map)
    }

    /// Convert the operand `token` for the stored `key`.
    pub fn make_value(
        &self,
        key: &str,
        position: usize,
        argument: usize,
        token: &str,
        map: &VariableMap,
    ) -> Result<Value, ParseError> {
        match &self.make_value {
            Some(make_value) => make_value(key, position, argument, token, map),
            None => Ok(Value::Empty),
        }
    }

    /// The help metadata.
    pub fn help(&self) -> &HelpText {
        &self.help
    }
}

/// A single entry of a description group: either an option or an operand.
///
/// The group is an ordered slice, and order matters: the first option whose dialect unpacks a token
/// and whose key mapper accepts it wins, and likewise for operands.
#[derive(Debug, Clone)]
pub enum Description<'d> {
    /// An option description.
    Opt(OptionDescription<'d>),
    /// An operand description.
    Operand(OperandDescription<'d>),
}

impl<'d> From<OptionDescription<'d>> for Description<'d> {
    fn from(description: OptionDescription<'d>) -> Self {
        Description::Opt(description)
    }
}

impl<'d> From<OperandDescription<'d>> for Description<'d> {
    fn from(description: OperandDescription<'d>) -> Self {
        Description::Operand(description)
    }
}

impl<'d> Description<'d> {
    /// The option description, if this is one.
    pub fn as_option(&self) -> Option<&OptionDescription<'d>> {
        match self {
            Description::Opt(description) => Some(description),
            Description::Operand(_) => None,
        }
    }

    /// The operand description, if this is one.
    pub fn as_operand(&self) -> Option<&OperandDescription<'d>> {
        match self {
            Description::Opt(_) => None,
            Description::Operand(description) => Some(description),
        }
    }

    /// Decompose `token` with this description's dialect.
    /// Operands never unpack.
    pub fn unpack(&self, token: &str) -> Option<OptionPack> {
        self.as_option()
            .and_then(|description| description.unpack(token))
    }

    /// Run the finalizer against the final map, if there is one.
    pub fn finalize(&self, map: &VariableMap) -> Result<(), ParseError> {
        let finalize = match self {
            Description::Opt(description) => &description.finalize,
            Description::Operand(description) => &description.finalize,
        };

        match finalize {
            Some(finalize) => finalize(map),
            None => Ok(()),
        }
    }

    /// The help metadata.
    pub fn help(&self) -> &HelpText {
        match self {
            Description::Opt(description) => description.help(),
            Description::Operand(description) => description.help(),
        }
    }

    /// The key description, if documented.
    pub fn key_description(&self) -> Option<&str> {
        self.help().key_description()
    }

    /// The value description, if documented.
    pub fn value_description(&self) -> Option<&str> {
        self.help().value_description()
    }

    /// The implicit value description, if documented.
    pub fn implicit_value_description(&self) -> Option<&str> {
        self.help().implicit_value_description()
    }

    /// The extended description, if documented.
    pub fn extended_description(&self) -> Option<&str> {
        self.help().extended_description()
    }
}
