/// A token decomposed by an [`Unpack`](crate::Unpack) dialect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionPack {
    /// The dialect prefix that matched (ex: `-` or `--`).
    pub prefix: String,
    /// The key as written on the command line, without its prefix.
    pub raw_key: String,
    /// The inline value.
    /// `Some("")` (ex: `--key=`) is distinct from `None` (ex: `--key`).
    pub value: Option<String>,
    /// Synthetic tokens to process before the rest of the current batch (ex: `-abc` packs `-b` and `-c`).
    pub packed_arguments: Vec<String>,
}

impl OptionPack {
    /// Create a pack with no value and no packed arguments.
    pub fn new(prefix: impl Into<String>, raw_key: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            raw_key: raw_key.into(),
            value: None,
            packed_arguments: Vec::default(),
        }
    }

    /// Set the inline value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value.replace(value.into());
        self
    }

    /// Set the packed arguments.
    pub fn with_packed(mut self, packed_arguments: Vec<String>) -> Self {
        self.packed_arguments = packed_arguments;
        self
    }
}
