use crate::constant::*;
use crate::unpack::OptionPack;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Behaviour to decompose a single raw token into an [`OptionPack`].
///
/// Unpacking only judges the syntactic shape of a token.
/// Whether the key is actually recognized is decided later, by the description's key mapper.
/// Any `Fn(&str) -> Option<OptionPack>` is also an `Unpack`, which allows for custom dialects.
pub trait Unpack {
    /// Decompose `token`, or `None` when it does not have the shape of an option.
    fn unpack(&self, token: &str) -> Option<OptionPack>;
}

impl<F> Unpack for F
where
    F: Fn(&str) -> Option<OptionPack>,
{
    fn unpack(&self, token: &str) -> Option<OptionPack> {
        self(token)
    }
}

/// POSIX short option syntax: `-k`, `-kvalue`, or packed flags `-abc`.
///
/// With `packed_flags`, `-abc` is decomposed into the key `a` and the synthetic tokens `-b -c`.
/// Otherwise the remainder is the inline value: `-abc` is the key `a` with the value `bc`.
///
/// A bare `-` is not an option.
/// Note that `--` and `--rest` *do* unpack here, with the raw key `-`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Posix {
    packed_flags: bool,
}

impl Posix {
    /// Create a POSIX unpacker.
    pub fn new(packed_flags: bool) -> Self {
        Self { packed_flags }
    }

    /// A POSIX unpacker that decomposes packed flags.
    pub fn packed() -> Self {
        Self::new(true)
    }

    /// A POSIX unpacker that reads the remainder of a token as its inline value.
    pub fn unpacked() -> Self {
        Self::new(false)
    }
}

impl Unpack for Posix {
    fn unpack(&self, token: &str) -> Option<OptionPack> {
        let rest = token.strip_prefix(SHORT_PREFIX)?;
        let mut chars = rest.chars();
        let key = chars.next()?;
        let remainder = chars.as_str();
        let pack = OptionPack::new(SHORT_PREFIX, key.to_string());

        if remainder.is_empty() {
            Some(pack)
        } else if self.packed_flags {
            let packed = remainder
                .chars()
                .map(|c| format!("{SHORT_PREFIX}{c}"))
                .collect();
            Some(pack.with_packed(packed))
        } else {
            Some(pack.with_value(remainder))
        }
    }
}

/// GNU long option syntax: `--key` or `--key=value`.
///
/// Tokens without the `--` prefix (and the bare `--`) fall back to [`Posix`] syntax, with the same `packed_flags`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gnu {
    packed_flags: bool,
}

impl Gnu {
    /// Create a GNU unpacker.
    pub fn new(packed_flags: bool) -> Self {
        Self { packed_flags }
    }

    /// A GNU unpacker whose POSIX fallback decomposes packed flags.
    pub fn packed() -> Self {
        Self::new(true)
    }

    /// A GNU unpacker whose POSIX fallback reads the remainder of a token as its inline value.
    pub fn unpacked() -> Self {
        Self::new(false)
    }
}

impl Unpack for Gnu {
    fn unpack(&self, token: &str) -> Option<OptionPack> {
        match token.strip_prefix(LONG_PREFIX) {
            Some(rest) if !rest.is_empty() => match rest.split_once(VALUE_SEPARATOR) {
                Some((key, value)) if !key.is_empty() => {
                    Some(OptionPack::new(LONG_PREFIX, key).with_value(value))
                }
                Some(_) => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Token '{token}' has an empty long key, falling back to POSIX.");
                    }
                    Posix::new(self.packed_flags).unpack(token)
                }
                None => Some(OptionPack::new(LONG_PREFIX, rest)),
            },
            _ => Posix::new(self.packed_flags).unpack(token),
        }
    }
}
