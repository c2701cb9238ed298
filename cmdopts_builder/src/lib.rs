//! Builder module for `cmdopts`.
//! See [documentation root](https://docs.rs/cmdopts/latest/cmdopts/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod model;
mod parser;
#[allow(missing_docs)]
pub mod prelude;
mod unpack;

pub use api::*;
pub use model::*;
pub use parser::{
    finalize, parse_arguments, parse_incremental_arguments, ArgumentParser, ConfigError,
    ErrorContext, ParseError, VariableMap,
};
pub use unpack::*;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
pub(crate) mod test {
    macro_rules! assert_contains {
        ($base:expr, $sub:expr) => {
            assert!(
                $base.contains($sub),
                "'{b}' does not contain '{s}'",
                b = $base,
                s = $sub,
            );
        };
    }

    pub(crate) use assert_contains;
}
