mod base;
mod interface;
mod map;
mod middleware;

pub use base::{ConfigError, ParseError};
pub use interface::ErrorContext;
pub use map::VariableMap;
pub use middleware::{finalize, parse_arguments, parse_incremental_arguments, ArgumentParser};
