pub(crate) const DEFAULT_END_OF_OPTIONS: &str = "--";
pub(crate) const SHORT_PREFIX: &str = "-";
pub(crate) const LONG_PREFIX: &str = "--";
pub(crate) const VALUE_SEPARATOR: char = '=';
pub(crate) const DEFAULT_VALUE_DESCRIPTION: &str = "arg";
