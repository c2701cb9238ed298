mod model;
mod syntax;

pub use model::OptionPack;
pub use syntax::{Gnu, Posix, Unpack};
