mod capture;
mod constraint;
mod core;
mod description;
mod field;

pub use self::core::*;
pub use capture::*;
pub use constraint::*;
pub use description::*;
pub use field::*;
