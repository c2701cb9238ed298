//! `cmdopts` is a description-driven command line parsing engine for Rust.
//!
//! Rather than declaring a fixed grammar, a program hands the engine a *group* of [`Description`]s.
//! The engine walks the command line tokens once, asking each description in turn whether it recognizes the token.
//! Every recognized token lands in an ordered [`VariableMap`], after which each description's finalizer checks the result.
//!
//! `cmdopts` prioritizes the following design concerns:
//! * *Syntax as data*:
//! Each option owns its unpacking dialect ([`Posix`] or [`Gnu`], or any [`Unpack`] implementation).
//! Options of different dialects may share a group.
//! * *Ordered results*:
//! The [`VariableMap`] keeps every occurrence in the order it was parsed, so repeated options and layered configurations are both natural.
//! * *Type safe values*:
//! Values are converted via [`std::str::FromStr`] by a [`ValueSpec`], and may be written straight into program variables.
//! * *Declarative checks*:
//! Occurrence counts, operand pins, and mutual exclusion/inclusion are stated once, via [`Constraint`].
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/demo_copy.rs")]
//! ```
//!
//! ```console
//! $ copy -v --level 3 out a.txt b.txt
//! Copying 2 file(s) to out (level 3).
//!   a.txt
//!   b.txt
//!
//! $ copy --level=x out a.txt
//! Parse error: invalid argument (position 0, argument 0): cannot convert 'x' to u8: invalid digit found in string.
//! --level=x out a.txt
//! ^^^^^^^^^
//! ```
//!
//! # Descriptions
//! Descriptions are built with the constructor functions:
//! * [`make_flag`]: an option without a value (ex: `-v`, `--verbose`).
//! Flags may be packed: `-abc` is `-a -b -c`.
//! * [`make_switch`]: a flag which stores an implicit value (ex: `--color` storing `true`).
//! * [`make_option`]: an option with a value (ex: `--level=3`, `--level 3`, `-l3`, `-l 3`).
//! With an implicit value, the value becomes optional, and may only be given inline.
//! * [`make_operand`]: a token which is not an option.
//! * [`make_bare_operand`]: an operand which only records its presence.
//! * [`make_options_error`]: rejects every remaining option shaped token as unknown.
//!
//! The engine's own vocabulary ([`OptionDescription`], [`OperandDescription`]) is also public, for descriptions the constructors cannot express.
//!
//! # Layering
//! A parse may start from a seed [`VariableMap`], for example the result of parsing a configuration file.
//! Since the map is ordered, [`VariableMap::value_of`] reads the most recent layer.
//! ```no_run
#![doc = include_str!("../demos/demo_layers.rs")]
//! ```
//!
//! # Errors
//! Descriptions which cannot be built are reported via [`ConfigError`].
//! Command lines which cannot be parsed are reported via [`ParseError`], with the position of the offending token.
//! [`ErrorContext`] renders that token underneath the command line.
//!
//! # Features
//! * `tracing_debug`: emit debug logs of the parse, via the `tracing` crate.

pub use cmdopts_builder::*;
