//! Subcommand implementations. Each takes the universe to build in and
//! returns what `main` prints.

pub mod call;
pub mod inspect;
pub mod run;
