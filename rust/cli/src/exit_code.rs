//! Process exit codes returned by [`crate::run`].

pub const SUCCESS: i32 = 0;

/// Any failure: bad arguments, bad configuration, I/O or engine errors.
pub const ERROR: i32 = 2;

/// The player left an interactive match before it was decided.
pub const INTERRUPTED: i32 = 130;
