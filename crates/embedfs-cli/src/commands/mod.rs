//! Command implementations for the embedfs CLI.
//!
//! Each command module parses nothing itself: it receives already-parsed
//! arguments, performs the operation, and formats output according to the
//! requested format.

pub mod completions;
pub mod inspect;
pub mod pack;
