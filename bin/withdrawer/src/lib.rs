//! Withdrawer: moves value between an OP Stack L2 and its L1.
//!
//! The library half of the binary holds the command line, the config file,
//! command dispatch and the withdrawal lister so they can be tested without
//! spawning the executable.

pub mod cli;
pub mod commands;
pub mod config;
pub mod list;
