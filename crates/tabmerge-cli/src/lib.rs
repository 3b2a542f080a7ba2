//! Command-line front end for tabmerge.

pub mod cli;
pub mod commands;
pub mod logging;
