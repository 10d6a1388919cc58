//! Command line components for `sdmap`.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
