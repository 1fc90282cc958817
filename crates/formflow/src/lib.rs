//! Command line front end for formflow documents: validation, schema
//! export, non-interactive fill-out and persistence to a directory store.

pub mod cli;
pub mod cmd;
pub mod config;
pub mod fs_store;
pub mod logging;
