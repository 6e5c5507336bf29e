//! CLI command implementations

pub mod custody;
pub mod events;
pub mod init;
pub mod names;
