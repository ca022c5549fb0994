//! Caller-side handling of discovered archives
//!
//! Turns a discovery result into a decision (nothing found, one archive, or
//! a choice to make) and checks that a chosen archive is downloadable.

mod select;
mod verify;

pub use select::{select, Selection};
pub use verify::{build_archive_client, verify_archive, ArchiveInfo};
