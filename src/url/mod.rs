//! URL handling module for Artifact Scout
//!
//! This module provides reference resolution against listing pages,
//! path-segment helpers, and the browsing-frontend to raw-storage rewrite.
//! Nothing in here performs I/O.

mod resolve;
mod translate;

pub use resolve::{dir_name, file_name, is_below, join, last_segment, parse_absolute, resolve};
pub use translate::translate_to_storage;
