//! Archive filter and unpacker.
//!
//! Extracts a content package into a directory. Entries can be skipped by
//! name, and `.content.xml` documents can be rewritten on the way out:
//! nodes, properties and mixins matching exclude patterns are removed, weak
//! reference lists are sorted, and page content can be marked as activated.
//! Rewritten documents keep the namespace declaration order of the input,
//! so repeated exports of the same content produce identical files.

mod filter;
mod options;
mod unpacker;

pub use options::{ExcludeRules, PatternList, ReplicationMarker, UnpackOptions};
pub use unpacker::{ContentUnpacker, UnpackSummary};

use crate::common::Result;
use std::path::Path;

/// Unpack an in-memory archive into `output_dir`.
///
/// Shorthand for [`ContentUnpacker::new`] followed by
/// [`ContentUnpacker::unpack_bytes`].
pub fn unpack(
    archive: &[u8],
    output_dir: impl AsRef<Path>,
    options: &UnpackOptions,
) -> Result<UnpackSummary> {
    ContentUnpacker::new(options)?.unpack_bytes(archive, output_dir)
}
