//! Content package writing: metadata, the fluent builder and the archive
//! writer.

mod builder;
mod metadata;
pub mod templates;
mod writer;

pub use builder::ContentPackageBuilder;
pub use metadata::{AcHandling, PackageFilter, PackageFilterRule, PackageMetadata};
pub use writer::ContentPackage;
