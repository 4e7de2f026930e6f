//! Contentpack - build and unpack FileVault-style JCR content packages
//!
//! A content package is a ZIP archive holding a repository subtree as
//! namespace-aware `.content.xml` documents below `jcr_root/`, raw files at
//! their escaped paths, and package metadata below `META-INF/vault/`.
//!
//! # Features
//!
//! - **Typed value codec**: JCR property values to and from the `{Type}value`
//!   and `[v1,v2]` attribute text form
//! - **Name and path validation**, ISO 9075 and platform path escaping
//! - **Content tree splitting**: one document per page, folder or file node
//! - **Archive writer**: pages, content trees and binary files, with package
//!   metadata, filters and an optional thumbnail
//! - **Filtering unpacker**: exclude files, nodes, properties and mixins,
//!   sort weak references and mark pages as activated, keeping the
//!   namespace declaration order of every rewritten document
//!
//! # Example - Building a package
//!
//! ```no_run
//! use contentpack::content_map;
//! use contentpack::package::ContentPackageBuilder;
//!
//! # fn main() -> contentpack::Result<()> {
//! let mut package = ContentPackageBuilder::new()
//!     .group("mycompany")
//!     .name("site-content")
//!     .created(chrono::Utc::now())
//!     .root_path("/content/site")
//!     .build_file("site-content.zip")?;
//!
//! package.add_page("/content/site/en", content_map! {
//!     "jcr:title" => "English",
//!     "sling:resourceType" => "app/components/page",
//! })?;
//! package.add_file("/content/dam/logo.png", &[0x89, 0x50, 0x4e, 0x47], Some("image/png"))?;
//! package.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Unpacking with filters
//!
//! ```no_run
//! use contentpack::unpack::{ContentUnpacker, UnpackOptions};
//!
//! # fn main() -> contentpack::Result<()> {
//! let options = UnpackOptions::new()
//!     .with_exclude_files(["^META-INF/.*"])
//!     .with_exclude_properties(["jcr:created", "jcr:createdBy", "jcr:lastModified.*"])
//!     .with_exclude_mixins(["mix:versionable"]);
//! let summary = ContentUnpacker::new(&options)?.unpack_file("site-content.zip", "src/content")?;
//! println!("{} entries, {} documents rewritten", summary.entries, summary.filtered);
//! # Ok(())
//! # }
//! ```

/// Error type and shared XML escaping helpers
pub mod common;

/// In-memory content trees and the document splitter
pub mod content;

/// JCR name and path rules and escaping
pub mod name;

/// Package metadata, builder and archive writer
pub mod package;

/// Archive filter and unpacker
pub mod unpack;

/// Typed property values and their text form
pub mod value;

/// XML tree, reader, diff-friendly writer and content document builder
pub mod xml;

pub use common::{Error, Result};
pub use content::{ContentElement, ContentMap, ContentValue};
pub use package::{ContentPackage, ContentPackageBuilder, PackageMetadata};
pub use unpack::{ContentUnpacker, UnpackOptions, UnpackSummary, unpack};
pub use value::{PropertyType, Value, ValueConverter};
