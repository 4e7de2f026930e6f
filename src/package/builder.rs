//! Fluent construction of content packages.

use super::metadata::{AcHandling, PackageFilter, PackageMetadata};
use super::writer::ContentPackage;
use crate::common::Result;
use chrono::{DateTime, TimeZone};
use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

/// Collects package metadata and opens a [`ContentPackage`].
#[derive(Debug, Clone, Default)]
pub struct ContentPackageBuilder {
    metadata: PackageMetadata,
}

impl ContentPackageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing metadata, e.g. loaded with
    /// [`PackageMetadata::from_yaml`].
    pub fn from_metadata(metadata: PackageMetadata) -> Self {
        Self { metadata }
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.metadata.group = Some(group.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.metadata.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }

    pub fn created_by(mut self, created_by: impl Into<String>) -> Self {
        self.metadata.created_by = created_by.into();
        self
    }

    pub fn created<Tz: TimeZone>(mut self, created: DateTime<Tz>) -> Self {
        self.metadata.created = Some(created.fixed_offset());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.metadata.version = version.into();
        self
    }

    /// Add a filter for a root path without rules.
    pub fn root_path(self, root_path: impl Into<String>) -> Self {
        self.filter(PackageFilter::new(root_path))
    }

    pub fn filter(mut self, filter: PackageFilter) -> Self {
        self.metadata.filters.push(filter);
        self
    }

    /// Register an additional XML namespace.
    pub fn xml_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.metadata.xml_namespaces.insert(prefix.into(), uri.into());
        self
    }

    pub fn ac_handling(mut self, ac_handling: AcHandling) -> Self {
        self.metadata.ac_handling = Some(ac_handling);
        self
    }

    pub fn package_type(mut self, package_type: impl Into<String>) -> Self {
        self.metadata.package_type = Some(package_type.into());
        self
    }

    pub fn requires_root(mut self, requires_root: bool) -> Self {
        self.metadata.requires_root = requires_root;
        self
    }

    pub fn allow_index_definitions(mut self, allow: bool) -> Self {
        self.metadata.allow_index_definitions = allow;
        self
    }

    pub fn thumbnail_image(mut self, png: Vec<u8>) -> Self {
        self.metadata.thumbnail_image = Some(png);
        self
    }

    pub fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    /// Open a package writing to `writer`.
    ///
    /// Fails with a metadata error before anything is written when name,
    /// group, creation date or root path are missing.
    pub fn build<W: Write + Seek>(self, writer: W) -> Result<ContentPackage<W>> {
        ContentPackage::new(self.metadata, writer)
    }

    /// Open a package writing to a new file.
    pub fn build_file(self, path: impl AsRef<Path>) -> Result<ContentPackage<File>> {
        self.metadata.validate()?;
        let file = File::create(path)?;
        self.build(file)
    }

    /// Open a package writing to memory.
    pub fn build_in_memory(self) -> Result<ContentPackage<Cursor<Vec<u8>>>> {
        self.build(Cursor::new(Vec::new()))
    }
}
