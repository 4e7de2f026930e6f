//! Content package archive writer.

use super::metadata::PackageMetadata;
use super::templates::{
    CONFIG_XML, FILTER_XML, PROPERTIES_XML, SETTINGS_XML, THUMBNAIL_PNG, config_xml, filter_xml,
    properties_xml, settings_xml,
};
use crate::common::{Error, Result};
use crate::content::{ContentMap, split};
use crate::name::ensure_valid_path;
use crate::name::platform::{DIR_SUFFIX, DOT_CONTENT_XML, build_jcr_path_for_zip};
use crate::xml::{XmlContentBuilder, XmlDocument, to_xml_string};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use tracing::{debug, warn};
use zip::write::{SimpleFileOptions, ZipWriter};

/// Separates MIME type and character encoding in a content type.
const CHARSET_SEPARATOR: &str = ";charset=";

/// An open content package.
///
/// Package metadata files are written when the package is created. Every
/// `add_*` call appends entries; an archive path can be written only once.
/// [`close`](Self::close) finalizes the archive and hands back the
/// underlying writer. A package that is dropped without being closed is
/// finalized on drop, with errors only logged.
///
/// # Examples
///
/// ```
/// use contentpack::content_map;
/// use contentpack::package::ContentPackageBuilder;
///
/// # fn main() -> contentpack::Result<()> {
/// let mut package = ContentPackageBuilder::new()
///     .group("mygroup")
///     .name("mypackage")
///     .created(chrono::Utc::now())
///     .root_path("/content/site")
///     .build_in_memory()?;
/// package.add_page("/content/site/en", content_map! {
///     "jcr:title" => "English",
/// })?;
/// let bytes = package.close()?.into_inner();
/// assert!(!bytes.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct ContentPackage<W: Write + Seek> {
    metadata: PackageMetadata,
    zip: Option<ZipWriter<W>>,
    builder: XmlContentBuilder,
    written: HashSet<String>,
}

impl<W: Write + Seek> ContentPackage<W> {
    /// Validate the metadata, open the archive and write the package
    /// metadata files.
    pub(crate) fn new(metadata: PackageMetadata, writer: W) -> Result<Self> {
        metadata.validate()?;
        let mut package = Self {
            builder: XmlContentBuilder::new(metadata.xml_namespaces.clone()),
            metadata,
            zip: Some(ZipWriter::new(writer)),
            written: HashSet::new(),
        };
        package.build_package_metadata()?;
        Ok(package)
    }

    pub fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    /// Add a page at `path`. The content map holds the page content
    /// properties and child nodes; the page and page content node types are
    /// set automatically.
    pub fn add_page(&mut self, path: &str, content: impl Into<ContentMap>) -> Result<()> {
        ensure_valid_path(path)?;
        let content = content.into();
        let doc = self.builder.build_page(&content)?;
        self.write_xml_document(&content_document_path(path), &doc)
    }

    /// Add arbitrary content at `path`. Children with a folder or page node
    /// type are written as documents of their own.
    pub fn add_content(&mut self, path: &str, content: impl Into<ContentMap>) -> Result<()> {
        ensure_valid_path(path)?;
        for part in split(content.into()) {
            let part_path = join_part_path(path, &part.path);
            ensure_valid_path(&part_path)?;
            let doc = self.builder.build_content(&part.content)?;
            self.write_xml_document(&content_document_path(&part_path), &doc)?;
        }
        Ok(())
    }

    /// Add a binary file. With a content type (optionally carrying
    /// `;charset=`), a `.dir/.content.xml` metadata document is added next
    /// to it.
    pub fn add_file(&mut self, path: &str, data: &[u8], content_type: Option<&str>) -> Result<()> {
        self.add_file_from_reader(path, &mut Cursor::new(data), content_type)
    }

    /// Add a binary file, streaming its content from a reader.
    pub fn add_file_from_reader<R: Read>(
        &mut self,
        path: &str,
        reader: &mut R,
        content_type: Option<&str>,
    ) -> Result<()> {
        ensure_valid_path(path)?;
        let zip_path = build_jcr_path_for_zip(path);
        let zip = self.start_entry(&zip_path)?;
        let size = std::io::copy(reader, zip)?;
        debug!(entry = %zip_path, size, "wrote file");

        if let Some(content_type) = content_type {
            let (mime_type, encoding) = match content_type.split_once(CHARSET_SEPARATOR) {
                Some((mime_type, encoding)) => (mime_type, Some(encoding)),
                None => (content_type, None),
            };
            let doc = self.builder.build_nt_file(Some(mime_type), encoding);
            let meta_path = format!("{}{}/{}", zip_path, DIR_SUFFIX, DOT_CONTENT_XML);
            self.write_xml_document(&meta_path, &doc)?;
        }
        Ok(())
    }

    /// Add a binary file from the local filesystem.
    pub fn add_file_from_path(
        &mut self,
        path: &str,
        file: impl AsRef<Path>,
        content_type: Option<&str>,
    ) -> Result<()> {
        let mut file = File::open(file)?;
        self.add_file_from_reader(path, &mut file, content_type)
    }

    /// Finalize the archive and return the underlying writer.
    pub fn close(mut self) -> Result<W> {
        let zip = self
            .zip
            .take()
            .ok_or_else(|| Error::ZipError("package already closed".to_string()))?;
        let writer = zip.finish()?;
        debug!(entries = self.written.len(), "closed package");
        Ok(writer)
    }

    fn build_package_metadata(&mut self) -> Result<()> {
        self.write_entry(CONFIG_XML, config_xml().as_bytes())?;
        let filter = filter_xml(&self.metadata.filters);
        self.write_entry(FILTER_XML, filter.as_bytes())?;
        let properties = properties_xml(&self.metadata);
        self.write_entry(PROPERTIES_XML, properties.as_bytes())?;
        self.write_entry(SETTINGS_XML, settings_xml().as_bytes())?;
        if let Some(thumbnail) = self.metadata.thumbnail_image.take() {
            let result = self.write_entry(THUMBNAIL_PNG, &thumbnail);
            self.metadata.thumbnail_image = Some(thumbnail);
            result?;
        }
        Ok(())
    }

    fn write_xml_document(&mut self, zip_path: &str, doc: &XmlDocument) -> Result<()> {
        let xml = to_xml_string(doc);
        self.write_entry(zip_path, xml.as_bytes())
    }

    fn write_entry(&mut self, zip_path: &str, content: &[u8]) -> Result<()> {
        let zip = self.start_entry(zip_path)?;
        zip.write_all(content)?;
        debug!(entry = %zip_path, size = content.len(), "wrote entry");
        Ok(())
    }

    /// Register the path and start a new entry in the archive.
    fn start_entry(&mut self, zip_path: &str) -> Result<&mut ZipWriter<W>> {
        let zip = self
            .zip
            .as_mut()
            .ok_or_else(|| Error::ZipError("package already closed".to_string()))?;
        if !self.written.insert(zip_path.to_string()) {
            return Err(Error::DuplicateEntry(zip_path.to_string()));
        }
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        zip.start_file(zip_path, options)?;
        Ok(zip)
    }
}

impl<W: Write + Seek> Drop for ContentPackage<W> {
    fn drop(&mut self) {
        if let Some(zip) = self.zip.take()
            && let Err(e) = zip.finish()
        {
            warn!(error = %e, "failed to finalize content package");
        }
    }
}

impl<W: Write + Seek> std::fmt::Debug for ContentPackage<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentPackage")
            .field("metadata", &self.metadata)
            .field("entries", &self.written.len())
            .field("closed", &self.zip.is_none())
            .finish()
    }
}

/// Repository path of a split part below `base`; the root part keeps `base`.
fn join_part_path(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        base.to_string()
    } else {
        format!("{}{}", base.trim_end_matches('/'), relative)
    }
}

/// Archive path of the document describing the node at `path`.
fn content_document_path(path: &str) -> String {
    format!("{}/{}", build_jcr_path_for_zip(path), DOT_CONTENT_XML)
}
