//! Extracts content package archives into a directory.

use super::filter;
use super::options::{ExcludeRules, ReplicationMarker, UnpackOptions};
use crate::common::{Error, Result};
use crate::name::platform::DOT_CONTENT_XML;
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Counters for one unpack run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnpackSummary {
    /// Files written to the output directory
    pub entries: usize,
    /// Entries skipped by a file exclude pattern
    pub excluded: usize,
    /// `.content.xml` documents rewritten by the filter pass
    pub filtered: usize,
    /// `.content.xml` documents copied unchanged because they are not
    /// JCR document views or failed to parse
    pub opaque: usize,
}

/// Outcome of preparing one file entry for writing.
enum Prepared {
    Filtered(String),
    Opaque(Vec<u8>),
    Raw(Vec<u8>),
}

/// Unpacks archives, applying the configured exclude rules.
///
/// An unpacker holds only compiled rules; it can be reused for any number
/// of archives.
///
/// # Examples
///
/// ```no_run
/// use contentpack::unpack::{ContentUnpacker, UnpackOptions};
///
/// # fn main() -> contentpack::Result<()> {
/// let options = UnpackOptions::new()
///     .with_exclude_files(["^META-INF/.*"])
///     .with_exclude_properties(["jcr:created", "jcr:createdBy", "cq:lastModified.*"]);
/// let unpacker = ContentUnpacker::new(&options)?;
/// let summary = unpacker.unpack_file("package.zip", "target/content")?;
/// println!("{} files written", summary.entries);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ContentUnpacker {
    rules: ExcludeRules,
}

impl ContentUnpacker {
    /// Compile the options. Fails on the first invalid pattern or date.
    pub fn new(options: &UnpackOptions) -> Result<Self> {
        Ok(Self {
            rules: ExcludeRules::compile(options)?,
        })
    }

    #[inline]
    pub fn rules(&self) -> &ExcludeRules {
        &self.rules
    }

    /// Unpack the archive file at `archive` into `output_dir`.
    pub fn unpack_file(
        &self,
        archive: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<UnpackSummary> {
        let file = File::open(archive.as_ref())?;
        self.unpack_reader(BufReader::new(file), output_dir)
    }

    /// Unpack an in-memory archive into `output_dir`.
    pub fn unpack_bytes(&self, archive: &[u8], output_dir: impl AsRef<Path>) -> Result<UnpackSummary> {
        self.unpack_reader(Cursor::new(archive), output_dir)
    }

    /// Unpack an archive read from `reader` into `output_dir`.
    ///
    /// Directories are created as needed and existing files are replaced.
    /// Output already written is left in place when an error aborts the run.
    pub fn unpack_reader<R: Read + Seek>(
        &self,
        reader: R,
        output_dir: impl AsRef<Path>,
    ) -> Result<UnpackSummary> {
        let output_dir = output_dir.as_ref();
        let mut archive = ZipArchive::new(reader)?;
        let mut summary = UnpackSummary::default();
        let last_replicated = self.last_replicated();
        fs::create_dir_all(output_dir)?;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let name = entry.name().to_string();

            if self.rules.files.matches(&name) {
                debug!(entry = %name, "excluded");
                summary.excluded += 1;
                continue;
            }

            let relative = entry
                .enclosed_name()
                .ok_or_else(|| Error::InvalidEntryName(name.clone()))?;
            let target = output_dir.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&target).map_err(|e| Error::from(e).in_entry(&name))?;
                continue;
            }

            let mut data = Vec::with_capacity(capacity_hint(entry.size()));
            entry
                .read_to_end(&mut data)
                .map_err(|e| Error::from(e).in_entry(&name))?;

            let prepared = self.prepare(&name, &last_replicated, data)?;
            let bytes: &[u8] = match &prepared {
                Prepared::Filtered(xml) => {
                    summary.filtered += 1;
                    xml.as_bytes()
                },
                Prepared::Opaque(data) => {
                    summary.opaque += 1;
                    data
                },
                Prepared::Raw(data) => data,
            };

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::from(e).in_entry(&name))?;
            }
            fs::write(&target, bytes).map_err(|e| Error::from(e).in_entry(&name))?;
            debug!(entry = %name, size = bytes.len(), "unpacked");
            summary.entries += 1;
        }

        info!(
            output = %output_dir.display(),
            entries = summary.entries,
            excluded = summary.excluded,
            filtered = summary.filtered,
            opaque = summary.opaque,
            "unpacked content package"
        );
        Ok(summary)
    }

    /// Apply the filter pass to one `.content.xml` document.
    ///
    /// Returns `None` when the document is not a JCR document view. Unlike
    /// an unpack run, malformed XML is reported as an error here.
    pub fn filter_document(&self, entry_name: &str, xml: &[u8]) -> Result<Option<String>> {
        filter::filter_document(&self.rules, &self.last_replicated(), entry_name, xml)
            .map_err(|e| e.in_entry(entry_name))
    }

    /// `cq:lastReplicated` text for a run starting now.
    fn last_replicated(&self) -> String {
        self.rules
            .replication
            .as_ref()
            .map(ReplicationMarker::timestamp)
            .unwrap_or_default()
    }

    fn prepare(&self, name: &str, last_replicated: &str, data: Vec<u8>) -> Result<Prepared> {
        if !self.rules.rewrites_documents() || !is_content_document(name) {
            return Ok(Prepared::Raw(data));
        }
        match filter::filter_document(&self.rules, last_replicated, name, &data) {
            Ok(Some(xml)) => Ok(Prepared::Filtered(xml)),
            Ok(None) => {
                debug!(entry = %name, "not a document view, copied unchanged");
                Ok(Prepared::Opaque(data))
            },
            Err(e) if e.is_format_error() => {
                warn!(entry = %name, error = %e, "unparseable document, copied unchanged");
                Ok(Prepared::Opaque(data))
            },
            Err(e) => Err(e.in_entry(name)),
        }
    }
}

/// Largest buffer reserved up front for one entry; the header size is
/// not trusted beyond this.
const MAX_CAPACITY_HINT: u64 = 1 << 20;

#[inline]
fn capacity_hint(declared_size: u64) -> usize {
    declared_size.min(MAX_CAPACITY_HINT) as usize
}

#[inline]
fn is_content_document(name: &str) -> bool {
    name.strip_suffix(DOT_CONTENT_XML)
        .is_some_and(|dir| dir.ends_with('/'))
}
