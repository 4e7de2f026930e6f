//! Unpack configuration and its compiled form.

use crate::common::{Error, Result};
use crate::value::{format_date, parse_date};
use chrono::{DateTime, NaiveTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Options controlling what is left out when a package is unpacked.
///
/// Every pattern is a regular expression that has to match the whole
/// candidate: the archive entry name for files, the repository path for
/// nodes (e.g. `/content/site/en/jcr:content/par`), the qualified attribute
/// name for properties, and each single mixin name for mixins. An empty
/// list excludes nothing.
///
/// # Examples
///
/// ```
/// use contentpack::unpack::UnpackOptions;
///
/// let options = UnpackOptions::new()
///     .with_exclude_files(["^META-INF/.*"])
///     .with_exclude_properties(["jcr:created", "jcr:createdBy", "cq:lastModified.*"])
///     .with_mark_replication_activated(true);
/// assert_eq!(options.exclude_properties.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnpackOptions {
    /// Archive entries to skip entirely
    pub exclude_files: Vec<String>,
    /// Nodes to remove from documents
    pub exclude_nodes: Vec<String>,
    /// Properties to remove from documents
    pub exclude_properties: Vec<String>,
    /// Mixins to remove from `jcr:mixinTypes`
    pub exclude_mixins: Vec<String>,
    /// Mark page and template content as activated
    pub mark_replication_activated: bool,
    /// Limit replication marking to content nodes with matching paths
    pub mark_replication_activated_include_nodes: Vec<String>,
    /// Fixed ISO-8601 timestamp for `cq:lastReplicated`; defaults to the
    /// start of the current day (UTC)
    pub date_last_replicated: Option<String>,
}

impl UnpackOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a YAML document.
    ///
    /// ```
    /// use contentpack::unpack::UnpackOptions;
    ///
    /// let options = UnpackOptions::from_yaml(r#"
    /// exclude_nodes: ["^.*/scheduleday_0$"]
    /// mark_replication_activated: true
    /// "#).unwrap();
    /// assert!(options.mark_replication_activated);
    /// assert!(options.exclude_files.is_empty());
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse unpack options: {}", e)))
    }

    #[inline]
    pub fn with_exclude_files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_files = patterns.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn with_exclude_nodes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_nodes = patterns.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn with_exclude_properties<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_properties = patterns.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn with_exclude_mixins<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_mixins = patterns.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn with_mark_replication_activated(mut self, mark: bool) -> Self {
        self.mark_replication_activated = mark;
        self
    }

    #[inline]
    pub fn with_mark_replication_activated_include_nodes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mark_replication_activated_include_nodes =
            patterns.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn with_date_last_replicated(mut self, date: impl Into<String>) -> Self {
        self.date_last_replicated = Some(date.into());
        self
    }
}

/// Compiled full-match patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    patterns: Vec<Regex>,
}

impl PatternList {
    pub fn compile(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| Error::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether any pattern matches the whole candidate.
    #[inline]
    pub fn matches(&self, candidate: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(candidate))
    }
}

/// Settings for marking content as activated.
#[derive(Debug, Clone)]
pub struct ReplicationMarker {
    /// Content node paths to mark; empty marks all
    pub include_nodes: PatternList,
    /// Fixed timestamp text for `cq:lastReplicated`; `None` uses the
    /// start of the day of each run
    pub last_replicated: Option<String>,
}

impl ReplicationMarker {
    pub fn applies_to(&self, path: &str) -> bool {
        self.include_nodes.is_empty() || self.include_nodes.matches(path)
    }

    /// Timestamp to write for a run starting now.
    pub fn timestamp(&self) -> String {
        match &self.last_replicated {
            Some(date) => date.clone(),
            None => start_of_day(Utc::now()),
        }
    }
}

/// Midnight UTC of the day of `now`, formatted as a `{Date}` value.
fn start_of_day(now: DateTime<Utc>) -> String {
    format_date(
        &now.date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc()
            .fixed_offset(),
    )
}

/// [`UnpackOptions`] with all patterns compiled.
#[derive(Debug, Clone, Default)]
pub struct ExcludeRules {
    pub files: PatternList,
    pub nodes: PatternList,
    pub properties: PatternList,
    pub mixins: PatternList,
    pub replication: Option<ReplicationMarker>,
}

impl ExcludeRules {
    pub fn compile(options: &UnpackOptions) -> Result<Self> {
        let replication = if options.mark_replication_activated {
            let last_replicated = options
                .date_last_replicated
                .as_deref()
                .map(|date| parse_date(date).map(|dt| format_date(&dt)))
                .transpose()?;
            Some(ReplicationMarker {
                include_nodes: PatternList::compile(
                    &options.mark_replication_activated_include_nodes,
                )?,
                last_replicated,
            })
        } else {
            None
        };

        Ok(Self {
            files: PatternList::compile(&options.exclude_files)?,
            nodes: PatternList::compile(&options.exclude_nodes)?,
            properties: PatternList::compile(&options.exclude_properties)?,
            mixins: PatternList::compile(&options.exclude_mixins)?,
            replication,
        })
    }

    /// Whether `.content.xml` documents need to be rewritten at all.
    pub fn rewrites_documents(&self) -> bool {
        !self.nodes.is_empty()
            || !self.properties.is_empty()
            || !self.mixins.is_empty()
            || self.replication.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_full_match() {
        let list = PatternList::compile(&["jcr\\:created".to_string(), "cq:last.*".to_string()])
            .unwrap();
        assert!(list.matches("jcr:created"));
        assert!(!list.matches("jcr:createdBy"));
        assert!(!list.matches("xjcr:created"));
        assert!(list.matches("cq:lastModified"));
    }

    #[test]
    fn test_alternation_is_anchored() {
        let list = PatternList::compile(&["a|b".to_string()]).unwrap();
        assert!(list.matches("a"));
        assert!(!list.matches("ab"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternList::compile(&["(unclosed".to_string()]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn test_empty_rules_rewrite_nothing() {
        let rules = ExcludeRules::compile(&UnpackOptions::new()).unwrap();
        assert!(!rules.rewrites_documents());
        assert!(!rules.files.matches("anything"));

        let rules = ExcludeRules::compile(
            &UnpackOptions::new().with_exclude_mixins(["mix:versionable"]),
        )
        .unwrap();
        assert!(rules.rewrites_documents());
    }

    #[test]
    fn test_replication_date() {
        let options = UnpackOptions::new()
            .with_mark_replication_activated(true)
            .with_date_last_replicated("2020-01-02T03:04:05+01:00");
        let rules = ExcludeRules::compile(&options).unwrap();
        let marker = rules.replication.unwrap();
        assert_eq!(marker.timestamp(), "2020-01-02T03:04:05.000+01:00");
        assert!(marker.applies_to("/any/path"));

        let options = options.with_date_last_replicated("yesterday");
        assert!(matches!(
            ExcludeRules::compile(&options),
            Err(Error::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_default_replication_date_is_start_of_day() {
        let options = UnpackOptions::new().with_mark_replication_activated(true);
        let marker = ExcludeRules::compile(&options).unwrap().replication.unwrap();
        assert_eq!(marker.last_replicated, None);
        assert!(marker.timestamp().ends_with("T00:00:00.000Z"));
    }

    #[test]
    fn test_start_of_day_follows_run_date() {
        let before = Utc.with_ymd_and_hms(2024, 5, 6, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 5, 7, 0, 0, 1).unwrap();
        assert_eq!(start_of_day(before), "2024-05-06T00:00:00.000Z");
        assert_eq!(start_of_day(after), "2024-05-07T00:00:00.000Z");
    }

    #[test]
    fn test_from_yaml_invalid() {
        assert!(matches!(
            UnpackOptions::from_yaml("mark_replication_activated: [1, 2]"),
            Err(Error::Config(_))
        ));
    }
}
