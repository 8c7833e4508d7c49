//! Version suffix handling for attachment filenames.
//!
//! A requested filename such as `report.pdf.v3` names version 3 of the
//! remote attachment `report.pdf`. Only a `.v<digits>` run anchored at the
//! very end of the name counts.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static VERSION_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.v(\d+)$").unwrap());

/// Which historical version of an attachment to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionSelector {
    /// Current version.
    #[default]
    Latest,
    /// Specific version number.
    Number(u32),
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A user-supplied filename split into the real name and its version marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedFilename {
    /// Filename with any `.v<digits>` suffix removed.
    pub real_filename: String,
    /// Version number from the suffix, if present.
    pub version: Option<u32>,
}

impl VersionedFilename {
    /// Split `filename` into real name and version.
    ///
    /// A digit run that does not fit in `u32` is not treated as a version.
    #[must_use]
    pub fn parse(filename: &str) -> Self {
        if let Some(caps) = VERSION_SUFFIX_RE.captures(filename)
            && let Ok(version) = caps[1].parse::<u32>()
        {
            let suffix_start = caps.get(0).map_or(filename.len(), |m| m.start());
            return Self {
                real_filename: filename[..suffix_start].to_owned(),
                version: Some(version),
            };
        }
        Self {
            real_filename: filename.to_owned(),
            version: None,
        }
    }

    /// Attachment title on the server: base name of the real filename.
    #[must_use]
    pub fn remote_title(&self) -> String {
        Path::new(&self.real_filename)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Version selector for download requests.
    #[must_use]
    pub fn selector(&self) -> VersionSelector {
        self.version
            .map_or(VersionSelector::Latest, VersionSelector::Number)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_version_suffix() {
        let parsed = VersionedFilename::parse("report.pdf.v3");
        assert_eq!(parsed.real_filename, "report.pdf");
        assert_eq!(parsed.version, Some(3));
        assert_eq!(parsed.selector(), VersionSelector::Number(3));
    }

    #[test]
    fn test_parse_without_suffix() {
        let parsed = VersionedFilename::parse("notes.txt");
        assert_eq!(parsed.real_filename, "notes.txt");
        assert_eq!(parsed.version, None);
        assert_eq!(parsed.selector(), VersionSelector::Latest);
    }

    #[test]
    fn test_parse_multi_digit_version() {
        let parsed = VersionedFilename::parse("archive.tar.gz.v120");
        assert_eq!(parsed.real_filename, "archive.tar.gz");
        assert_eq!(parsed.version, Some(120));
    }

    #[test]
    fn test_embedded_marker_is_ignored() {
        let parsed = VersionedFilename::parse("build.v123.log");
        assert_eq!(parsed.real_filename, "build.v123.log");
        assert_eq!(parsed.version, None);
    }

    #[test]
    fn test_only_trailing_marker_counts() {
        let parsed = VersionedFilename::parse("data.v1.csv.v2");
        assert_eq!(parsed.real_filename, "data.v1.csv");
        assert_eq!(parsed.version, Some(2));
    }

    #[test]
    fn test_marker_without_digits() {
        let parsed = VersionedFilename::parse("file.v");
        assert_eq!(parsed.real_filename, "file.v");
        assert_eq!(parsed.version, None);
    }

    #[test]
    fn test_uppercase_marker_is_not_a_version() {
        let parsed = VersionedFilename::parse("file.V2");
        assert_eq!(parsed.version, None);
    }

    #[test]
    fn test_overflowing_version_is_not_a_version() {
        let parsed = VersionedFilename::parse("file.v99999999999");
        assert_eq!(parsed.real_filename, "file.v99999999999");
        assert_eq!(parsed.version, None);
    }

    #[test]
    fn test_remote_title_strips_directories() {
        let parsed = VersionedFilename::parse("out/docs/report.pdf.v7");
        assert_eq!(parsed.real_filename, "out/docs/report.pdf");
        assert_eq!(parsed.remote_title(), "report.pdf");
    }

    #[test]
    fn test_remote_title_without_version() {
        let parsed = VersionedFilename::parse("/tmp/notes.txt");
        assert_eq!(parsed.remote_title(), "notes.txt");
    }

    #[test]
    fn test_selector_display() {
        assert_eq!(VersionSelector::Latest.to_string(), "latest");
        assert_eq!(VersionSelector::Number(4).to_string(), "4");
    }
}
