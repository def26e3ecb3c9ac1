//! Name parsing for the page-folder / version-file convention.
//!
//! ```text
//! <source>/001-intro/page_001_v3.png  ──▶  <output>/page-01-v3.jpg
//!          └─ page ─┘        └ version ┘          └page┘ └version┘
//! ```
//!
//! The page number comes from the folder, never from the file name; the
//! number embedded in `page_001_…` is ignored. Every candidate name is
//! classified exactly once into a [`NameParse`], so a malformed name is an
//! explicit, testable branch rather than an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Equivalent of the glob `page_*_v*.png` (case-sensitive, `*` may be empty).
static VERSION_FILE_GLOB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^page_.*_v.*\.png$").expect("valid regex"));

/// Outcome of classifying one candidate version file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameParse {
    /// The name follows the convention.
    Parsed { page: u32, version: u32 },
    /// The name does not; the entry is not part of the dataset.
    Skipped { reason: SkipReason },
}

/// Why an entry was left out of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Folder name has no integer before its first `-`.
    FolderPrefixNotNumeric { folder: String },
    /// File name does not match `page_*_v*.png`.
    PatternMismatch { file: String },
    /// Text between `_v` and the next `.` is not an integer.
    VersionNotNumeric { file: String },
    /// Page folder could not be listed; its files are left out of the run.
    FolderUnreadable { folder: String, detail: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FolderPrefixNotNumeric { folder } => {
                write!(f, "folder '{folder}' has no numeric page prefix")
            }
            SkipReason::PatternMismatch { file } => {
                write!(f, "file '{file}' does not match page_*_v*.png")
            }
            SkipReason::VersionNotNumeric { file } => {
                write!(f, "file '{file}' has a non-numeric version")
            }
            SkipReason::FolderUnreadable { folder, detail } => {
                write!(f, "folder '{folder}' could not be read: {detail}")
            }
        }
    }
}

/// Parse the page number from a folder name such as `001-intro`.
///
/// The token before the first `-` (the whole name if there is none) must be
/// a non-negative integer; leading zeros are allowed.
pub fn parse_page_folder(folder_name: &str) -> Result<u32, SkipReason> {
    let prefix = folder_name.split('-').next().unwrap_or(folder_name);
    prefix
        .parse::<u32>()
        .map_err(|_| SkipReason::FolderPrefixNotNumeric {
            folder: folder_name.to_string(),
        })
}

/// Does `file_name` match `page_*_v*.png`?
pub fn is_version_file_candidate(file_name: &str) -> bool {
    VERSION_FILE_GLOB.is_match(file_name)
}

/// Classify a file inside the folder for `page`.
///
/// The version is the text after the first `_v` up to the next `.`.
pub fn parse_version_file(page: u32, file_name: &str) -> NameParse {
    if !is_version_file_candidate(file_name) {
        return NameParse::Skipped {
            reason: SkipReason::PatternMismatch {
                file: file_name.to_string(),
            },
        };
    }

    let version = file_name
        .find("_v")
        .map(|at| &file_name[at + 2..])
        .and_then(|rest| rest.split('.').next())
        .and_then(|digits| digits.parse::<u32>().ok());

    match version {
        Some(version) => NameParse::Parsed { page, version },
        None => NameParse::Skipped {
            reason: SkipReason::VersionNotNumeric {
                file: file_name.to_string(),
            },
        },
    }
}

/// Deterministic preview name: `page-<page, 2-digit zero-padded>-v<version>.jpg`.
pub fn output_file_name(page: u32, version: u32) -> String {
    format!("page-{page:02}-v{version}.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_prefix_parses_with_leading_zeros() {
        assert_eq!(parse_page_folder("001-page1"), Ok(1));
        assert_eq!(parse_page_folder("042-cover-art"), Ok(42));
        assert_eq!(parse_page_folder("7"), Ok(7));
    }

    #[test]
    fn non_numeric_folder_is_skipped() {
        assert_eq!(
            parse_page_folder("abc-foo"),
            Err(SkipReason::FolderPrefixNotNumeric {
                folder: "abc-foo".into()
            })
        );
        assert!(parse_page_folder("-001").is_err());
        assert!(parse_page_folder("").is_err());
    }

    #[test]
    fn glob_equivalent_matching() {
        assert!(is_version_file_candidate("page_001_v1.png"));
        assert!(is_version_file_candidate("page__v.png"));
        assert!(is_version_file_candidate("page_cover_v12.png"));
        assert!(!is_version_file_candidate("page_v1.png"));
        assert!(!is_version_file_candidate("page_001_v1.PNG"));
        assert!(!is_version_file_candidate("page_001_v1.png.bak"));
        assert!(!is_version_file_candidate("notes.txt"));
    }

    #[test]
    fn version_comes_from_file_page_from_folder() {
        assert_eq!(
            parse_version_file(2, "page_999_v3.png"),
            NameParse::Parsed {
                page: 2,
                version: 3
            }
        );
    }

    #[test]
    fn version_stops_at_first_dot() {
        assert_eq!(
            parse_version_file(1, "page_001_v10.final.png"),
            NameParse::Parsed {
                page: 1,
                version: 10
            }
        );
    }

    #[test]
    fn non_numeric_version_is_skipped() {
        let parsed = parse_version_file(1, "page_001_vdraft.png");
        assert!(matches!(
            parsed,
            NameParse::Skipped {
                reason: SkipReason::VersionNotNumeric { .. }
            }
        ));
        // The first `_v` wins, even when a later one would parse.
        assert!(matches!(
            parse_version_file(1, "page_vx_v3.png"),
            NameParse::Skipped { .. }
        ));
    }

    #[test]
    fn mismatching_name_is_skipped() {
        assert!(matches!(
            parse_version_file(1, "thumbnail.png"),
            NameParse::Skipped {
                reason: SkipReason::PatternMismatch { .. }
            }
        ));
    }

    #[test]
    fn output_name_is_zero_padded_to_two_digits() {
        assert_eq!(output_file_name(1, 1), "page-01-v1.jpg");
        assert_eq!(output_file_name(2, 3), "page-02-v3.jpg");
        assert_eq!(output_file_name(12, 40), "page-12-v40.jpg");
        assert_eq!(output_file_name(123, 2), "page-123-v2.jpg");
    }

    #[test]
    fn skip_reason_display_names_the_entry() {
        let r = SkipReason::VersionNotNumeric {
            file: "page_1_vX.png".into(),
        };
        assert!(r.to_string().contains("page_1_vX.png"));
    }
}
