//! Discovery: walk `<source>/<NNN-name>/` folders and collect version files.
//!
//! Only the immediate subdirectories of the source root are visited. Folders
//! are processed in lexicographic order and files within a folder likewise,
//! so two runs over the same tree always report files in the same order.

use crate::error::PreviewError;
use crate::pipeline::naming::{self, NameParse, SkipReason};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// One source PNG that follows the naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFile {
    /// Page number, taken from the enclosing folder.
    pub page: u32,
    /// Version number, taken from the `_v<N>` segment.
    pub version: u32,
    /// Full path of the source PNG.
    pub source_path: PathBuf,
    /// `page-NN-vN.jpg`.
    pub output_name: String,
}

impl VersionFile {
    /// File name of the source, for messages.
    pub fn source_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Modification time of the source PNG.
    pub fn source_modified(&self) -> std::io::Result<SystemTime> {
        std::fs::metadata(&self.source_path)?.modified()
    }
}

/// Everything the scan found.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    /// Convertible files, in folder order then file-name order.
    pub files: Vec<VersionFile>,
    /// Folders and candidate files left out because of their names.
    pub ignored: Vec<SkipReason>,
}

/// Scan `source_dir` for version files.
///
/// Name mismatches and unreadable page folders are recorded in
/// [`ScanReport::ignored`], never returned as errors. Only a source root that
/// cannot be listed aborts the scan.
pub fn scan(source_dir: &Path) -> Result<ScanReport, PreviewError> {
    let mut report = ScanReport::default();

    for folder in sorted_entries(source_dir)? {
        if !folder.is_dir() {
            continue;
        }
        let folder_name = file_name_of(&folder);
        let page = match naming::parse_page_folder(&folder_name) {
            Ok(page) => page,
            Err(reason) => {
                debug!("Ignoring {}", reason);
                report.ignored.push(reason);
                continue;
            }
        };

        scan_page_folder(&folder, folder_name, page, &mut report);
    }

    warn_on_collisions(&report.files);
    debug!(
        "Scan found {} version files, ignored {} entries",
        report.files.len(),
        report.ignored.len()
    );
    Ok(report)
}

/// Collect the version files of one page folder into `report`.
fn scan_page_folder(folder: &Path, folder_name: String, page: u32, report: &mut ScanReport) {
    let entries = match sorted_entries(folder) {
        Ok(entries) => entries,
        Err(e) => {
            let reason = SkipReason::FolderUnreadable {
                folder: folder_name,
                detail: e.to_string(),
            };
            warn!("Ignoring {}", reason);
            report.ignored.push(reason);
            return;
        }
    };

    for path in entries {
        let file_name = file_name_of(&path);
        if !naming::is_version_file_candidate(&file_name) || !path.is_file() {
            continue;
        }
        match naming::parse_version_file(page, &file_name) {
            NameParse::Parsed { page, version } => report.files.push(VersionFile {
                page,
                version,
                output_name: naming::output_file_name(page, version),
                source_path: path,
            }),
            NameParse::Skipped { reason } => {
                debug!("Ignoring {}", reason);
                report.ignored.push(reason);
            }
        }
    }
}

/// Two sources mapping to one preview: the later one overwrites the earlier.
fn warn_on_collisions(files: &[VersionFile]) {
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    for f in files {
        if let Some(first) = seen.insert(&f.output_name, &f.source_path) {
            warn!(
                "{} and {} both map to {}; the later file wins",
                first.display(),
                f.source_path.display(),
                f.output_name
            );
        }
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, PreviewError> {
    let read_err = |e| PreviewError::ReadDirFailed {
        path: dir.to_path_buf(),
        source: e,
    };
    let mut entries = std::fs::read_dir(dir)
        .map_err(read_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?;
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let p = dir.join(rel);
        std::fs::create_dir_all(p.parent().unwrap()).unwrap();
        std::fs::write(p, b"").unwrap();
    }

    #[test]
    fn finds_files_in_numeric_folders_in_order() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "002-page2/page_002_v1.png");
        touch(tmp.path(), "001-page1/page_001_v2.png");
        touch(tmp.path(), "001-page1/page_001_v1.png");

        let report = scan(tmp.path()).unwrap();
        let names: Vec<_> = report.files.iter().map(|f| f.output_name.as_str()).collect();
        assert_eq!(names, ["page-01-v1.jpg", "page-01-v2.jpg", "page-02-v1.jpg"]);
        assert!(report.ignored.is_empty());
    }

    #[test]
    fn non_numeric_folder_contents_are_ignored() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "abc-foo/page_001_v1.png");

        let report = scan(tmp.path()).unwrap();
        assert!(report.files.is_empty());
        assert_eq!(
            report.ignored,
            vec![SkipReason::FolderPrefixNotNumeric {
                folder: "abc-foo".into()
            }]
        );
    }

    #[test]
    fn unrelated_files_are_not_counted() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "001-page1/notes.txt");
        touch(tmp.path(), "001-page1/page_001_vX.png");
        touch(tmp.path(), "loose_file.png");

        let report = scan(tmp.path()).unwrap();
        assert!(report.files.is_empty());
        assert_eq!(report.ignored.len(), 1);
    }

    #[test]
    fn directories_named_like_versions_are_skipped() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("001-page1/page_001_v1.png")).unwrap();

        let report = scan(tmp.path()).unwrap();
        assert!(report.files.is_empty());
    }

    #[test]
    fn unreadable_page_folder_is_ignored_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut report = ScanReport::default();

        scan_page_folder(&tmp.path().join("003-gone"), "003-gone".into(), 3, &mut report);

        assert!(report.files.is_empty());
        assert!(matches!(
            report.ignored.as_slice(),
            [SkipReason::FolderUnreadable { folder, .. }] if folder == "003-gone"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn locked_page_folder_does_not_hide_other_pages() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "001-page1/page_001_v1.png");
        touch(tmp.path(), "002-locked/page_002_v1.png");
        let locked = tmp.path().join("002-locked");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
        // Running as root bypasses directory permissions.
        let listable = std::fs::read_dir(&locked).is_ok();

        let report = scan(tmp.path());
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        let report = report.unwrap();

        assert_eq!(report.files[0].output_name, "page-01-v1.jpg");
        if !listable {
            assert_eq!(report.files.len(), 1);
            assert!(matches!(
                report.ignored.as_slice(),
                [SkipReason::FolderUnreadable { .. }]
            ));
        }
    }

    #[test]
    fn missing_root_is_a_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = scan(&tmp.path().join("missing")).unwrap_err();
        assert!(matches!(err, PreviewError::ReadDirFailed { .. }));
    }
}
