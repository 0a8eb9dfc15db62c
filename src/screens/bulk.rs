//! ZIP chapter upload and its result log.

use crate::api::ApiClient;
use crate::error::{AppError, Result};
use crate::models::BulkUploadReport;
use crate::notice::Notice;
use std::fmt;
use std::fs::File;
use std::path::Path;

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Chapters were published.
    Success,
    /// Something was rejected.
    Error,
}

/// One line of the upload log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Severity.
    pub level: LogLevel,
    /// Text.
    pub text: String,
}

impl LogLine {
    fn success(text: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Error,
            text: text.into(),
        }
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.level {
            LogLevel::Success => "✅",
            LogLevel::Error => "❌",
        };
        write!(f, "{} {}", marker, self.text)
    }
}

/// Log for a completed upload: a headline, then every server error in order.
pub fn render_report(report: &BulkUploadReport) -> Vec<LogLine> {
    let headline = if report.success_count > 0 {
        LogLine::success(format!(
            "Added {} chapters successfully.",
            report.success_count
        ))
    } else {
        LogLine::error("No valid chapters found.")
    };

    std::iter::once(headline)
        .chain(report.errors.iter().cloned().map(LogLine::error))
        .collect()
}

/// Log for a request that failed outright.
pub fn render_failure(error: &AppError) -> Vec<LogLine> {
    vec![LogLine::error(
        error.user_message("An error occurred during upload"),
    )]
}

/// File entries of a local ZIP archive.
///
/// Fails for anything that is not a readable ZIP, and for an archive with no
/// files.
pub fn inspect_archive(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let archive = zip::ZipArchive::new(file)?;

    let names: Vec<String> = archive
        .file_names()
        .filter(|name| !name.ends_with('/'))
        .filter(|name| !name.contains("__MACOSX"))
        .map(String::from)
        .collect();

    if names.is_empty() {
        return Err(AppError::InvalidInput("The ZIP file is empty".to_string()));
    }
    Ok(names)
}

/// Upload `zip_path` to `novel_id`, returning the log and a summary notice.
pub async fn upload(api: &ApiClient, novel_id: &str, zip_path: &Path) -> (Vec<LogLine>, Notice) {
    if novel_id.trim().is_empty() {
        let notice = Notice::error("Select a novel first");
        return (Vec::new(), notice);
    }

    let entries = match inspect_archive(zip_path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %zip_path.display(), error = %e, "Rejected archive");
            return (render_failure(&e), Notice::error("Select a ZIP file"));
        }
    };
    tracing::info!(novel_id, files = entries.len(), "Uploading chapter archive");

    match api.bulk_upload(novel_id, zip_path).await {
        Ok(report) => {
            let notice = if report.success_count > 0 {
                Notice::success(format!(
                    "Published {} chapters",
                    report.success_count
                ))
            } else {
                Notice::error("No chapters were added")
            };
            tracing::info!(
                success = report.success_count,
                errors = report.errors.len(),
                "Bulk upload finished"
            );
            (render_report(&report), notice)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Bulk upload failed");
            let lines = render_failure(&e);
            let notice = Notice::error(lines[0].text.clone());
            (lines, notice)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    #[test]
    fn test_success_headline_then_errors_in_order() {
        let report = BulkUploadReport {
            success_count: 3,
            errors: vec!["2.txt: duplicate".to_string(), "9.txt: empty".to_string()],
        };
        let lines = render_report(&report);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].level, LogLevel::Success);
        assert!(lines[0].text.contains('3'));
        assert_eq!(lines[1], LogLine::error("2.txt: duplicate"));
        assert_eq!(lines[2], LogLine::error("9.txt: empty"));
    }

    #[test]
    fn test_zero_success_is_error_headline() {
        let report = BulkUploadReport {
            success_count: 0,
            errors: vec!["bad.txt".to_string()],
        };
        let lines = render_report(&report);
        assert_eq!(lines[0], LogLine::error("No valid chapters found."));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_failure_uses_server_message() {
        let err = AppError::Api {
            status: reqwest::StatusCode::BAD_REQUEST,
            message: "Novel not found".to_string(),
        };
        assert_eq!(render_failure(&err), vec![LogLine::error("Novel not found")]);

        let err = AppError::NotAuthenticated;
        assert_eq!(
            render_failure(&err),
            vec![LogLine::error("An error occurred during upload")]
        );
    }

    #[test]
    fn test_inspect_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chapters.zip");

        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
        writer.start_file("1.txt", options).unwrap();
        writer.write_all(b"Chapter one").unwrap();
        writer.start_file("2.txt", options).unwrap();
        writer.write_all(b"Chapter two").unwrap();
        writer.finish().unwrap();

        let mut names = inspect_archive(&path).unwrap();
        names.sort();
        assert_eq!(names, vec!["1.txt".to_string(), "2.txt".to_string()]);

        let not_zip = dir.path().join("notes.txt");
        std::fs::write(&not_zip, "plain text").unwrap();
        assert!(inspect_archive(&not_zip).is_err());
    }
}
