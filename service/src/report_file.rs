use std::path::{Path, PathBuf};

use core_types::ReportFormat;

use crate::error::Error;

/// Replace every character outside `[A-Za-z0-9]` with an underscore so the
/// school name is safe to use in a filename.
pub fn sanitize_school_name(school: &str) -> String {
    school
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

pub fn full_report_file_name(school: &str, format: ReportFormat) -> String {
    format!(
        "{}_school_report.{}",
        sanitize_school_name(school),
        format.file_extension()
    )
}

pub fn negative_comments_file_name(school: &str) -> String {
    format!("{}_negative_comments_report.xlsx", sanitize_school_name(school))
}

/// Write a report payload into `output_dir` under `file_name` and return the
/// full path of the written file.
pub async fn write_report(
    output_dir: &Path,
    file_name: &str,
    payload: &[u8],
) -> Result<PathBuf, Error> {
    let path = output_dir.join(file_name);
    async_std::fs::write(&path, payload).await?;
    tracing::info!("Report written to {}", path.display());
    Ok(path)
}
