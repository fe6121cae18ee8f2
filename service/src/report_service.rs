use std::path::{Path, PathBuf};
use std::sync::Arc;

use core_types::{FilterState, ReportFormat};
use reports_api::ops::SchoolReportsApi;

use crate::error::Error;
use crate::report_file;

/// Runs the report producing actions against the backend and writes the
/// returned payload to disk.
///
/// Filters are taken by value: a report request keeps the selection it was
/// invoked with even when the user keeps changing filters while the request
/// is in flight.
#[derive(Clone)]
pub struct ReportService {
    api: Arc<dyn SchoolReportsApi>,
}

impl ReportService {
    pub fn new(api: Arc<dyn SchoolReportsApi>) -> Self {
        Self { api }
    }

    /// Generate the full school report in the requested format and save it
    /// as `<sanitized school>_school_report.<ext>` under `output_dir`.
    pub async fn generate_full_report(
        &self,
        filters: FilterState,
        format: ReportFormat,
        output_dir: &Path,
    ) -> Result<PathBuf, Error> {
        validate_filters(&filters)?;
        tracing::info!(school = %filters.school, ?format, "Generating full school report");
        let payload = self.api.request_full_report(&filters, format).await?;
        let file_name = report_file::full_report_file_name(&filters.school, format);
        report_file::write_report(output_dir, &file_name, &payload).await
    }

    /// Generate the negative comments spreadsheet and save it as
    /// `<sanitized school>_negative_comments_report.xlsx` under `output_dir`.
    ///
    /// A technically successful but zero length response is rejected, the
    /// server produces one when no negative comments exist for the
    /// selection.
    pub async fn generate_negative_comments_report(
        &self,
        filters: FilterState,
        output_dir: &Path,
    ) -> Result<PathBuf, Error> {
        validate_filters(&filters)?;
        tracing::info!(school = %filters.school, "Generating negative comments report");
        let payload = self.api.request_negative_comments_report(&filters).await?;
        if payload.is_empty() {
            return Err(Error::EmptyReport);
        }
        let file_name = report_file::negative_comments_file_name(&filters.school);
        report_file::write_report(output_dir, &file_name, &payload).await
    }
}

fn validate_filters(filters: &FilterState) -> Result<(), Error> {
    if filters.is_complete() {
        Ok(())
    } else {
        Err(Error::ValidationError(
            "Please select Current Academic Year, Semester, and School.".to_string(),
        ))
    }
}
