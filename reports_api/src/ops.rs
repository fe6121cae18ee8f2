use async_trait::async_trait;
use core_types::{FilterState, ReportFormat};

use crate::ApiError;

/// Trait over the report backend operations to enable testing
#[async_trait]
pub trait SchoolReportsApi: Send + Sync {
    /// Fetch the selectable schools
    async fn list_schools(&self) -> Result<Vec<String>, ApiError>;

    /// Fetch the selectable academic years
    async fn list_current_academic_years(&self) -> Result<Vec<String>, ApiError>;

    /// Fetch the semesters belonging to the given academic year
    async fn list_semesters(&self, current_ay: &str) -> Result<Vec<String>, ApiError>;

    /// Fetch the departments belonging to the given school
    async fn list_departments(&self, school: &str) -> Result<Vec<String>, ApiError>;

    /// Generate the full school report and return the rendered file as bytes
    async fn request_full_report(
        &self,
        filters: &FilterState,
        format: ReportFormat,
    ) -> Result<Vec<u8>, ApiError>;

    /// Generate the negative comments spreadsheet and return it as bytes
    async fn request_negative_comments_report(
        &self,
        filters: &FilterState,
    ) -> Result<Vec<u8>, ApiError>;
}
