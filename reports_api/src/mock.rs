use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use core_types::{FilterState, ReportFormat};

use crate::ApiError;
use crate::ops::SchoolReportsApi;

/// Internal state for MockSchoolReportsApi.
///
/// Groups all mutable state into a single struct for simplified locking.
#[derive(Default)]
struct MockState {
    schools: Vec<String>,
    academic_years: Vec<String>,
    /// Semesters keyed by academic year
    semesters: HashMap<String, Vec<String>>,
    /// Departments keyed by school
    departments: HashMap<String, Vec<String>>,
    full_report_payload: Vec<u8>,
    negative_comments_payload: Vec<u8>,
    /// Errors to return instead of data, per operation
    fail_schools: Option<ApiError>,
    fail_academic_years: Option<ApiError>,
    fail_semesters: Option<ApiError>,
    fail_departments: Option<ApiError>,
    fail_full_report: Option<ApiError>,
    fail_negative_comments: Option<ApiError>,
    /// Recorded calls, in invocation order
    school_list_calls: u32,
    academic_year_list_calls: u32,
    semester_list_calls: Vec<String>,
    department_list_calls: Vec<String>,
    full_report_calls: Vec<(FilterState, ReportFormat)>,
    negative_comments_calls: Vec<FilterState>,
}

/// Mock implementation of SchoolReportsApi for testing
///
/// This mock allows you to:
/// - Script the option lists and report payloads per filter value
/// - Test failure scenarios per operation
/// - Verify which requests were issued, and with what arguments
#[derive(Clone, Default)]
pub struct MockSchoolReportsApi {
    state: Arc<Mutex<MockState>>,
}

impl MockSchoolReportsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_schools(&self, schools: Vec<String>) {
        self.state.lock().unwrap().schools = schools;
    }

    pub fn set_academic_years(&self, academic_years: Vec<String>) {
        self.state.lock().unwrap().academic_years = academic_years;
    }

    pub fn set_semesters_for(&self, current_ay: impl Into<String>, semesters: Vec<String>) {
        let mut state = self.state.lock().unwrap();
        state.semesters.insert(current_ay.into(), semesters);
    }

    pub fn set_departments_for(&self, school: impl Into<String>, departments: Vec<String>) {
        let mut state = self.state.lock().unwrap();
        state.departments.insert(school.into(), departments);
    }

    pub fn set_full_report_payload(&self, payload: Vec<u8>) {
        self.state.lock().unwrap().full_report_payload = payload;
    }

    pub fn set_negative_comments_payload(&self, payload: Vec<u8>) {
        self.state.lock().unwrap().negative_comments_payload = payload;
    }

    pub fn fail_schools_with(&self, error: ApiError) {
        self.state.lock().unwrap().fail_schools = Some(error);
    }

    pub fn fail_academic_years_with(&self, error: ApiError) {
        self.state.lock().unwrap().fail_academic_years = Some(error);
    }

    pub fn fail_semesters_with(&self, error: ApiError) {
        self.state.lock().unwrap().fail_semesters = Some(error);
    }

    pub fn fail_departments_with(&self, error: ApiError) {
        self.state.lock().unwrap().fail_departments = Some(error);
    }

    pub fn fail_full_report_with(&self, error: ApiError) {
        self.state.lock().unwrap().fail_full_report = Some(error);
    }

    pub fn fail_negative_comments_with(&self, error: ApiError) {
        self.state.lock().unwrap().fail_negative_comments = Some(error);
    }

    pub fn school_list_calls(&self) -> u32 {
        self.state.lock().unwrap().school_list_calls
    }

    pub fn academic_year_list_calls(&self) -> u32 {
        self.state.lock().unwrap().academic_year_list_calls
    }

    /// Academic years the semester list was requested for, in order
    pub fn semester_list_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().semester_list_calls.clone()
    }

    /// Schools the department list was requested for, in order
    pub fn department_list_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().department_list_calls.clone()
    }

    pub fn full_report_calls(&self) -> Vec<(FilterState, ReportFormat)> {
        self.state.lock().unwrap().full_report_calls.clone()
    }

    pub fn negative_comments_calls(&self) -> Vec<FilterState> {
        self.state.lock().unwrap().negative_comments_calls.clone()
    }

    /// Total number of requests issued against the mock
    pub fn request_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.school_list_calls as usize
            + state.academic_year_list_calls as usize
            + state.semester_list_calls.len()
            + state.department_list_calls.len()
            + state.full_report_calls.len()
            + state.negative_comments_calls.len()
    }
}

#[async_trait]
impl SchoolReportsApi for MockSchoolReportsApi {
    async fn list_schools(&self) -> Result<Vec<String>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.school_list_calls += 1;
        if let Some(error) = &state.fail_schools {
            return Err(error.clone());
        }
        Ok(state.schools.clone())
    }

    async fn list_current_academic_years(&self) -> Result<Vec<String>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.academic_year_list_calls += 1;
        if let Some(error) = &state.fail_academic_years {
            return Err(error.clone());
        }
        Ok(state.academic_years.clone())
    }

    async fn list_semesters(&self, current_ay: &str) -> Result<Vec<String>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.semester_list_calls.push(current_ay.to_string());
        if let Some(error) = &state.fail_semesters {
            return Err(error.clone());
        }
        Ok(state.semesters.get(current_ay).cloned().unwrap_or_default())
    }

    async fn list_departments(&self, school: &str) -> Result<Vec<String>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.department_list_calls.push(school.to_string());
        if let Some(error) = &state.fail_departments {
            return Err(error.clone());
        }
        Ok(state.departments.get(school).cloned().unwrap_or_default())
    }

    async fn request_full_report(
        &self,
        filters: &FilterState,
        format: ReportFormat,
    ) -> Result<Vec<u8>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.full_report_calls.push((filters.clone(), format));
        if let Some(error) = &state.fail_full_report {
            return Err(error.clone());
        }
        Ok(state.full_report_payload.clone())
    }

    async fn request_negative_comments_report(
        &self,
        filters: &FilterState,
    ) -> Result<Vec<u8>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.negative_comments_calls.push(filters.clone());
        if let Some(error) = &state.fail_negative_comments {
            return Err(error.clone());
        }
        Ok(state.negative_comments_payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[async_std::test]
    async fn test_mock_list_schools() {
        let mock = MockSchoolReportsApi::new();
        mock.set_schools(vec!["School of Engineering".to_string()]);

        let schools = mock.list_schools().await.unwrap();

        assert_eq!(schools, vec!["School of Engineering".to_string()]);
        assert_eq!(mock.school_list_calls(), 1);
    }

    #[async_std::test]
    async fn test_mock_list_schools_failure() {
        let mock = MockSchoolReportsApi::new();
        mock.fail_schools_with(ApiError::HttpStatus {
            status: 500,
            message: "boom".to_string(),
        });

        let result = mock.list_schools().await;

        assert!(result.is_err());
        assert_eq!(mock.school_list_calls(), 1);
    }

    #[async_std::test]
    async fn test_mock_records_scoped_list_calls() {
        let mock = MockSchoolReportsApi::new();
        mock.set_semesters_for("2023-2024", vec!["Odd".to_string(), "Even".to_string()]);

        let semesters = mock.list_semesters("2023-2024").await.unwrap();
        let unknown = mock.list_semesters("2024-2025").await.unwrap();

        assert_eq!(semesters.len(), 2);
        assert!(unknown.is_empty());
        assert_eq!(
            mock.semester_list_calls(),
            vec!["2023-2024".to_string(), "2024-2025".to_string()]
        );
    }

    #[async_std::test]
    async fn test_mock_records_report_requests() {
        let mock = MockSchoolReportsApi::new();
        mock.set_full_report_payload(vec![1, 2, 3]);
        let filters = FilterState {
            school: "School of Engineering".to_string(),
            current_ay: "2023-2024".to_string(),
            semester: "Odd".to_string(),
        };

        let payload = mock
            .request_full_report(&filters, ReportFormat::Pdf)
            .await
            .unwrap();

        assert_eq!(payload, vec![1, 2, 3]);
        assert_eq!(mock.full_report_calls(), vec![(filters, ReportFormat::Pdf)]);
        assert_eq!(mock.request_count(), 1);
    }
}
