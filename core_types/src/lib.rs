use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// The three dependent report filters.
///
/// `semester` is meaningful only when `current_ay` is set; changing an
/// upstream filter clears everything below it. The field is serialized as
/// `currentAY` because that is the key the report server expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub school: String,
    #[serde(rename = "currentAY")]
    pub current_ay: String,
    pub semester: String,
}

impl FilterState {
    pub fn is_complete(&self) -> bool {
        !self.school.is_empty() && !self.current_ay.is_empty() && !self.semester.is_empty()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    #[strum(serialize = "Excel (Multiple Sheets)")]
    Excel,
    #[strum(serialize = "PDF (Multiple Pages)")]
    Pdf,
}

impl ReportFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            ReportFormat::Excel => "xlsx",
            ReportFormat::Pdf => "pdf",
        }
    }
}

/// Lifecycle of one report generation action. The full report and the
/// negative comments report each carry their own status so one can run while
/// the other is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

impl OperationStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, OperationStatus::InFlight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_state_is_complete() {
        let mut filters = FilterState::default();
        assert!(!filters.is_complete());

        filters.school = "School of Engineering".to_string();
        filters.current_ay = "2023-2024".to_string();
        assert!(!filters.is_complete());

        filters.semester = "Odd".to_string();
        assert!(filters.is_complete());
    }

    #[test]
    fn test_filter_state_wire_keys() {
        let filters = FilterState {
            school: "School of Engineering".to_string(),
            current_ay: "2023-2024".to_string(),
            semester: "Odd".to_string(),
        };
        let value = serde_json::to_value(&filters).unwrap();
        assert_eq!(value["school"], "School of Engineering");
        assert_eq!(value["currentAY"], "2023-2024");
        assert_eq!(value["semester"], "Odd");
    }

    #[test]
    fn test_report_format_wire_value() {
        assert_eq!(
            serde_json::to_value(ReportFormat::Excel).unwrap(),
            serde_json::json!("excel")
        );
        assert_eq!(
            serde_json::to_value(ReportFormat::Pdf).unwrap(),
            serde_json::json!("pdf")
        );
    }

    #[test]
    fn test_report_format_file_extension() {
        assert_eq!(ReportFormat::Excel.file_extension(), "xlsx");
        assert_eq!(ReportFormat::Pdf.file_extension(), "pdf");
    }

    #[test]
    fn test_report_format_default_is_excel() {
        assert_eq!(ReportFormat::default(), ReportFormat::Excel);
    }
}
