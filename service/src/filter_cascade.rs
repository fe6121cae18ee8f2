use core_types::FilterState;
use reports_api::ApiError;

/// Freshness of one option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// The selectable values for one filter dimension.
///
/// Values are cleared the moment a new fetch begins, so a dimension never
/// shows options that belong to a previous upstream selection.
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    values: Vec<String>,
    status: FetchStatus,
}

impl OptionSet {
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    fn begin_fetch(&mut self) {
        self.values.clear();
        self.status = FetchStatus::Loading;
    }

    fn reset(&mut self) {
        self.values.clear();
        self.status = FetchStatus::Idle;
    }

    fn apply(&mut self, result: Result<Vec<String>, ApiError>) {
        match result {
            Ok(values) => {
                self.values = values;
                self.status = FetchStatus::Ready;
            }
            Err(e) => {
                tracing::error!("Option fetch failed: {}", e);
                self.values.clear();
                self.status = FetchStatus::Failed;
            }
        }
    }
}

/// Identifies one in-flight option fetch. A fetch result is applied only
/// while its token is still the latest issued for that dimension, which
/// makes rapid re-selection last-write-wins regardless of response order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

/// Outcome of changing an upstream filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeChange {
    /// The value did not change, nothing to do.
    Unchanged,
    /// The filter was cleared; dependent state was reset without a fetch.
    Cleared,
    /// The filter was set; a dependent fetch was started under this token.
    Fetch(FetchToken),
}

impl CascadeChange {
    pub fn fetch_token(&self) -> Option<FetchToken> {
        match self {
            CascadeChange::Fetch(token) => Some(*token),
            _ => None,
        }
    }
}

/// The dependent filter state machine behind the report panel.
///
/// Owns the filter selections and the option list of every dimension.
/// Changing an upstream filter clears everything that depends on it and
/// hands out a fetch token for the dependent option list; the caller runs
/// the actual request and feeds the result back through `apply_*`. The
/// tokens guarantee that a slow, superseded response cannot overwrite state
/// that belongs to a newer selection.
#[derive(Debug, Default)]
pub struct FilterCascade {
    filters: FilterState,
    schools: OptionSet,
    academic_years: OptionSet,
    semesters: OptionSet,
    departments: OptionSet,
    schools_token: u64,
    academic_years_token: u64,
    semesters_token: u64,
    departments_token: u64,
}

impl FilterCascade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Filter values captured for a report request. Cloned on purpose so an
    /// in-flight report keeps the selection it was invoked with.
    pub fn snapshot(&self) -> FilterState {
        self.filters.clone()
    }

    pub fn schools(&self) -> &OptionSet {
        &self.schools
    }

    pub fn academic_years(&self) -> &OptionSet {
        &self.academic_years
    }

    pub fn semesters(&self) -> &OptionSet {
        &self.semesters
    }

    pub fn departments(&self) -> &OptionSet {
        &self.departments
    }

    /// Start the initial school and academic year fetches. The two lists
    /// have no ordering dependency, so both tokens are issued at once.
    pub fn initialize(&mut self) -> (FetchToken, FetchToken) {
        self.schools.begin_fetch();
        self.academic_years.begin_fetch();
        self.schools_token += 1;
        self.academic_years_token += 1;
        (
            FetchToken(self.schools_token),
            FetchToken(self.academic_years_token),
        )
    }

    /// Select a school. Clears the academic year and semester selections and
    /// the option lists depending on them; a non-empty value starts a
    /// department fetch.
    pub fn set_school(&mut self, value: &str) -> CascadeChange {
        if self.filters.school == value {
            return CascadeChange::Unchanged;
        }
        tracing::info!("School changed to {:?}", value);
        self.filters.school = value.to_string();
        self.filters.current_ay.clear();
        self.filters.semester.clear();
        self.reset_semesters();
        if value.is_empty() {
            self.reset_departments();
            CascadeChange::Cleared
        } else {
            self.departments.begin_fetch();
            self.departments_token += 1;
            CascadeChange::Fetch(FetchToken(self.departments_token))
        }
    }

    /// Select an academic year. Clears the semester selection and its
    /// option list; a non-empty value starts a semester fetch.
    pub fn set_current_ay(&mut self, value: &str) -> CascadeChange {
        if self.filters.current_ay == value {
            return CascadeChange::Unchanged;
        }
        tracing::info!("Academic year changed to {:?}", value);
        self.filters.current_ay = value.to_string();
        self.filters.semester.clear();
        if value.is_empty() {
            self.reset_semesters();
            CascadeChange::Cleared
        } else {
            self.semesters.begin_fetch();
            self.semesters_token += 1;
            CascadeChange::Fetch(FetchToken(self.semesters_token))
        }
    }

    /// Select a semester. Leaf level, no downstream effects. Ignored while
    /// no academic year is selected, a semester is only meaningful within
    /// one.
    pub fn set_semester(&mut self, value: &str) {
        if self.filters.current_ay.is_empty() && !value.is_empty() {
            tracing::warn!("Ignoring semester selection without an academic year");
            return;
        }
        self.filters.semester = value.to_string();
    }

    pub fn apply_schools(&mut self, token: FetchToken, result: Result<Vec<String>, ApiError>) -> bool {
        if token.0 != self.schools_token {
            tracing::debug!("Dropping stale school list response");
            return false;
        }
        self.schools.apply(result);
        true
    }

    pub fn apply_academic_years(
        &mut self,
        token: FetchToken,
        result: Result<Vec<String>, ApiError>,
    ) -> bool {
        if token.0 != self.academic_years_token {
            tracing::debug!("Dropping stale academic year list response");
            return false;
        }
        self.academic_years.apply(result);
        true
    }

    pub fn apply_semesters(
        &mut self,
        token: FetchToken,
        result: Result<Vec<String>, ApiError>,
    ) -> bool {
        if token.0 != self.semesters_token {
            tracing::debug!("Dropping stale semester list response");
            return false;
        }
        self.semesters.apply(result);
        true
    }

    pub fn apply_departments(
        &mut self,
        token: FetchToken,
        result: Result<Vec<String>, ApiError>,
    ) -> bool {
        if token.0 != self.departments_token {
            tracing::debug!("Dropping stale department list response");
            return false;
        }
        self.departments.apply(result);
        true
    }

    fn reset_semesters(&mut self) {
        self.semesters.reset();
        // invalidate any semester fetch still in flight
        self.semesters_token += 1;
    }

    fn reset_departments(&mut self) {
        self.departments.reset();
        // invalidate any department fetch still in flight
        self.departments_token += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn cascade_with_selection() -> FilterCascade {
        let mut cascade = FilterCascade::new();
        let token = cascade.set_school("School of Engineering").fetch_token().unwrap();
        cascade.apply_departments(token, Ok(strings(&["CSE", "ECE"])));
        let token = cascade.set_current_ay("2023-2024").fetch_token().unwrap();
        cascade.apply_semesters(token, Ok(strings(&["Odd", "Even"])));
        cascade.set_semester("Odd");
        cascade
    }

    #[test]
    fn test_initialize_starts_both_fetches() {
        let mut cascade = FilterCascade::new();

        let (schools_token, ay_token) = cascade.initialize();

        assert!(cascade.schools().is_loading());
        assert!(cascade.academic_years().is_loading());

        assert!(cascade.apply_schools(schools_token, Ok(strings(&["School of Engineering"]))));
        assert!(cascade.apply_academic_years(ay_token, Ok(strings(&["2023-2024"]))));
        assert_eq!(cascade.schools().status(), FetchStatus::Ready);
        assert_eq!(cascade.schools().values(), &["School of Engineering".to_string()]);
        assert_eq!(cascade.academic_years().values(), &["2023-2024".to_string()]);
    }

    #[test]
    fn test_set_school_clears_dependents() {
        let mut cascade = cascade_with_selection();

        let change = cascade.set_school("School of Business");

        assert!(matches!(change, CascadeChange::Fetch(_)));
        assert_eq!(cascade.filters().school, "School of Business");
        assert!(cascade.filters().current_ay.is_empty());
        assert!(cascade.filters().semester.is_empty());
        assert!(cascade.semesters().values().is_empty());
        assert_eq!(cascade.semesters().status(), FetchStatus::Idle);
        assert!(cascade.departments().is_loading());
        assert!(cascade.departments().values().is_empty());
    }

    #[test]
    fn test_clearing_school_resets_departments_without_fetch() {
        let mut cascade = cascade_with_selection();

        let change = cascade.set_school("");

        assert_eq!(change, CascadeChange::Cleared);
        assert!(cascade.filters().school.is_empty());
        assert!(cascade.filters().current_ay.is_empty());
        assert!(cascade.filters().semester.is_empty());
        assert!(cascade.departments().values().is_empty());
        assert_eq!(cascade.departments().status(), FetchStatus::Idle);
    }

    #[test]
    fn test_set_current_ay_clears_semester_only() {
        let mut cascade = cascade_with_selection();

        let change = cascade.set_current_ay("2024-2025");

        assert!(matches!(change, CascadeChange::Fetch(_)));
        assert_eq!(cascade.filters().school, "School of Engineering");
        assert_eq!(cascade.filters().current_ay, "2024-2025");
        assert!(cascade.filters().semester.is_empty());
        assert!(cascade.semesters().is_loading());
        // departments belong to the school and stay untouched
        assert_eq!(cascade.departments().values().len(), 2);
    }

    #[test]
    fn test_clearing_ay_resets_semesters_without_fetch() {
        let mut cascade = cascade_with_selection();

        let change = cascade.set_current_ay("");

        assert_eq!(change, CascadeChange::Cleared);
        assert!(cascade.filters().semester.is_empty());
        assert!(cascade.semesters().values().is_empty());
        assert_eq!(cascade.semesters().status(), FetchStatus::Idle);
    }

    #[test]
    fn test_reselecting_same_school_is_a_no_op() {
        let mut cascade = cascade_with_selection();
        let before = cascade.snapshot();

        let change = cascade.set_school("School of Engineering");

        assert_eq!(change, CascadeChange::Unchanged);
        assert_eq!(cascade.snapshot(), before);
        assert_eq!(cascade.departments().values().len(), 2);
    }

    #[test]
    fn test_department_fetches_are_last_write_wins() {
        let mut cascade = FilterCascade::new();
        let first = cascade.set_school("School A").fetch_token().unwrap();
        let second = cascade.set_school("School B").fetch_token().unwrap();

        // the older response arrives first and must be dropped
        assert!(!cascade.apply_departments(first, Ok(strings(&["A1", "A2"]))));
        assert!(cascade.apply_departments(second, Ok(strings(&["B1"]))));

        assert_eq!(cascade.departments().values(), &["B1".to_string()]);
    }

    #[test]
    fn test_stale_response_after_newer_one_is_dropped() {
        let mut cascade = FilterCascade::new();
        let first = cascade.set_school("School A").fetch_token().unwrap();
        let second = cascade.set_school("School B").fetch_token().unwrap();

        // completion order reversed: the newer response lands first
        assert!(cascade.apply_departments(second, Ok(strings(&["B1"]))));
        assert!(!cascade.apply_departments(first, Ok(strings(&["A1", "A2"]))));

        assert_eq!(cascade.departments().values(), &["B1".to_string()]);
    }

    #[test]
    fn test_school_change_invalidates_in_flight_semester_fetch() {
        let mut cascade = FilterCascade::new();
        cascade.set_school("School A");
        let semester_token = cascade.set_current_ay("2023-2024").fetch_token().unwrap();

        cascade.set_school("School B");

        assert!(!cascade.apply_semesters(semester_token, Ok(strings(&["Odd"]))));
        assert!(cascade.semesters().values().is_empty());
    }

    #[test]
    fn test_clearing_school_invalidates_in_flight_department_fetch() {
        let mut cascade = FilterCascade::new();
        let token = cascade.set_school("School A").fetch_token().unwrap();

        cascade.set_school("");

        assert!(!cascade.apply_departments(token, Ok(strings(&["A1"]))));
        assert!(cascade.departments().values().is_empty());
    }

    #[test]
    fn test_failed_fetch_degrades_to_empty_options() {
        let mut cascade = FilterCascade::new();
        let token = cascade.set_school("School A").fetch_token().unwrap();

        cascade.apply_departments(
            token,
            Err(ApiError::MalformedResponse("not an array".to_string())),
        );

        assert_eq!(cascade.departments().status(), FetchStatus::Failed);
        assert!(cascade.departments().values().is_empty());

        // the cascade stays usable after a failed fetch
        let change = cascade.set_school("School B");
        assert!(matches!(change, CascadeChange::Fetch(_)));
        assert!(cascade.departments().is_loading());
    }

    #[test]
    fn test_semester_requires_academic_year() {
        let mut cascade = FilterCascade::new();
        cascade.set_school("School A");

        cascade.set_semester("Odd");

        assert!(cascade.filters().semester.is_empty());
    }

    #[test]
    fn test_semester_only_set_when_ay_present() {
        // property: after any setter sequence, a non-empty semester implies
        // a non-empty academic year
        let mut cascade = FilterCascade::new();
        cascade.set_school("School A");
        cascade.set_current_ay("2023-2024");
        cascade.set_semester("Odd");
        cascade.set_current_ay("");
        cascade.set_semester("Even");

        assert!(cascade.filters().current_ay.is_empty());
        assert!(cascade.filters().semester.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached_from_later_changes() {
        let mut cascade = cascade_with_selection();

        let snapshot = cascade.snapshot();
        cascade.set_school("School of Business");

        assert_eq!(snapshot.school, "School of Engineering");
        assert_eq!(snapshot.current_ay, "2023-2024");
        assert_eq!(snapshot.semester, "Odd");
    }
}
