//! Per-login state and the queries built on it.
//!
//! A [`Session`] owns everything one signed-in user works with: their
//! profile, the shift store, the active vacation and their preferences.
//! Nothing here is global; callers create one session per login and drop or
//! [`Session::logout`] it when done.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::{
    Countdown, GridCell, MonthlyStats, TrailingReport, YearMonth, countdown, countdown_to,
    month_grid, monthly_stats, trailing_report,
};
use crate::config::ScheduleConfig;
use crate::error::{ScheduleError, ScheduleResult};
use crate::ics;
use crate::models::{
    ShiftPreference, ShiftRecord, UserProfile, VacationRecord, VacationType, validate_id,
};
use crate::store::ShiftStore;

/// The next shift and how long until it starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingShift {
    /// The shift record.
    pub shift: ShiftRecord,
    /// Time until its first entry starts.
    pub countdown: Countdown,
}

/// The active vacation and how long until it starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VacationStatus {
    /// The vacation.
    pub vacation: VacationRecord,
    /// Days in the vacation, both ends included.
    pub total_days: i64,
    /// Time until its first day.
    pub countdown: Countdown,
}

/// Everything belonging to one signed-in user.
///
/// # Example
///
/// ```
/// use shift_calendar::config::ScheduleConfig;
/// use shift_calendar::models::{Position, ShiftEntry, ShiftRecord, UserProfile};
/// use shift_calendar::session::Session;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let profile = UserProfile {
///     id: "u1".into(),
///     name: "Jan Kowalski".into(),
///     initials: String::new(),
///     email: "jan@example.com".into(),
///     company: String::new(),
///     phone: String::new(),
///     address: String::new(),
///     hourly_rate: Decimal::from(20),
/// };
/// let mut session = Session::new(profile, ScheduleConfig::default());
///
/// let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
/// let shift = ShiftRecord::single(
///     "s1",
///     NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
///     ShiftEntry::new("08:00 - 16:00".parse().unwrap(), Position::Kitchen),
///     "Main Street",
/// );
/// session.add_shift(shift, today).unwrap();
///
/// let next = session.next_shift(today.and_hms_opt(8, 0, 0).unwrap()).unwrap();
/// assert_eq!(next.countdown.days, 1);
/// assert_eq!(session.profile().initials, "JK");
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    profile: UserProfile,
    config: ScheduleConfig,
    store: ShiftStore,
    vacation: Option<VacationRecord>,
    preferences: Vec<ShiftPreference>,
}

impl Session {
    /// Starts a session for `profile` with an empty store.
    pub fn new(mut profile: UserProfile, config: ScheduleConfig) -> Self {
        profile.refresh_initials();
        Self {
            profile,
            config,
            store: ShiftStore::new(),
            vacation: None,
            preferences: Vec::new(),
        }
    }

    /// The signed-in user's profile.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// The configuration this session was started with.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// The shift store.
    pub fn store(&self) -> &ShiftStore {
        &self.store
    }

    /// Preferences in the order they were added.
    pub fn preferences(&self) -> &[ShiftPreference] {
        &self.preferences
    }

    /// The active vacation, if any.
    pub fn vacation(&self) -> Option<&VacationRecord> {
        self.vacation.as_ref()
    }

    /// A copy of every record, for saving.
    pub fn snapshot(&self) -> Vec<ShiftRecord> {
        self.store.records().to_vec()
    }

    /// Replaces the profile; initials are recomputed from the name.
    pub fn update_profile(&mut self, mut profile: UserProfile) {
        profile.refresh_initials();
        self.profile = profile;
    }

    /// Adds a shift dated today or later, replacing any shift on that date.
    ///
    /// Returns the replaced record. The id must be valid and not used by a
    /// shift on another date.
    pub fn add_shift(
        &mut self,
        record: ShiftRecord,
        today: NaiveDate,
    ) -> ScheduleResult<Option<ShiftRecord>> {
        ensure_not_past(record.date, today)?;
        validate_id(&record.id)?;
        debug!(id = %record.id, date = %record.date, "Adding shift");
        self.store.upsert(record)
    }

    /// Records a preference and adds the shift it implies.
    ///
    /// The derived shift takes the preference's id and the configured default
    /// location. Returns true when the store changed, i.e. for every kind
    /// except a day off.
    pub fn add_preference(
        &mut self,
        preference: ShiftPreference,
        today: NaiveDate,
    ) -> ScheduleResult<bool> {
        ensure_not_past(preference.date, today)?;
        preference.validate()?;

        let shift = preference.to_shift(
            preference.id.clone(),
            &self.config.calendar.default_location,
        );
        let changed = match shift {
            Some(record) => {
                self.store.upsert(record)?;
                true
            }
            None => false,
        };

        info!(id = %preference.id, date = %preference.date, kind = ?preference.kind, "Adding preference");
        self.preferences.push(preference);
        Ok(changed)
    }

    /// Validates and sets the vacation, replacing any previous one.
    pub fn set_vacation(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        kind: VacationType,
        today: NaiveDate,
    ) -> ScheduleResult<&VacationRecord> {
        let vacation = VacationRecord::new(start, end, kind, today)?;
        info!(start = %start, end = %end, kind = %kind, "Vacation set");
        Ok(self.vacation.insert(vacation))
    }

    /// Removes the vacation.
    pub fn clear_vacation(&mut self) -> Option<VacationRecord> {
        self.vacation.take()
    }

    /// Replaces the store with records pulled from the remote.
    pub fn replace_shifts(&mut self, records: Vec<ShiftRecord>) {
        self.store.replace_all(records);
        debug!(records = self.store.len(), "Shift store replaced");
    }

    /// Shifts dated in `month`.
    pub fn shifts_in_month(&self, month: YearMonth) -> &[ShiftRecord] {
        self.store.by_month(month)
    }

    /// The first shift dated on or after `now`'s date.
    ///
    /// The countdown runs to the start of its first entry, so a shift later
    /// today counts down in hours and one already started reads zero.
    pub fn next_shift(&self, now: NaiveDateTime) -> Option<UpcomingShift> {
        let shift = self.store.next_upcoming(now.date())?;
        let countdown = shift
            .starts_at()
            .map(|start| countdown_to(start, now))
            .unwrap_or(Countdown::ZERO);
        Some(UpcomingShift {
            shift: shift.clone(),
            countdown,
        })
    }

    /// The active vacation with a countdown to its first day.
    pub fn vacation_status(&self, now: NaiveDateTime) -> Option<VacationStatus> {
        let vacation = self.vacation.clone()?;
        Some(VacationStatus {
            total_days: vacation.total_days(),
            countdown: countdown(Some(vacation.start_date()), None, now),
            vacation,
        })
    }

    /// Statistics for `month` at the profile's hourly rate.
    pub fn monthly_stats(&self, month: YearMonth) -> MonthlyStats {
        monthly_stats(self.store.records(), month, self.profile.hourly_rate)
    }

    /// Statistics for the month containing `today` and the two before it.
    ///
    /// `None` when `today` lies outside the years a [`YearMonth`] supports.
    pub fn trailing_report(&self, today: NaiveDate) -> Option<TrailingReport> {
        let current = YearMonth::of(today)?;
        Some(trailing_report(
            self.store.records(),
            current,
            self.profile.hourly_rate,
        ))
    }

    /// The 42-cell calendar grid for `month`.
    pub fn month_grid(&self, month: YearMonth) -> Vec<GridCell> {
        month_grid(month, self.store.records())
    }

    /// The calendar document for the whole store, stamped with `stamp`.
    pub fn calendar_document_at(&self, stamp: NaiveDateTime) -> String {
        ics::generate_at(self.store.records(), &self.config.calendar, stamp)
    }

    /// The calendar document for the whole store, stamped now.
    pub fn calendar_document(&self) -> String {
        ics::generate(self.store.records(), &self.config.calendar)
    }

    /// Clears the store, the vacation and the preferences.
    pub fn logout(&mut self) {
        info!(user = %self.profile.id, "Session cleared");
        self.store.clear();
        self.vacation = None;
        self.preferences.clear();
    }
}

fn ensure_not_past(date: NaiveDate, today: NaiveDate) -> ScheduleResult<()> {
    if date < today {
        return Err(ScheduleError::DateInPast { date, today });
    }
    Ok(())
}

/// A random id for locally created records.
pub fn local_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, PreferenceKind, ShiftEntry};
    use rust_decimal::Decimal;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn at(date: &str, h: u32, m: u32) -> NaiveDateTime {
        make_date(date).and_hms_opt(h, m, 0).unwrap()
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            name: "anna nowak".to_string(),
            initials: String::new(),
            email: "anna@example.com".to_string(),
            company: String::new(),
            phone: String::new(),
            address: String::new(),
            hourly_rate: Decimal::from(20),
        }
    }

    fn session() -> Session {
        Session::new(profile(), ScheduleConfig::default())
    }

    fn shift(id: &str, date: &str, time: &str, position: Position) -> ShiftRecord {
        ShiftRecord::single(
            id,
            make_date(date),
            ShiftEntry::new(time.parse().unwrap(), position),
            "Main Street",
        )
    }

    fn preference(id: &str, date: &str, kind: PreferenceKind) -> ShiftPreference {
        ShiftPreference {
            id: id.to_string(),
            date: make_date(date),
            kind,
            position: Some(Position::Support),
        }
    }

    #[test]
    fn test_add_shift_in_past_is_rejected() {
        let mut session = session();
        let result = session.add_shift(
            shift("a", "2026-01-01", "08:00 - 16:00", Position::Kitchen),
            make_date("2026-01-02"),
        );
        assert!(matches!(result, Err(ScheduleError::DateInPast { .. })));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_add_shift_today_is_accepted() {
        let mut session = session();
        session
            .add_shift(
                shift("a", "2026-01-02", "08:00 - 16:00", Position::Kitchen),
                make_date("2026-01-02"),
            )
            .unwrap();
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_add_shift_with_line_break_in_id_is_rejected() {
        let mut session = session();
        let result = session.add_shift(
            shift("x\nSUMMARY:LOB", "2026-01-05", "08:00 - 16:00", Position::Kitchen),
            make_date("2026-01-01"),
        );
        assert!(matches!(result, Err(ScheduleError::InvalidId { .. })));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_add_shift_with_id_taken_on_other_date_is_rejected() {
        let mut session = session();
        let today = make_date("2026-01-01");
        session
            .add_shift(shift("a", "2026-01-05", "08:00 - 16:00", Position::Kitchen), today)
            .unwrap();

        let result =
            session.add_shift(shift("a", "2026-01-06", "08:00 - 16:00", Position::Lobby), today);
        assert!(matches!(result, Err(ScheduleError::DuplicateId { .. })));
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_preference_clashing_with_shift_id_is_not_recorded() {
        let mut session = session();
        let today = make_date("2026-02-01");
        session
            .add_shift(shift("p1", "2026-02-03", "08:00 - 16:00", Position::Kitchen), today)
            .unwrap();

        let result =
            session.add_preference(preference("p1", "2026-02-10", PreferenceKind::Work), today);
        assert!(matches!(result, Err(ScheduleError::DuplicateId { .. })));
        assert!(session.preferences().is_empty());
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_local_ids_are_distinct() {
        let ids: std::collections::HashSet<String> = (0..100).map(|_| local_id()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_preference_creates_shift_with_default_location() {
        let mut session = session();
        let changed = session
            .add_preference(
                preference("p1", "2026-02-10", PreferenceKind::Work),
                make_date("2026-02-01"),
            )
            .unwrap();

        assert!(changed);
        let record = session.store().get(make_date("2026-02-10")).unwrap();
        assert_eq!(record.id, "p1");
        assert_eq!(record.location, "Main Street");
        assert_eq!(record.entries[0].position, Position::Support);
        assert_eq!(session.preferences().len(), 1);
    }

    #[test]
    fn test_day_off_preference_leaves_store_untouched() {
        let mut session = session();
        let mut day_off = preference("p1", "2026-02-10", PreferenceKind::DayOff);
        day_off.position = None;

        let changed = session.add_preference(day_off, make_date("2026-02-01")).unwrap();
        assert!(!changed);
        assert!(session.store().is_empty());
        assert_eq!(session.preferences().len(), 1);
    }

    #[test]
    fn test_invalid_preference_is_not_recorded() {
        let mut session = session();
        let mut missing_position = preference("p1", "2026-02-10", PreferenceKind::Work);
        missing_position.position = None;

        let result = session.add_preference(missing_position, make_date("2026-02-01"));
        assert!(matches!(result, Err(ScheduleError::InvalidPreference { .. })));
        assert!(session.preferences().is_empty());
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_preferences_keep_insertion_order() {
        let mut session = session();
        let today = make_date("2026-02-01");
        for (id, date) in [("b", "2026-02-20"), ("a", "2026-02-05")] {
            session
                .add_preference(preference(id, date, PreferenceKind::Work), today)
                .unwrap();
        }
        let ids: Vec<&str> = session.preferences().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_next_shift_counts_down_to_first_entry() {
        let mut session = session();
        let today = make_date("2026-03-01");
        session
            .add_shift(shift("a", "2026-03-03", "14:30 - 22:00", Position::Kitchen), today)
            .unwrap();

        let next = session.next_shift(at("2026-03-01", 12, 0)).unwrap();
        assert_eq!(next.shift.id, "a");
        assert_eq!(
            next.countdown,
            Countdown {
                days: 2,
                hours: 2,
                minutes: 30
            }
        );
    }

    #[test]
    fn test_next_shift_already_started_today_reads_zero() {
        let mut session = session();
        let today = make_date("2026-03-01");
        session
            .add_shift(shift("a", "2026-03-01", "08:00 - 16:00", Position::Kitchen), today)
            .unwrap();

        let next = session.next_shift(at("2026-03-01", 9, 0)).unwrap();
        assert!(next.countdown.is_zero());
    }

    #[test]
    fn test_vacation_status() {
        let mut session = session();
        let today = make_date("2025-12-01");
        session
            .set_vacation(
                make_date("2025-12-24"),
                make_date("2025-12-26"),
                VacationType::Annual,
                today,
            )
            .unwrap();

        let status = session.vacation_status(at("2025-12-23", 18, 0)).unwrap();
        assert_eq!(status.total_days, 3);
        assert_eq!(
            status.countdown,
            Countdown {
                days: 0,
                hours: 6,
                minutes: 0
            }
        );
    }

    #[test]
    fn test_invalid_vacation_keeps_previous() {
        let mut session = session();
        let today = make_date("2025-12-01");
        session
            .set_vacation(
                make_date("2025-12-24"),
                make_date("2025-12-26"),
                VacationType::Annual,
                today,
            )
            .unwrap();

        let result = session.set_vacation(
            make_date("2025-12-30"),
            make_date("2025-12-28"),
            VacationType::Unpaid,
            today,
        );
        assert!(matches!(result, Err(ScheduleError::InvalidVacation { .. })));
        assert_eq!(session.vacation().unwrap().kind(), VacationType::Annual);
    }

    #[test]
    fn test_statistics_use_profile_rate() {
        let mut session = session();
        let today = make_date("2026-01-01");
        session
            .add_shift(shift("a", "2026-01-05", "08:00 - 16:00", Position::Kitchen), today)
            .unwrap();

        let stats = session.monthly_stats(YearMonth::new(2026, 1).unwrap());
        assert_eq!(stats.earnings, Decimal::from(160));

        let report = session.trailing_report(make_date("2026-02-15")).unwrap();
        assert_eq!(report.total_hours, Decimal::from(8));
        assert_eq!(report.months.len(), 3);
    }

    #[test]
    fn test_calendar_document_contains_store() {
        let mut session = session();
        let today = make_date("2026-01-01");
        session
            .add_shift(shift("a", "2026-01-05", "08:00 - 16:00", Position::Lobby), today)
            .unwrap();

        let doc = session.calendar_document_at(at("2026-01-01", 0, 0));
        assert!(doc.contains("SUMMARY:LOB - Main Street"));
        assert!(doc.contains("UID:shift-a@shift-calendar.local"));
    }

    #[test]
    fn test_logout_clears_everything() {
        let mut session = session();
        let today = make_date("2026-01-01");
        session
            .add_shift(shift("a", "2026-01-05", "08:00 - 16:00", Position::Kitchen), today)
            .unwrap();
        session
            .add_preference(preference("p", "2026-01-06", PreferenceKind::Work), today)
            .unwrap();
        session
            .set_vacation(
                make_date("2026-02-01"),
                make_date("2026-02-02"),
                VacationType::OnDemand,
                today,
            )
            .unwrap();

        session.logout();
        assert!(session.store().is_empty());
        assert!(session.preferences().is_empty());
        assert!(session.vacation().is_none());
    }

    #[test]
    fn test_profile_update_refreshes_initials() {
        let mut session = session();
        assert_eq!(session.profile().initials, "AN");

        let mut updated = profile();
        updated.name = "Zofia Maria Lis".to_string();
        session.update_profile(updated);
        assert_eq!(session.profile().initials, "ZM");
    }

    #[test]
    fn test_month_grid_marks_shift_positions() {
        let mut session = session();
        let today = make_date("2026-01-01");
        session
            .add_shift(shift("a", "2026-01-05", "08:00 - 16:00", Position::Runner), today)
            .unwrap();

        let grid = session.month_grid(YearMonth::new(2026, 1).unwrap());
        let cell = grid.iter().find(|c| c.date == make_date("2026-01-05")).unwrap();
        assert_eq!(cell.positions, vec![Position::Runner]);
    }
}
