//! In-memory collaborators and fixtures shared by the engine tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

use crate::model::attendance::{AttendanceRecord, AttendanceStatus, BreakSession, LiveStatus};
use crate::model::employee::Employee;
use crate::model::shift::{Shift, parse_shift_time};

use super::clock::FixedClock;
use super::orchestrator::FinalizeEngine;
use super::ports::*;

/// Default test employee, assigned the 09:00-17:00 shift by `TestEnv`.
pub const EMP: u64 = 1;

pub fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
}

pub fn dt(day: u32, h: u32, m: u32) -> NaiveDateTime {
    d(day).and_hms_opt(h, m, 0).unwrap()
}

pub fn day_shift() -> Shift {
    Shift {
        id: 1,
        name: "general".into(),
        start_time: parse_shift_time("09:00").unwrap(),
        end_time: parse_shift_time("17:00").unwrap(),
        full_day_hours: 8.0,
        half_day_hours: 4.0,
        grace_period_minutes: 15,
    }
}

pub fn night_shift() -> Shift {
    Shift {
        id: 2,
        name: "night".into(),
        start_time: parse_shift_time("22:00").unwrap(),
        end_time: parse_shift_time("06:00").unwrap(),
        full_day_hours: 7.5,
        half_day_hours: 4.0,
        grace_period_minutes: 15,
    }
}

pub fn employee(id: u64) -> Employee {
    Employee {
        id,
        employee_code: format!("EMP-{id}"),
        first_name: "Test".into(),
        last_name: format!("Employee{id}"),
        email: format!("emp{id}@company.com"),
        department_id: 1,
        hire_date: d(1),
        status: "active".into(),
    }
}

pub fn record_for(employee_id: u64, date: NaiveDate, status: LiveStatus) -> AttendanceRecord {
    AttendanceRecord::new(employee_id, date, AttendanceStatus::Live(status))
}

pub fn break_session(break_in: NaiveDateTime, break_out: NaiveDateTime) -> BreakSession {
    BreakSession {
        break_in,
        break_out: Some(break_out),
        duration_minutes: (break_out - break_in).num_minutes(),
    }
}

#[derive(Default)]
pub struct MemCalendar {
    holidays: Mutex<HashSet<NaiveDate>>,
}

impl MemCalendar {
    pub fn add_holiday(&self, date: NaiveDate) {
        self.holidays.lock().unwrap().insert(date);
    }
}

#[async_trait]
impl CalendarRules for MemCalendar {
    async fn is_holiday(&self, date: NaiveDate) -> Result<bool> {
        Ok(self.holidays.lock().unwrap().contains(&date))
    }

    async fn is_working_day(&self, date: NaiveDate) -> Result<bool> {
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        Ok(!weekend && !self.is_holiday(date).await?)
    }
}

#[derive(Default)]
pub struct MemLeaves {
    approved: Mutex<Vec<(u64, NaiveDate, NaiveDate)>>,
}

impl MemLeaves {
    pub fn approve(&self, employee_id: u64, start: NaiveDate, end: NaiveDate) {
        self.approved.lock().unwrap().push((employee_id, start, end));
    }
}

#[async_trait]
impl LeaveLookup for MemLeaves {
    async fn has_approved_leave(&self, employee_id: u64, date: NaiveDate) -> Result<bool> {
        Ok(self
            .approved
            .lock()
            .unwrap()
            .iter()
            .any(|(id, start, end)| *id == employee_id && *start <= date && date <= *end))
    }
}

#[derive(Default)]
pub struct MemDirectory {
    list: Mutex<Vec<Employee>>,
}

impl MemDirectory {
    pub fn add(&self, employee: Employee) {
        self.list.lock().unwrap().push(employee);
    }
}

#[async_trait]
impl EmployeeDirectory for MemDirectory {
    async fn list_active_employees(&self) -> Result<Vec<Employee>> {
        Ok(self.list.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MemRecords {
    map: Mutex<HashMap<(u64, NaiveDate), AttendanceRecord>>,
    next_id: AtomicU64,
    poisoned: Mutex<HashSet<u64>>,
}

impl MemRecords {
    pub fn get(&self, employee_id: u64, date: NaiveDate) -> Option<AttendanceRecord> {
        self.map.lock().unwrap().get(&(employee_id, date)).cloned()
    }

    pub fn insert(&self, mut record: AttendanceRecord) {
        if record.id == 0 {
            record.id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        }
        self.map
            .lock()
            .unwrap()
            .insert((record.employee_id, record.date), record);
    }

    /// Makes every store call for this employee fail, for error
    /// isolation tests.
    pub fn poison(&self, employee_id: u64) {
        self.poisoned.lock().unwrap().insert(employee_id);
    }

    fn check(&self, employee_id: u64) -> Result<()> {
        if self.poisoned.lock().unwrap().contains(&employee_id) {
            bail!("store failure for employee {employee_id}");
        }
        Ok(())
    }
}

#[async_trait]
impl AttendanceRecordStore for MemRecords {
    async fn find(&self, employee_id: u64, date: NaiveDate) -> Result<Option<AttendanceRecord>> {
        self.check(employee_id)?;
        Ok(self.get(employee_id, date))
    }

    async fn find_open_clock_ins(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>> {
        Ok(self
            .map
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.date == date && r.has_open_clock_in() && !r.status.is_sealed())
            .cloned()
            .collect())
    }

    async fn create(&self, record: AttendanceRecord) -> Result<AttendanceRecord> {
        self.check(record.employee_id)?;
        let mut map = self.map.lock().unwrap();
        let key = (record.employee_id, record.date);
        if map.contains_key(&key) {
            bail!("duplicate attendance record for {key:?}");
        }
        let mut record = record;
        record.id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        map.insert(key, record.clone());
        Ok(record)
    }

    async fn save(&self, record: &AttendanceRecord) -> Result<()> {
        self.check(record.employee_id)?;
        self.map
            .lock()
            .unwrap()
            .insert((record.employee_id, record.date), record.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemShifts {
    map: Mutex<HashMap<u64, Shift>>,
}

impl MemShifts {
    pub fn assign(&self, employee_id: u64, shift: Shift) {
        self.map.lock().unwrap().insert(employee_id, shift);
    }
}

#[async_trait]
impl ShiftResolver for MemShifts {
    async fn resolve_shift(&self, employee_id: u64, _date: NaiveDate) -> Result<Option<Shift>> {
        Ok(self.map.lock().unwrap().get(&employee_id).cloned())
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub reason: String,
    pub kind: NoticeKind,
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notice>>,
    fail_next: AtomicBool,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notice> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::Relaxed);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        employee_id: u64,
        date: NaiveDate,
        reason: &str,
        kind: NoticeKind,
    ) -> Result<()> {
        if self.fail_next.swap(false, Ordering::Relaxed) {
            bail!("notification transport down");
        }
        self.sent.lock().unwrap().push(Notice {
            employee_id,
            date,
            reason: reason.to_owned(),
            kind,
        });
        Ok(())
    }
}

/// One fully wired engine over in-memory collaborators, with employee
/// `EMP` active on the 09:00-17:00 shift.
pub struct TestEnv {
    pub clock: Arc<FixedClock>,
    pub calendar: Arc<MemCalendar>,
    pub leaves: Arc<MemLeaves>,
    pub employees: Arc<MemDirectory>,
    pub records: Arc<MemRecords>,
    pub shifts: Arc<MemShifts>,
    pub notifier: Arc<RecordingNotifier>,
    pub engine: Arc<FinalizeEngine>,
}

impl TestEnv {
    pub fn new(now: NaiveDateTime) -> Self {
        let clock = Arc::new(FixedClock::at(now));
        let calendar = Arc::new(MemCalendar::default());
        let leaves = Arc::new(MemLeaves::default());
        let employees = Arc::new(MemDirectory::default());
        let records = Arc::new(MemRecords::default());
        let shifts = Arc::new(MemShifts::default());
        let notifier = Arc::new(RecordingNotifier::default());

        employees.add(employee(EMP));
        shifts.assign(EMP, day_shift());

        let engine = Arc::new(FinalizeEngine::new(
            clock.clone(),
            calendar.clone(),
            leaves.clone(),
            employees.clone(),
            records.clone(),
            shifts.clone(),
            notifier.clone(),
            30,
        ));

        Self {
            clock,
            calendar,
            leaves,
            employees,
            records,
            shifts,
            notifier,
            engine,
        }
    }
}
