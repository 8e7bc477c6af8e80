//! Attendance tracking (勤怠)
//!
//! Clock-in/out over staff records. At most one open attendance record
//! per staff member; worked minutes round to the nearest minute.

use chrono::{DateTime, Utc};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::AttendanceRecord;

use crate::storage::DeskStorage;

/// Attendance book over the desk storage
#[derive(Clone)]
pub struct AttendanceBook {
    storage: DeskStorage,
}

impl AttendanceBook {
    pub fn with_storage(storage: DeskStorage) -> Self {
        Self { storage }
    }

    fn ensure_staff(&self, staff_id: &str) -> AppResult<()> {
        if self.storage.get_staff(staff_id)?.is_none() {
            return Err(
                AppError::new(ErrorCode::StaffNotFound).with_detail("staff_id", staff_id)
            );
        }
        Ok(())
    }

    fn open_record(&self, staff_id: &str) -> AppResult<Option<AttendanceRecord>> {
        Ok(self
            .storage
            .all_attendance()?
            .into_iter()
            .find(|r| r.staff_id == staff_id && r.is_open()))
    }

    /// Start a shift
    pub fn clock_in(&self, staff_id: &str) -> AppResult<AttendanceRecord> {
        self.clock_in_at(staff_id, Utc::now())
    }

    pub fn clock_in_at(&self, staff_id: &str, at: DateTime<Utc>) -> AppResult<AttendanceRecord> {
        self.ensure_staff(staff_id)?;
        if self.open_record(staff_id)?.is_some() {
            return Err(
                AppError::new(ErrorCode::AlreadyClockedIn).with_detail("staff_id", staff_id)
            );
        }

        let record = AttendanceRecord {
            id: uuid::Uuid::new_v4().to_string(),
            staff_id: staff_id.to_string(),
            clock_in: at,
            clock_out: None,
        };
        self.storage.put_attendance(&record)?;
        tracing::info!(staff_id, "Clocked in");
        Ok(record)
    }

    /// End the open shift
    pub fn clock_out(&self, staff_id: &str) -> AppResult<AttendanceRecord> {
        self.clock_out_at(staff_id, Utc::now())
    }

    pub fn clock_out_at(&self, staff_id: &str, at: DateTime<Utc>) -> AppResult<AttendanceRecord> {
        self.ensure_staff(staff_id)?;
        let mut record = self
            .open_record(staff_id)?
            .ok_or_else(|| AppError::new(ErrorCode::NotClockedIn).with_detail("staff_id", staff_id))?;

        record.clock_out = Some(at);
        self.storage.put_attendance(&record)?;
        tracing::info!(staff_id, minutes = record.worked_minutes(), "Clocked out");
        Ok(record)
    }

    /// All records, newest first
    pub fn records(&self) -> AppResult<Vec<AttendanceRecord>> {
        let mut records = self.storage.all_attendance()?;
        records.sort_by(|a, b| b.clock_in.cmp(&a.clock_in));
        Ok(records)
    }

    /// Worked minutes per staff member across all closed shifts
    pub fn minutes_by_staff(&self) -> AppResult<std::collections::HashMap<String, i64>> {
        let mut by_staff: std::collections::HashMap<String, i64> = std::collections::HashMap::new();
        for record in self.storage.all_attendance()? {
            *by_staff.entry(record.staff_id.clone()).or_default() += record.worked_minutes();
        }
        Ok(by_staff)
    }

    /// Total worked minutes for one staff member; open shifts count zero
    pub fn minutes_for(&self, staff_id: &str) -> AppResult<i64> {
        self.ensure_staff(staff_id)?;
        Ok(self
            .storage
            .all_attendance()?
            .iter()
            .filter(|r| r.staff_id == staff_id)
            .map(AttendanceRecord::worked_minutes)
            .sum())
    }
}
