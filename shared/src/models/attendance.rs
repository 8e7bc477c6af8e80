//! Attendance Model (勤怠)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One clock-in / clock-out record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub staff_id: String,
    pub clock_in: DateTime<Utc>,
    /// Unset while the staff member is still working
    pub clock_out: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    /// Whether the record is still open (no clock-out yet)
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Worked minutes, zero while the record is open
    pub fn worked_minutes(&self) -> i64 {
        match self.clock_out {
            Some(out) => {
                let secs = (out - self.clock_in).num_seconds();
                ((secs + 30) / 60).max(0)
            }
            None => 0,
        }
    }
}
