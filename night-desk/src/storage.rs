//! redb-based storage layer
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `tickets` | ticket id | `Ticket` | All tickets, open and paid |
//! | `menu` | item id | `MenuItem` | Menu catalog |
//! | `staff` | staff id | `Staff` | Staff roster |
//! | `attendance` | record id | `AttendanceRecord` | Clock-in/out records |
//! | `settings` | `"settings"` | `StoreSettings` | Singleton settings row |
//!
//! Values are JSON-serialized. Each logical collection exposes the same
//! get / get-all / put / delete surface, so callers never depend on the
//! storage technology.
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: the database
//! file is always in a consistent state across power loss, which matters
//! for a till that gets switched off at closing time.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::error::AppError;
use shared::models::{AttendanceRecord, MenuItem, Staff, StoreSettings, Ticket};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for tickets: key = ticket id, value = JSON-serialized Ticket
const TICKETS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tickets");

/// Table for the menu catalog: key = item id, value = JSON-serialized MenuItem
const MENU_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("menu");

/// Table for the staff roster: key = staff id, value = JSON-serialized Staff
const STAFF_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("staff");

/// Table for attendance: key = record id, value = JSON-serialized AttendanceRecord
const ATTENDANCE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("attendance");

/// Table for the settings singleton: key = "settings"
const SETTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");

const SETTINGS_KEY: &str = "settings";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::database(err.to_string())
    }
}

/// Desk storage backed by redb
#[derive(Clone)]
pub struct DeskStorage {
    db: Arc<Database>,
}

impl DeskStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests, demo mode)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TICKETS_TABLE)?;
            let _ = write_txn.open_table(MENU_TABLE)?;
            let _ = write_txn.open_table(STAFF_TABLE)?;
            let _ = write_txn.open_table(ATTENDANCE_TABLE)?;
            let _ = write_txn.open_table(SETTINGS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ==================== Generic helpers ====================

    fn put_json<T: serde::Serialize>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
        value: &T,
    ) -> StorageResult<()> {
        let bytes = serde_json::to_vec(value)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut t = write_txn.open_table(table)?;
            t.insert(key, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
    ) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(table)?;
        match t.get(key)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn all_json<T: serde::de::DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
    ) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(table)?;
        let mut out = Vec::new();
        for entry in t.iter()? {
            let (_, value) = entry?;
            out.push(serde_json::from_slice(value.value())?);
        }
        Ok(out)
    }

    fn delete_key(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
    ) -> StorageResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut t = write_txn.open_table(table)?;
            t.remove(key)?.is_some()
        };
        write_txn.commit()?;
        Ok(removed)
    }

    // ==================== Tickets ====================

    pub fn put_ticket(&self, ticket: &Ticket) -> StorageResult<()> {
        self.put_json(TICKETS_TABLE, &ticket.id, ticket)
    }

    /// Persist several tickets in one transaction (split/transfer commits
    /// either every involved ticket or none)
    pub fn put_tickets(&self, tickets: &[Ticket]) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut t = write_txn.open_table(TICKETS_TABLE)?;
            for ticket in tickets {
                let bytes = serde_json::to_vec(ticket)?;
                t.insert(ticket.id.as_str(), bytes.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get_ticket(&self, id: &str) -> StorageResult<Option<Ticket>> {
        self.get_json(TICKETS_TABLE, id)
    }

    /// All tickets, in id order (lexicographic, which matches issue order
    /// within a day)
    pub fn all_tickets(&self) -> StorageResult<Vec<Ticket>> {
        self.all_json(TICKETS_TABLE)
    }

    pub fn delete_ticket(&self, id: &str) -> StorageResult<bool> {
        self.delete_key(TICKETS_TABLE, id)
    }

    // ==================== Menu ====================

    pub fn put_menu_item(&self, item: &MenuItem) -> StorageResult<()> {
        self.put_json(MENU_TABLE, &item.id, item)
    }

    pub fn get_menu_item(&self, id: &str) -> StorageResult<Option<MenuItem>> {
        self.get_json(MENU_TABLE, id)
    }

    pub fn all_menu_items(&self) -> StorageResult<Vec<MenuItem>> {
        self.all_json(MENU_TABLE)
    }

    pub fn delete_menu_item(&self, id: &str) -> StorageResult<bool> {
        self.delete_key(MENU_TABLE, id)
    }

    /// Replace the whole catalog in one transaction (JSON import must
    /// never partially apply)
    pub fn replace_menu(&self, items: &[MenuItem]) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            write_txn.delete_table(MENU_TABLE)?;
            let mut t = write_txn.open_table(MENU_TABLE)?;
            for item in items {
                let bytes = serde_json::to_vec(item)?;
                t.insert(item.id.as_str(), bytes.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    // ==================== Staff ====================

    pub fn put_staff(&self, staff: &Staff) -> StorageResult<()> {
        self.put_json(STAFF_TABLE, &staff.id, staff)
    }

    pub fn get_staff(&self, id: &str) -> StorageResult<Option<Staff>> {
        self.get_json(STAFF_TABLE, id)
    }

    pub fn all_staff(&self) -> StorageResult<Vec<Staff>> {
        self.all_json(STAFF_TABLE)
    }

    pub fn delete_staff(&self, id: &str) -> StorageResult<bool> {
        self.delete_key(STAFF_TABLE, id)
    }

    // ==================== Attendance ====================

    pub fn put_attendance(&self, record: &AttendanceRecord) -> StorageResult<()> {
        self.put_json(ATTENDANCE_TABLE, &record.id, record)
    }

    pub fn all_attendance(&self) -> StorageResult<Vec<AttendanceRecord>> {
        self.all_json(ATTENDANCE_TABLE)
    }

    // ==================== Settings ====================

    /// Load settings, falling back to the documented defaults when the
    /// singleton row has never been written
    pub fn load_settings(&self) -> StorageResult<StoreSettings> {
        Ok(self
            .get_json(SETTINGS_TABLE, SETTINGS_KEY)?
            .unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &StoreSettings) -> StorageResult<()> {
        self.put_json(SETTINGS_TABLE, SETTINGS_KEY, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::{PaymentMethod, TicketStatus};

    fn ticket(id: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            seat: Some("A-1".to_string()),
            customer_name: None,
            staff_id: None,
            lines: vec![],
            opened_at: Utc::now(),
            closed_at: None,
            status: TicketStatus::Open,
            payment_method: PaymentMethod::Cash,
            memo: None,
        }
    }

    fn menu_item(id: &str, price: i64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            code: String::new(),
            name: id.to_string(),
            category: "drink".to_string(),
            price,
            serviceable: true,
            taxable: true,
            pricing: Default::default(),
            unit_minutes: 60,
            active: true,
        }
    }

    #[test]
    fn test_ticket_roundtrip() {
        let storage = DeskStorage::open_in_memory().unwrap();
        let t = ticket("T-20250101-001");
        storage.put_ticket(&t).unwrap();

        let loaded = storage.get_ticket("T-20250101-001").unwrap().unwrap();
        assert_eq!(loaded.id, t.id);
        assert_eq!(loaded.seat, t.seat);
        assert!(storage.get_ticket("T-20250101-999").unwrap().is_none());
    }

    #[test]
    fn test_all_tickets_in_id_order() {
        let storage = DeskStorage::open_in_memory().unwrap();
        storage.put_ticket(&ticket("T-20250101-002")).unwrap();
        storage.put_ticket(&ticket("T-20250101-001")).unwrap();

        let ids: Vec<_> = storage
            .all_tickets()
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, ["T-20250101-001", "T-20250101-002"]);
    }

    #[test]
    fn test_delete_ticket() {
        let storage = DeskStorage::open_in_memory().unwrap();
        storage.put_ticket(&ticket("T-20250101-001")).unwrap();
        assert!(storage.delete_ticket("T-20250101-001").unwrap());
        assert!(!storage.delete_ticket("T-20250101-001").unwrap());
    }

    #[test]
    fn test_replace_menu_drops_old_entries() {
        let storage = DeskStorage::open_in_memory().unwrap();
        storage.put_menu_item(&menu_item("old", 100)).unwrap();

        storage
            .replace_menu(&[menu_item("beer", 800), menu_item("shot", 1200)])
            .unwrap();

        let mut ids: Vec<_> = storage
            .all_menu_items()
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        ids.sort();
        assert_eq!(ids, ["beer", "shot"]);
    }

    #[test]
    fn test_settings_default_until_saved() {
        let storage = DeskStorage::open_in_memory().unwrap();
        let settings = storage.load_settings().unwrap();
        assert_eq!(settings.pricing.service_fee_rate, 0.20);

        let mut changed = settings.clone();
        changed.pricing.tax_rate = 0.08;
        storage.save_settings(&changed).unwrap();
        assert_eq!(storage.load_settings().unwrap().pricing.tax_rate, 0.08);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.redb");

        {
            let storage = DeskStorage::open(&path).unwrap();
            storage.put_ticket(&ticket("T-20250101-001")).unwrap();
        }

        let storage = DeskStorage::open(&path).unwrap();
        assert!(storage.get_ticket("T-20250101-001").unwrap().is_some());
    }
}
