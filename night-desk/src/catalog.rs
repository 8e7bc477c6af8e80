//! Menu catalog (メニューマスター)
//!
//! CRUD over the stored menu plus JSON import/export. Import is
//! all-or-nothing: the payload is parsed and validated in full before
//! the stored menu is replaced, so a bad file never leaves a partially
//! applied catalog behind.

use crate::storage::DeskStorage;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::MenuItem;

use crate::pricing::MAX_PRICE;

/// Menu catalog over the desk storage
#[derive(Clone)]
pub struct MenuCatalog {
    storage: DeskStorage,
}

impl MenuCatalog {
    pub fn with_storage(storage: DeskStorage) -> Self {
        Self { storage }
    }

    pub fn get(&self, id: &str) -> AppResult<MenuItem> {
        self.storage
            .get_menu_item(id)?
            .ok_or_else(|| AppError::new(ErrorCode::MenuItemNotFound).with_detail("menu_id", id))
    }

    /// All entries, active or not, sorted by code for stable listings
    pub fn list(&self) -> AppResult<Vec<MenuItem>> {
        let mut items = self.storage.all_menu_items()?;
        items.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(items)
    }

    /// Entries currently orderable
    pub fn list_active(&self) -> AppResult<Vec<MenuItem>> {
        Ok(self.list()?.into_iter().filter(|i| i.active).collect())
    }

    /// Insert or update one entry
    pub fn upsert(&self, item: &MenuItem) -> AppResult<()> {
        validate_item(item)?;
        self.storage.put_menu_item(item)?;
        tracing::info!(menu_id = %item.id, code = %item.code, "Menu entry saved");
        Ok(())
    }

    pub fn remove(&self, id: &str) -> AppResult<()> {
        if !self.storage.delete_menu_item(id)? {
            return Err(AppError::new(ErrorCode::MenuItemNotFound).with_detail("menu_id", id));
        }
        Ok(())
    }

    /// Replace the whole catalog from a JSON array
    ///
    /// Parses and validates every entry before touching storage; any
    /// failure rejects the whole payload.
    pub fn import_json(&self, json: &str) -> AppResult<usize> {
        let items: Vec<MenuItem> = serde_json::from_str(json).map_err(|e| {
            AppError::new(ErrorCode::MenuImportInvalid).with_detail("reason", e.to_string())
        })?;

        for item in &items {
            validate_item(item).map_err(|e| {
                AppError::new(ErrorCode::MenuImportInvalid)
                    .with_detail("menu_id", item.id.clone())
                    .with_detail("reason", e.message.clone())
            })?;
        }

        let mut seen = std::collections::HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(AppError::new(ErrorCode::MenuImportInvalid)
                    .with_detail("menu_id", item.id.clone())
                    .with_detail("reason", "duplicate id"));
            }
        }

        self.storage.replace_menu(&items)?;
        tracing::info!(count = items.len(), "Menu catalog imported");
        Ok(items.len())
    }

    /// Whole catalog as pretty-printed JSON, the same shape import accepts
    pub fn export_json(&self) -> AppResult<String> {
        let items = self.list()?;
        serde_json::to_string_pretty(&items)
            .map_err(|e| AppError::internal(format!("menu export failed: {e}")))
    }
}

fn validate_item(item: &MenuItem) -> AppResult<()> {
    if item.id.trim().is_empty() {
        return Err(AppError::validation("menu id must not be empty"));
    }
    if item.name.trim().is_empty() {
        return Err(AppError::validation("menu name must not be empty")
            .with_detail("menu_id", item.id.clone()));
    }
    if item.price < 0 || item.price > MAX_PRICE {
        return Err(AppError::new(ErrorCode::MenuInvalidPrice)
            .with_detail("menu_id", item.id.clone())
            .with_detail("price", item.price));
    }
    if item.unit_minutes == 0 {
        return Err(AppError::validation("unit_minutes must be at least 1")
            .with_detail("menu_id", item.id.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::PricingMode;

    fn catalog() -> MenuCatalog {
        MenuCatalog::with_storage(DeskStorage::open_in_memory().unwrap())
    }

    fn item(id: &str, code: &str, price: i64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            code: code.to_string(),
            name: format!("{code} item"),
            category: "drink".to_string(),
            price,
            serviceable: true,
            taxable: true,
            pricing: PricingMode::Fixed,
            unit_minutes: 60,
            active: true,
        }
    }

    #[test]
    fn test_upsert_and_list_sorted_by_code() {
        let cat = catalog();
        cat.upsert(&item("b", "B02", 800)).unwrap();
        cat.upsert(&item("a", "A01", 500)).unwrap();

        let listed = cat.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].code, "A01");
        assert_eq!(listed[1].code, "B02");
    }

    #[test]
    fn test_list_active_filters_inactive() {
        let cat = catalog();
        cat.upsert(&item("a", "A01", 500)).unwrap();
        let mut retired = item("b", "B02", 800);
        retired.active = false;
        cat.upsert(&retired).unwrap();

        let active = cat.list_active().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "a");
    }

    #[test]
    fn test_upsert_rejects_bad_price() {
        let cat = catalog();
        let err = cat.upsert(&item("a", "A01", -1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuInvalidPrice);
    }

    #[test]
    fn test_remove_missing_entry() {
        let cat = catalog();
        let err = cat.remove("ghost").unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemNotFound);
    }

    #[test]
    fn test_import_replaces_catalog() {
        let cat = catalog();
        cat.upsert(&item("old", "Z99", 100)).unwrap();

        let payload = serde_json::to_string(&[item("a", "A01", 500), item("b", "B02", 800)])
            .unwrap();
        assert_eq!(cat.import_json(&payload).unwrap(), 2);

        let listed = cat.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|i| i.id != "old"));
    }

    #[test]
    fn test_import_invalid_entry_leaves_catalog_untouched() {
        let cat = catalog();
        cat.upsert(&item("keep", "K01", 100)).unwrap();

        let payload =
            serde_json::to_string(&[item("a", "A01", 500), item("bad", "B02", -5)]).unwrap();
        let err = cat.import_json(&payload).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuImportInvalid);

        let listed = cat.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "keep");
    }

    #[test]
    fn test_import_rejects_duplicate_ids() {
        let cat = catalog();
        let payload =
            serde_json::to_string(&[item("a", "A01", 500), item("a", "A02", 700)]).unwrap();
        let err = cat.import_json(&payload).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuImportInvalid);
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        let cat = catalog();
        let err = cat.import_json("not json at all").unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuImportInvalid);
    }

    #[test]
    fn test_export_round_trips() {
        let cat = catalog();
        cat.upsert(&item("a", "A01", 500)).unwrap();
        cat.upsert(&item("b", "B02", 800)).unwrap();

        let json = cat.export_json().unwrap();

        let other = catalog();
        assert_eq!(other.import_json(&json).unwrap(), 2);
        assert_eq!(other.list().unwrap(), cat.list().unwrap());
    }
}
