//! Night Desk - 夜職向け POS デスクコア
//!
//! # 架構概述
//!
//! The desk core behind a nightlife venue POS front-end: all money and
//! lifecycle logic lives here, the UI is plain state-to-view binding.
//!
//! - **料金計算** (`pricing`): subtotal → service fee → tax → rounding
//! - **伝票** (`tickets`): date-scoped sequencing, line ops, settlement,
//!   equal split and line transfer
//! - **メニュー** (`catalog`): menu catalog CRUD and JSON import/export
//! - **勤怠** (`attendance`): clock-in/out and payroll minutes
//! - **集計** (`reports`): daily sales, top menu, KPI
//!
//! # モジュール構造
//!
//! ```text
//! night-desk/src/
//! ├── core/          # 設定
//! ├── pricing/       # 料金エンジン
//! ├── tickets/       # 採番・伝票管理
//! ├── catalog.rs     # メニューマスタ
//! ├── attendance.rs  # 勤怠
//! ├── reports.rs     # ダッシュボード集計
//! ├── export.rs      # CSV/JSON エクスポート
//! ├── storage.rs     # redb ストレージ
//! └── logger.rs      # ロギング
//! ```

pub mod attendance;
pub mod catalog;
pub mod core;
pub mod export;
pub mod logger;
pub mod pricing;
pub mod reports;
pub mod storage;
pub mod tickets;

// Re-export 公共類型
pub use self::core::Config;
pub use pricing::{TicketTotals, compute_totals};
pub use storage::{DeskStorage, StorageError, StorageResult};
pub use tickets::{TicketManager, next_ticket_id};

// Re-export unified error types from shared
pub use shared::error::{AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use logger::{cleanup_old_logs, init_logger, init_logger_with_file};
