//! # QAbot Rule Store
//!
//! Source of the raw rule rows consumed by the compliance pipeline:
//! - Google Sheets backend (one tab per client plus the universal tab)
//! - CSV directory backend for offline use
//! - In-memory backend for tests and demos
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            RuleStore (trait object)          │
//! └──────────┬──────────────┬──────────────┬─────┘
//!            │              │              │
//!     ┌──────▼─────┐ ┌──────▼─────┐ ┌──────▼─────┐
//!     │   Sheets   │ │    CSV     │ │ In-memory  │
//!     │  (HTTP v4) │ │ directory  │ │            │
//!     └────────────┘ └────────────┘ └────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod csv_store;
pub mod error;
pub mod memory;
pub mod sheets;
pub mod store;
pub mod types;

pub use config::{RuleStoreBackend, RuleStoreConfig};
pub use csv_store::CsvRuleStore;
pub use error::{Error, Result};
pub use memory::InMemoryRuleStore;
pub use sheets::{SheetsConfig, SheetsRuleStore};
pub use store::RuleStore;
pub use types::{RawRow, RuleSheet};

/// Name of the tab holding rules that apply to every client
pub const UNIVERSAL_TAB: &str = "ALL CLIENTS";

/// Column carrying the market scope of a rule
pub const MARKET_COLUMN: &str = "Market";

/// Column carrying the ruleset a rule belongs to
pub const RULESET_COLUMN: &str = "Ruleset";

/// Column carrying the literal rule text
pub const RULE_COLUMN: &str = "Rule";

/// Column carrying the canonical rule identifier
pub const RULE_NAME_COLUMN: &str = "Rule Name";

/// Default request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
