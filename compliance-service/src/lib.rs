//! # QAbot Compliance Service
//!
//! Checks a document against market-specific rules:
//! - Rule aggregation from the universal tab and a client tab, filtered by market
//! - Grouping by ruleset in first-occurrence order
//! - One text-analysis request per ruleset, with per-ruleset failure isolation
//! - Rule text in the analysis output rewritten to canonical rule names
//!
//! ## Pipeline
//!
//! ```text
//!  document bytes ──► DocumentTextExtractor ──► text ─────────────┐
//!                                                                 │
//!  RuleStore ──► RuleTable::aggregate ──► RulesetGroups ──► ComplianceEvaluator ──► ComplianceReports
//!                                                                 │
//!                                                          TextAnalyzer
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod aggregator;
pub mod analysis;
pub mod checker;
pub mod config;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod grouping;
pub mod mapping;
pub mod metrics;
pub mod prompt;
pub mod report;
pub mod types;

pub use aggregator::RuleTable;
pub use analysis::{AnalysisRequest, OpenAiAnalyzer, OpenAiConfig, TextAnalyzer};
pub use checker::ComplianceChecker;
pub use config::Config;
pub use document::{DocumentError, DocumentTextExtractor, DocxExtractor, PlainTextExtractor};
pub use error::{AnalysisError, ComplianceError, EvaluationError, Result};
pub use evaluator::{ComplianceEvaluator, EvaluationSettings};
pub use grouping::RulesetGroups;
pub use mapping::RuleNameMapping;
pub use report::ComplianceReports;
pub use types::{ComplianceReport, RuleRow};

/// Market value matching every market
pub const ALL_MARKETS: &str = "All";

/// Prefix of the text carried by a failed ruleset report
pub const ERROR_REPORT_PREFIX: &str = "An error occurred: ";
