//! Compliance check metrics

use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

lazy_static::lazy_static! {
    pub static ref RULE_ROWS_AGGREGATED: IntCounterVec = register_int_counter_vec!(
        "qabot_rule_rows_aggregated_total",
        "Rule rows kept after market filtering",
        &["tab"]
    )
    .unwrap();

    pub static ref RULESETS_EVALUATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "qabot_rulesets_evaluated_total",
        "Ruleset evaluations by outcome",
        &["outcome"]
    )
    .unwrap();

    pub static ref ANALYSIS_REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "qabot_analysis_request_duration_seconds",
        "Text-analysis request duration",
        &["model"]
    )
    .unwrap();
}
