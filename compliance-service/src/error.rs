use thiserror::Error;

/// Errors that abort a whole compliance check
#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("Schema error: tab '{tab}' is missing the required '{column}' column")]
    Schema { tab: String, column: String },

    #[error("Document format error: {0}")]
    Format(#[from] crate::document::DocumentError),

    #[error("Rule store error: {0}")]
    Connection(#[from] rule_store::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ComplianceError>;

/// Text-analysis service failures
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Analysis service unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analysis service error {status_code}: {message}")]
    Api { status_code: u16, message: String },

    #[error("Malformed analysis response: {0}")]
    MalformedResponse(String),

    #[error("Analysis service unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a single ruleset evaluation. Never escapes its own report.
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Rule substitution failed: {0}")]
    Substitution(#[from] regex::Error),
}
