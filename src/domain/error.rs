//! Domain error types.

/// Top-level error type for tradesim.
#[derive(Debug, thiserror::Error)]
pub enum TradesimError {
    #[error("empty price series")]
    EmptySeries,

    #[error("invalid record at index {index} ({date}): {reason}")]
    InvalidRecord {
        index: usize,
        date: String,
        reason: String,
    },

    #[error("malformed row {row} in {origin}: {reason}")]
    MalformedRow {
        origin: String,
        row: usize,
        reason: String,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown strategy '{name}' (expected rsi_ma, buy_and_hold or trend_following)")]
    UnknownStrategy { name: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradesimError> for std::process::ExitCode {
    fn from(err: &TradesimError) -> Self {
        let code: u8 = match err {
            TradesimError::Io(_) | TradesimError::Csv(_) => 1,
            TradesimError::ConfigParse { .. }
            | TradesimError::ConfigMissing { .. }
            | TradesimError::ConfigInvalid { .. }
            | TradesimError::UnknownStrategy { .. } => 2,
            TradesimError::EmptySeries
            | TradesimError::InvalidRecord { .. }
            | TradesimError::MalformedRow { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
