//! Domain error types.

/// Top-level error type for tradesim.
#[derive(Debug, thiserror::Error)]
pub enum TradesimError {
    #[error("invalid price {price} at index {index}: prices must be finite and positive")]
    InvalidPrice { index: usize, price: f64 },

    #[error("invalid initial balance {balance}: must be finite and positive")]
    InvalidBalance { balance: f64 },

    #[error("timestamp count {timestamps} does not match price count {prices}")]
    TimestampMismatch { prices: usize, timestamps: usize },

    #[error("unknown strategy '{name}'")]
    UnknownStrategy { name: String },

    #[error("strategy '{name}' is not enabled by the configuration")]
    StrategyDisabled { name: String },

    #[error("invalid goal '{value}' (expected usd or accumulate)")]
    InvalidGoal { value: String },

    #[error("price data error: {reason}")]
    PriceData { reason: String },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradesimError> for std::process::ExitCode {
    fn from(err: &TradesimError) -> Self {
        let code: u8 = match err {
            TradesimError::Io(_) => 1,
            TradesimError::ConfigParse { .. }
            | TradesimError::ConfigMissing { .. }
            | TradesimError::ConfigInvalid { .. } => 2,
            TradesimError::UnknownStrategy { .. }
            | TradesimError::StrategyDisabled { .. }
            | TradesimError::InvalidGoal { .. }
            | TradesimError::InvalidBalance { .. } => 4,
            TradesimError::InvalidPrice { .. }
            | TradesimError::TimestampMismatch { .. }
            | TradesimError::PriceData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
