use thiserror::Error;
use trendcast_core::{ConfigError, ExportError, FitError, PipelineError, Ticker};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] trendcast_core::ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("command error: {0}")]
    Command(String),

    #[error("Ticker not found. Please check the symbol. ({ticker})")]
    Fetch { ticker: Ticker },

    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("strict mode failed: warnings={warning_count}")]
    StrictModeViolation { warning_count: usize },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Config(_) | Self::Command(_) => 2,
            Self::Fetch { .. } => 3,
            Self::Fit(_) | Self::Export(_) | Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Io(_) => 10,
        }
    }
}

impl From<PipelineError> for CliError {
    /// Insufficient data is reported as a warning by the commands and only
    /// reaches this conversion when a caller treats it as fatal.
    fn from(error: PipelineError) -> Self {
        match error {
            PipelineError::FetchFailure { ticker } => Self::Fetch { ticker },
            PipelineError::FitFailure(error) => Self::Fit(error),
            other @ PipelineError::InsufficientData { .. } => Self::Command(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_failure_class() {
        let ticker = Ticker::parse("NOPE").expect("valid ticker");

        assert_eq!(CliError::from(PipelineError::FetchFailure { ticker }).exit_code(), 3);
        assert_eq!(CliError::from(PipelineError::FitFailure(FitError::Singular)).exit_code(), 4);
        assert_eq!(CliError::StrictModeViolation { warning_count: 1 }.exit_code(), 5);
        assert_eq!(
            CliError::from(std::io::Error::other("disk full")).exit_code(),
            10
        );
        assert_eq!(
            CliError::from(trendcast_core::ValidationError::EmptyTicker).exit_code(),
            2
        );
    }
}
