use arrow::error::ArrowError;
use std::path::PathBuf;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Every way a run can fail. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("configuration error in {path}: {reason}")]
    Configuration { path: PathBuf, reason: String },

    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: String, reason: String },

    #[error("missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("download of {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("table operation failed: {0}")]
    Compute(#[from] ArrowError),

    #[error("transform task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn decode(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        PipelineError::Decode {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn configuration(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PipelineError::Configuration {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_setting(name: &str, reason: impl ToString) -> Self {
        PipelineError::InvalidSetting {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Name of the stage that failed, for user-facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Configuration { .. } | PipelineError::InvalidSetting { .. } => {
                "configuration"
            }
            PipelineError::Schema { .. } => "schema",
            PipelineError::Io { .. } | PipelineError::Decode { .. } => "io",
            PipelineError::Network { .. } => "network",
            PipelineError::Compute(_) | PipelineError::Task(_) => "transform",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_every_missing_column() {
        let err = PipelineError::Schema {
            missing: vec!["total_tests".into(), "life_expectancy".into()],
        };
        assert_eq!(
            err.to_string(),
            "missing required column(s): total_tests, life_expectancy"
        );
        assert_eq!(err.stage(), "schema");
    }

    #[test]
    fn invalid_setting_names_the_variable() {
        let err = PipelineError::invalid_setting("OWID_SOURCE_URL", "unsupported scheme");
        assert_eq!(
            err.to_string(),
            "invalid setting OWID_SOURCE_URL: unsupported scheme"
        );
        assert_eq!(err.stage(), "configuration");
    }

    #[test]
    fn decode_errors_report_as_io_stage() {
        let err = PipelineError::decode("data/x.csv", "bad date");
        assert_eq!(err.stage(), "io");
        assert!(err.to_string().contains("data/x.csv"));
    }
}
