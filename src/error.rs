use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// An external command (squeue, ssh) exited non-zero or could not be spawned.
    #[error("{message}{}", format_output(.output))]
    Retrieval {
        message: String,
        output: Option<String>,
    },

    #[error("Failed to parse JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unable to parse {flag} {value:?}")]
    InvalidCutoff { flag: &'static str, value: String },

    #[error("Invalid job start time {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn retrieval(message: impl Into<String>, output: Option<String>) -> Self {
        DashboardError::Retrieval {
            message: message.into(),
            output: output.filter(|o| !o.trim().is_empty()),
        }
    }
}

fn format_output(output: &Option<String>) -> String {
    match output {
        Some(output) => format!("\nOutput:\n{}", output),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
