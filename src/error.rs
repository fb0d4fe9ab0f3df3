use thiserror::Error;

pub type DealsResult<T> = Result<T, DealsError>;

#[derive(Error, Debug)]
pub enum DealsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing columns in {source_name} file: {}", .columns.join(", "))]
    MissingColumns {
        source_name: String,
        columns: Vec<String>,
    },

    #[error("Import error: {0}")]
    Import(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Sheet '{0}' not found in template")]
    SheetNotFound(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DealsError {
    /// Build a missing-columns error for the named input.
    pub fn missing_columns(source_name: &str, columns: Vec<String>) -> Self {
        DealsError::MissingColumns {
            source_name: source_name.to_string(),
            columns,
        }
    }
}
