//! Catalog loading errors.

/// Errors that can occur when loading a quest catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The catalog JSON is malformed
    #[error("catalog JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two quests share an id
    #[error("duplicate quest id in catalog: {0}")]
    DuplicateId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CatalogError::DuplicateId("by-001".into());
        assert_eq!(err.to_string(), "duplicate quest id in catalog: by-001");

        let err = CatalogError::Io {
            path: "missing.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().starts_with("failed to read catalog missing.json"));
    }
}
