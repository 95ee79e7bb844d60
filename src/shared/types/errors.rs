use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("{entity} {id} is not available for new subscriptions")]
    Inactive { entity: &'static str, id: String },
}

impl DomainError {
    pub fn not_found(entity: &'static str, value: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            field: "id",
            value: value.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = DomainError::not_found("Plan", "enterprise");
        assert_eq!(err.to_string(), "Not found: Plan with id=enterprise");
    }

    #[test]
    fn app_error_is_transparent() {
        let err: AppError = DomainError::Validation("bad".into()).into();
        assert_eq!(err.to_string(), "Validation: bad");

        let err: AppError = InfraError::Config("port must be non-zero".into()).into();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: port must be non-zero"
        );
    }

    #[test]
    fn json_errors_convert_into_infra_serialization() {
        // JSON object keys must be strings
        fn encode() -> Result<String, InfraError> {
            let map = std::collections::BTreeMap::from([(vec![1u8], 1)]);
            Ok(serde_json::to_string(&map)?)
        }

        let err: AppError = encode().unwrap_err().into();
        assert!(matches!(err, AppError::Infra(InfraError::Serialization(_))));
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}
