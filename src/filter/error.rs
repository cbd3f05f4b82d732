use thiserror::Error;

/// Errors raised while declaring fields or filtering input
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Query parameter data must be a mapping or a query string, got {0}")]
    QueryParameterData(String),

    #[error("Failed to instantiate field: {0}")]
    FieldInstantiation(String),

    #[error("Invalid field value: {0}")]
    FieldValidation(String),

    #[error("Invalid operator argument: {0}")]
    OperatorArgument(String),

    #[error("'{0}' is not a supported operator")]
    UnsupportedOperator(String),

    /// Failure raised by a caller-supplied operator outside the filtering taxonomy
    #[error(transparent)]
    External(#[from] anyhow::Error),
}

/// Coarse classification of a [`FilterError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputShape,
    FieldConfiguration,
    ValueValidation,
    OperatorArgument,
    UnsupportedOperator,
    External,
}

impl ErrorKind {
    /// Kinds that a suppressing filter drops instead of propagating
    pub fn is_suppressible(self) -> bool {
        matches!(
            self,
            ErrorKind::FieldConfiguration | ErrorKind::ValueValidation | ErrorKind::OperatorArgument
        )
    }
}

impl FilterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FilterError::QueryParameterData(_) => ErrorKind::InputShape,
            FilterError::FieldInstantiation(_) => ErrorKind::FieldConfiguration,
            FilterError::FieldValidation(_) => ErrorKind::ValueValidation,
            FilterError::OperatorArgument(_) => ErrorKind::OperatorArgument,
            FilterError::UnsupportedOperator(_) => ErrorKind::UnsupportedOperator,
            FilterError::External(_) => ErrorKind::External,
        }
    }

    pub fn is_suppressible(&self) -> bool {
        self.kind().is_suppressible()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppressible_kinds() {
        assert!(FilterError::FieldValidation("x".into()).is_suppressible());
        assert!(FilterError::OperatorArgument("x".into()).is_suppressible());
        assert!(FilterError::FieldInstantiation("x".into()).is_suppressible());
        assert!(!FilterError::QueryParameterData("x".into()).is_suppressible());
        assert!(!FilterError::UnsupportedOperator("x".into()).is_suppressible());
        assert!(!FilterError::External(anyhow::anyhow!("boom")).is_suppressible());
    }

    #[test]
    fn test_error_messages() {
        let err = FilterError::UnsupportedOperator("between".to_string());
        assert_eq!(err.to_string(), "'between' is not a supported operator");
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperator);
    }
}
