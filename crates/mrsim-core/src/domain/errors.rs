use crate::common::quantity::Dimension;

pub type MrsimResult<T> = Result<T, MrsimError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    InputValidationError,
    IoSystemError,
    ComputationError,
}

impl ErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ComputationError => 4,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ComputationError => "ComputationError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MrsimError {
    #[error("expected {expected} for '{field}', found {found}")]
    UnitMismatch {
        field: String,
        expected: Dimension,
        found: Dimension,
    },
    #[error("invalid quantity '{text}' for '{field}': {reason}")]
    InvalidQuantity {
        field: String,
        text: String,
        reason: String,
    },
    #[error("unknown isotope '{symbol}'{}", field_suffix(.field))]
    UnknownIsotope { field: String, symbol: String },
    #[error("failed to simulate the {nucleus} spectrum: no spin properties are known for it")]
    UnsupportedNucleus { nucleus: String },
    #[error("invalid value for '{field}': expected {expected}, found {found}")]
    Validation {
        field: String,
        expected: String,
        found: String,
    },
    #[error("missing required key '{key}' in {context}")]
    Schema { key: String, context: String },
    #[error("failed to retrieve '{location}': {reason}")]
    SourceNotFound { location: String, reason: String },
    #[error("malformed JSON in '{location}': {reason}")]
    MalformedJson { location: String, reason: String },
    #[error("{requirement} required for simulation")]
    Precondition { requirement: &'static str },
    #[error("`{attribute}` attribute cannot be modified for {method} method")]
    FrozenAttribute { attribute: String, method: String },
}

impl MrsimError {
    pub fn validation(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn schema(key: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Schema {
            key: key.into(),
            context: context.into(),
        }
    }

    pub fn source_not_found(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceNotFound {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub fn frozen_attribute(attribute: impl Into<String>, method: impl Into<String>) -> Self {
        Self::FrozenAttribute {
            attribute: attribute.into(),
            method: method.into(),
        }
    }

    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::UnitMismatch { .. }
            | Self::InvalidQuantity { .. }
            | Self::UnknownIsotope { .. }
            | Self::UnsupportedNucleus { .. }
            | Self::Validation { .. }
            | Self::Schema { .. }
            | Self::FrozenAttribute { .. } => ErrorCategory::InputValidationError,
            Self::SourceNotFound { .. } | Self::MalformedJson { .. } => {
                ErrorCategory::IoSystemError
            }
            Self::Precondition { .. } => ErrorCategory::ComputationError,
        }
    }

    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::UnitMismatch { .. } => "INPUT.UNIT_MISMATCH",
            Self::InvalidQuantity { .. } => "INPUT.INVALID_QUANTITY",
            Self::UnknownIsotope { .. } => "INPUT.UNKNOWN_ISOTOPE",
            Self::UnsupportedNucleus { .. } => "INPUT.UNSUPPORTED_NUCLEUS",
            Self::Validation { .. } => "INPUT.VALIDATION",
            Self::Schema { .. } => "INPUT.SCHEMA",
            Self::FrozenAttribute { .. } => "INPUT.FROZEN_ATTRIBUTE",
            Self::SourceNotFound { .. } => "IO.SOURCE_NOT_FOUND",
            Self::MalformedJson { .. } => "IO.MALFORMED_JSON",
            Self::Precondition { .. } => "RUN.PRECONDITION",
        }
    }

    pub const fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    /// The offending field for errors that are tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnitMismatch { field, .. }
            | Self::InvalidQuantity { field, .. }
            | Self::UnknownIsotope { field, .. }
            | Self::Validation { field, .. } => Some(field),
            Self::Schema { key, .. } => Some(key),
            Self::FrozenAttribute { attribute, .. } => Some(attribute),
            _ => None,
        }
    }

    /// Replaces the field of a field-bearing error.
    pub fn with_field(mut self, name: &str) -> Self {
        if let Self::UnitMismatch { field, .. }
        | Self::InvalidQuantity { field, .. }
        | Self::UnknownIsotope { field, .. }
        | Self::Validation { field, .. } = &mut self
        {
            *field = name.to_string();
        }
        self
    }

    /// Prefixes the field path with `scope`, e.g. `sites[0]` + `isotope_symbol`.
    pub fn in_scope(self, scope: &str) -> Self {
        if scope.is_empty() {
            return self;
        }
        match self {
            Self::UnitMismatch {
                field,
                expected,
                found,
            } => Self::UnitMismatch {
                field: join_path(scope, &field),
                expected,
                found,
            },
            Self::InvalidQuantity {
                field,
                text,
                reason,
            } => Self::InvalidQuantity {
                field: join_path(scope, &field),
                text,
                reason,
            },
            Self::UnknownIsotope { field, symbol } => Self::UnknownIsotope {
                field: join_path(scope, &field),
                symbol,
            },
            Self::Validation {
                field,
                expected,
                found,
            } => Self::Validation {
                field: join_path(scope, &field),
                expected,
                found,
            },
            Self::Schema { key, context } => Self::Schema {
                key: join_path(scope, &key),
                context,
            },
            other => other,
        }
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder(), self)
    }
}

fn field_suffix(field: &str) -> String {
    if field.is_empty() {
        String::new()
    } else {
        format!(" for '{field}'")
    }
}

pub(crate) fn join_path(scope: &str, field: &str) -> String {
    match (scope.is_empty(), field.is_empty()) {
        (true, _) => field.to_string(),
        (false, true) => scope.to_string(),
        (false, false) if field.starts_with('[') => format!("{scope}{field}"),
        (false, false) => format!("{scope}.{field}"),
    }
}
