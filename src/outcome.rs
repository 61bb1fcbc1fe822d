use std::fmt::{self, Display, Formatter};

/// Severity of a single error reported by the source computation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// One structured error description carried by a domain failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorInfo {
    pub severity: Severity,
    pub message: String,
}

impl ErrorInfo {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Warning => write!(f, "warning: {}", self.message),
            Severity::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// The outcome union produced by a source future.
///
/// A successful computation may carry no payload at all (a void result).
/// `Failure` means the computation finished but reports application-level
/// errors instead of data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceOutcome<S> {
    Success(Option<S>),
    Failure(Vec<ErrorInfo>),
}

impl<S> SourceOutcome<S> {
    pub fn success(payload: S) -> Self {
        Self::Success(Some(payload))
    }

    pub fn empty_success() -> Self {
        Self::Success(None)
    }

    pub fn failure(errors: Vec<ErrorInfo>) -> Self {
        Self::Failure(errors)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// The outcome exposed by the adapter after conversion.
///
/// A successful source outcome without a usable payload becomes the explicit
/// `Empty` marker rather than an unset value, so "completed with no data" is
/// never ambiguous.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transformed<T> {
    Data(T),
    Empty,
    Failed(Vec<ErrorInfo>),
}

impl<T> Transformed<T> {
    pub fn is_successful(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// The converted payload, if there is one.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    /// The carried error descriptions. Empty unless this is a `Failed`
    /// outcome.
    pub fn errors(&self) -> &[ErrorInfo] {
        match self {
            Self::Failed(errors) => errors,
            _ => &[],
        }
    }
}
