use {crate::outcome::ErrorInfo, thiserror::Error};

/// The converter was handed a payload it cannot turn into the target
/// representation. The adapter reports this as a failed outcome, never as a
/// panic.
#[derive(Clone, Debug, Error)]
#[error("cannot convert payload: {reason}")]
pub struct ConvertError {
    reason: String,
}

impl ConvertError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A pure mapping from source payloads to the adapter's result type.
///
/// `recognizes` is a runtime capability check: a source future is allowed to
/// complete with a payload outside the converter's domain (for example a
/// bare acknowledgement), and the adapter must detect that by asking rather
/// than by assuming the payload shape.
pub trait Transform<S, T> {
    fn recognizes(&self, payload: &S) -> bool;

    fn convert(&self, payload: &S) -> Result<T, ConvertError>;

    /// Maps source error descriptions into the target domain. The default
    /// carries them over unchanged.
    fn convert_errors(&self, errors: &[ErrorInfo]) -> Vec<ErrorInfo> {
        errors.to_vec()
    }
}
