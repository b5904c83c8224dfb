/// Errors from fallible domain operations (rule parsing, parameter checks).
///
/// Classification itself never fails; see the individual modules.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}
