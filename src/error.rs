use thiserror::Error;

/// Errors reserved for programmer misuse and absent-content conversions.
///
/// Classification negatives ("not a number", "not a date") are ordinary
/// boolean results, not errors: they are expected, frequent outcomes of
/// feeding arbitrary text through the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// `append` was given something other than a single character.
    #[error("append expects a single character, got {input:?}")]
    InvalidCharacter {
        /// The offending argument, as passed.
        input: String,
    },

    /// `force_to_number` found nothing numeric to return.
    #[error("no numeric content in buffer")]
    NoNumericContent,

    /// `convert_date` found no span that validates as a calendar date.
    #[error("no date detected in buffer")]
    NoDateFound,
}
