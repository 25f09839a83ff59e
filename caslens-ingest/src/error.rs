use thiserror::Error;

/// Conditions that abort a statement parse. Everything else inside the line
/// scan is absorbed; an empty result is not an error.
#[derive(Debug, Error)]
pub enum CasError {
    #[error("Incorrect Password")]
    IncorrectPassword,

    #[error(
        "Unsupported statement: page 1 header does not contain '{marker}'. \
         Please upload the Summary type CAS PDF."
    )]
    UnsupportedStatement { marker: String },

    #[error("Unsupported PDF encryption: {0}")]
    UnsupportedEncryption(String),

    #[error("Unreadable PDF: {0}")]
    Unreadable(String),

    #[error("Text extraction failed on page {page}: {reason}")]
    PageText { page: usize, reason: String },

    #[error("Invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl CasError {
    /// Input rejections the user can fix by choosing another password or file
    pub fn is_input_rejection(&self) -> bool {
        matches!(
            self,
            CasError::IncorrectPassword
                | CasError::UnsupportedStatement { .. }
                | CasError::UnsupportedEncryption(_)
                | CasError::Unreadable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CasError>;
