pub mod error;
pub mod result;
pub mod submission;

pub use error::{
    DiagnosisError, FailureKind, Result, ValidationError, ValidationErrorKind, panic_message,
};
pub use result::{ProcessResult, ReportMetadata, checksum, submission_id};
pub use submission::{
    AiContext, Category, CategoryRatings, CompanyProfile, ContactInfo, Submission,
    SubmissionMetadata, is_valid_rating,
};

#[cfg(test)]
pub(crate) use submission::fixtures;
