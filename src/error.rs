//! Error types for the HR administration engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the directory, leave workflow, access control and
//! payroll engine can report.

use thiserror::Error;

/// The main error type for the HR administration engine.
///
/// All operations return this error type; the HTTP layer maps each variant
/// to a 4xx/5xx response with a structured reason.
///
/// # Example
///
/// ```
/// use hr_admin::error::HrError;
///
/// let error = HrError::NotFound {
///     resource: "leave_request".to_string(),
///     id: "42".to_string(),
/// };
/// assert_eq!(error.to_string(), "leave_request not found: 42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HrError {
    /// Malformed or missing input, including duplicate unique keys.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The caller is authenticated but not allowed to perform the action.
    #[error("Forbidden: cannot {action} {resource}")]
    Forbidden {
        /// The attempted action.
        action: String,
        /// The resource the action targeted.
        resource: String,
    },

    /// The requested resource does not exist (or is not visible to the caller).
    #[error("{resource} not found: {id}")]
    NotFound {
        /// The resource kind.
        resource: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// A leave request state transition was attempted from a terminal state.
    #[error("Leave request {id} has already been processed (status: {status})")]
    InvalidState {
        /// The leave request identifier.
        id: String,
        /// The status the request was found in.
        status: String,
    },

    /// The caller has no linked employee record.
    #[error("The caller has no employee profile")]
    NoEmployeeProfile,

    /// The target month has no standard working days.
    #[error("No standard working days in {month}/{year}")]
    NoWorkingDays {
        /// The target month (1-12).
        month: u32,
        /// The target year.
        year: i32,
    },

    /// The backing store failed to persist or load a record.
    #[error("Persistence error: {message}")]
    Persistence {
        /// A description of the store failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A seed file could not be read or applied.
    #[error("Failed to load seed '{path}': {message}")]
    SeedError {
        /// The seed file path.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

impl HrError {
    /// Shorthand for a [`HrError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        HrError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`HrError::NotFound`].
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        HrError::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    /// Shorthand for a [`HrError::Forbidden`].
    pub fn forbidden(action: impl ToString, resource: impl Into<String>) -> Self {
        HrError::Forbidden {
            action: action.to_string(),
            resource: resource.into(),
        }
    }
}

/// A type alias for Results that return HrError.
pub type HrResult<T> = Result<T, HrError>;
