use model::entities::seller_application::ApplicationStatus;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Error types for the marketplace workflows
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// The actor has no profile yet
    #[error("Profile {0} not found")]
    ProfileNotFound(i32),

    /// Signup was attempted twice for the same identity
    #[error("Profile {0} already exists")]
    ProfileExists(i32),

    #[error("Campaign {0} not found")]
    CampaignNotFound(i32),

    #[error("Application {0} not found")]
    ApplicationNotFound(i32),

    /// The campaign exists but is not listed in the catalog
    #[error("Campaign {0} is not accepting applications")]
    CampaignInactive(i32),

    /// A (campaign, seller) application already exists
    #[error("Seller {seller_id} has already applied to campaign {campaign_id}")]
    AlreadyApplied { campaign_id: i32, seller_id: i32 },

    /// Approved and rejected applications are final
    #[error("Application {application_id} has already been reviewed ({status:?})")]
    AlreadyReviewed {
        application_id: i32,
        status: ApplicationStatus,
    },

    /// Role or ownership check failed
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Input that passed deserialization but breaks a domain rule
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl WorkflowError {
    /// True when `err` comes from a unique index rejecting an insert.
    pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
        matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }
}

/// Type alias for Result with WorkflowError
pub type Result<T> = std::result::Result<T, WorkflowError>;
