//! Server-side role checks. The profile's `user_type` decides which side of
//! the marketplace an identity may act on.

use model::entities::profile::{self, UserType};
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::{debug, instrument, warn};

use crate::error::{Result, WorkflowError};

/// Loads the actor's profile and checks it has the required role.
///
/// `action` is used in the error message, e.g. "list campaigns".
#[instrument(skip(db))]
pub async fn require_role(
    db: &DatabaseConnection,
    actor_id: i32,
    role: UserType,
    action: &str,
) -> Result<profile::Model> {
    let Some(profile) = profile::Entity::find_by_id(actor_id).one(db).await? else {
        warn!("Actor {} has no profile and cannot {}", actor_id, action);
        return Err(WorkflowError::Forbidden(format!(
            "a profile is required to {action}"
        )));
    };

    if profile.user_type != role {
        warn!(
            "Actor {} is a {:?} and cannot {}",
            actor_id, profile.user_type, action
        );
        return Err(WorkflowError::Forbidden(format!(
            "only {} accounts can {action}",
            role_label(role)
        )));
    }

    debug!("Actor {} authorized to {}", actor_id, action);
    Ok(profile)
}

fn role_label(role: UserType) -> &'static str {
    match role {
        UserType::Startup => "startup",
        UserType::Seller => "seller",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_profile, setup_db};

    #[tokio::test]
    async fn test_require_role_accepts_matching_profile() {
        let db = setup_db().await;
        seed_profile(&db, 1, UserType::Startup).await;

        let profile = require_role(&db, 1, UserType::Startup, "list campaigns")
            .await
            .unwrap();
        assert_eq!(profile.id, 1);
    }

    #[tokio::test]
    async fn test_require_role_rejects_other_role_and_missing_profile() {
        let db = setup_db().await;
        seed_profile(&db, 2, UserType::Seller).await;

        let wrong_role = require_role(&db, 2, UserType::Startup, "list campaigns").await;
        assert!(matches!(wrong_role, Err(WorkflowError::Forbidden(msg)) if msg.contains("startup")));

        let missing = require_role(&db, 99, UserType::Seller, "apply").await;
        assert!(matches!(missing, Err(WorkflowError::Forbidden(_))));
    }
}
