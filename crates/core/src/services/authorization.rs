//! Caller identity and the administrator capability.
//!
//! Decision operations take an [`AdminCapability`] argument. The only way to
//! obtain one is [`Identity::require_admin`], so the role check happens once,
//! up front, and cannot be skipped by a call site.

use inkpost_common::{AppError, AppResult};
use inkpost_db::entities::user::{self, UserRole};

/// Authenticated caller as supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: String,
    role: UserRole,
}

impl Identity {
    /// Create an identity for an already-authenticated caller.
    #[must_use]
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// ID of the caller's user record.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Caller's role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Whether the caller holds the administrator role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Check the administrator role and hand out the capability.
    pub fn require_admin(&self) -> AppResult<AdminCapability> {
        if self.is_admin() {
            Ok(AdminCapability {
                admin_id: self.user_id.clone(),
            })
        } else {
            Err(AppError::Forbidden(
                "Only administrators can review profiles".to_string(),
            ))
        }
    }

    /// Check that the caller owns `user_id`.
    pub fn require_owner(&self, user_id: &str) -> AppResult<()> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You can only change your own profile".to_string(),
            ))
        }
    }
}

impl From<&user::Model> for Identity {
    fn from(user: &user::Model) -> Self {
        Self::new(user.id.clone(), user.role)
    }
}

/// Proof that the caller passed the administrator check.
#[derive(Debug, Clone)]
pub struct AdminCapability {
    admin_id: String,
}

impl AdminCapability {
    /// ID of the administrator holding this capability.
    #[must_use]
    pub fn admin_id(&self) -> &str {
        &self.admin_id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_gets_capability() {
        let identity = Identity::new("admin1", UserRole::Admin);
        let cap = identity.require_admin().unwrap();
        assert_eq!(cap.admin_id(), "admin1");
    }

    #[test]
    fn test_user_is_forbidden() {
        let identity = Identity::new("user1", UserRole::User);
        match identity.require_admin() {
            Err(AppError::Forbidden(_)) => {}
            other => panic!("Expected Forbidden, got {other:?}"),
        }
    }

    #[test]
    fn test_require_owner() {
        let identity = Identity::new("user1", UserRole::User);
        assert!(identity.require_owner("user1").is_ok());
        assert!(matches!(
            identity.require_owner("user2"),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admin_is_not_owner_of_others() {
        let identity = Identity::new("admin1", UserRole::Admin);
        assert!(identity.require_owner("user1").is_err());
    }
}
