use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, Role};

/// Authenticated state stored in a client's session after login.
///
/// Expiry is evaluated lazily against `expires_at` on every read, so a
/// flushed session can never be revived by a pending timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Account the session was opened for. A re-registered username gets a
    /// new id, so a stale session never carries over to it.
    pub account_id: AccountId,

    pub username: String,

    /// Roles granted to the account at login time.
    pub roles: Vec<Role>,

    pub current_role: Role,

    pub logged_in_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Role {0} is not granted to this account")]
pub struct RoleNotGranted(pub Role);

impl AuthSession {
    /// Starts a session acting under the account's first role.
    #[must_use]
    pub fn start(
        account_id: AccountId,
        username: String,
        roles: Vec<Role>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let current_role = roles.first().copied().unwrap_or_default();
        Self {
            account_id,
            username,
            roles,
            current_role,
            logged_in_at: now,
            expires_at: now + ttl,
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Switch the active role. Only roles held by the account are accepted.
    pub fn select_role(&mut self, role: Role) -> Result<(), RoleNotGranted> {
        if !self.roles.contains(&role) {
            return Err(RoleNotGranted(role));
        }
        self.current_role = role;
        Ok(())
    }

    /// Refresh the granted roles, falling back to the first one if the
    /// active role was revoked in the meantime.
    pub fn sync_roles(&mut self, roles: Vec<Role>) {
        if !roles.contains(&self.current_role) {
            self.current_role = roles.first().copied().unwrap_or_default();
        }
        self.roles = roles;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(roles: Vec<Role>) -> AuthSession {
        AuthSession::start(
            AccountId::new(1),
            "a@x.com".to_string(),
            roles,
            Utc::now(),
            Duration::hours(24),
        )
    }

    #[test]
    fn test_start_uses_first_role() {
        let s = session(vec![Role::MarketingManager, Role::Viewer]);
        assert_eq!(s.current_role, Role::MarketingManager);
        assert_eq!(s.expires_at - s.logged_in_at, Duration::hours(24));
    }

    #[test]
    fn test_start_without_roles_defaults_to_viewer() {
        assert_eq!(session(Vec::new()).current_role, Role::Viewer);
    }

    #[test]
    fn test_expiry_is_checked_against_deadline() {
        let s = session(vec![Role::Viewer]);
        assert!(!s.is_expired(s.logged_in_at));
        assert!(!s.is_expired(s.expires_at - Duration::seconds(1)));
        assert!(s.is_expired(s.expires_at));
    }

    #[test]
    fn test_select_role_requires_grant() {
        let mut s = session(vec![Role::Viewer, Role::ContentEditor]);
        assert!(s.select_role(Role::ContentEditor).is_ok());
        assert_eq!(s.current_role, Role::ContentEditor);

        assert_eq!(
            s.select_role(Role::MarketingManager),
            Err(RoleNotGranted(Role::MarketingManager))
        );
        assert_eq!(s.current_role, Role::ContentEditor);
    }

    #[test]
    fn test_sync_roles_drops_revoked_current_role() {
        let mut s = session(vec![Role::Viewer, Role::ContentEditor]);
        s.select_role(Role::ContentEditor).unwrap();
        s.sync_roles(vec![Role::Viewer]);
        assert_eq!(s.current_role, Role::Viewer);
        assert_eq!(s.roles, vec![Role::Viewer]);
    }
}
