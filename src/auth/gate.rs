//! Access gate for protected dashboard views.
//!
//! Every protected command runs one authorization check before any data
//! fetch. The check reaches exactly one terminal decision; nothing is
//! cached between invocations, so each run re-verifies from scratch.

use crate::api::{ApiClient, ApiError};
use crate::auth::identity::Identity;
use tracing::{debug, error};

/// Required-role alias set for one protected view.
///
/// Aliases are lower-case and include the localized tokens the identity
/// provider has used for the same role over time.
#[derive(Debug, Clone, Copy)]
pub struct RolePolicy {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

/// Accepts any token meaning "curator".
pub const CURATOR_POLICY: RolePolicy = RolePolicy {
    name: "curator",
    aliases: &["curators", "кураторы"],
};

/// Accepts any token meaning "administrator".
pub const ADMIN_POLICY: RolePolicy = RolePolicy {
    name: "admin",
    aliases: &["admins", "администраторы", "admin"],
};

/// Terminal outcome of one authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Role matched; protected data may be fetched.
    Granted(Identity),
    /// Authenticated but lacking the required role, or the identity
    /// fetch failed for a non-auth reason. Never redirects.
    Denied,
    /// Session missing or expired; the caller should send the user to
    /// the login flow and return to this path afterwards.
    RedirectToLogin { return_path: String },
}

/// Pure decision over an already-fetched identity.
pub fn decide(identity: Identity, policy: &RolePolicy) -> AccessDecision {
    if identity.has_any(policy.aliases) {
        AccessDecision::Granted(identity)
    } else {
        AccessDecision::Denied
    }
}

/// Classify an identity-fetch failure.
///
/// Only an authentication-missing response redirects; every other
/// failure denies, so a valid session lacking the role (or a flaky
/// server) can never cause a redirect loop.
pub fn decide_on_error(error: &ApiError, return_path: &str) -> AccessDecision {
    match error {
        ApiError::AuthenticationMissing => AccessDecision::RedirectToLogin {
            return_path: return_path.to_string(),
        },
        other => {
            error!("identity check failed, denying access: {}", other);
            AccessDecision::Denied
        }
    }
}

/// Run the full authorization check: fetch identity, normalize, decide.
pub async fn authorize(
    client: &ApiClient,
    policy: &RolePolicy,
    return_path: &str,
) -> AccessDecision {
    match client.current_user().await {
        Ok(response) => {
            let identity = Identity::from_response(&response);
            debug!(
                policy = policy.name,
                roles = ?identity.role_tokens,
                groups = ?identity.group_tokens,
                "identity resolved"
            );
            decide(identity, policy)
        }
        Err(e) => decide_on_error(&e, return_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawClaims, UserInfo, UserResponse};

    fn identity(roles: Vec<&str>, groups: Vec<&str>) -> Identity {
        Identity::from_response(&UserResponse {
            user: UserInfo {
                id: "subject-1".to_string(),
                username: String::new(),
                roles: roles.into_iter().map(String::from).collect(),
                raw: RawClaims {
                    groups: groups.into_iter().map(String::from).collect(),
                },
            },
        })
    }

    #[test]
    fn test_granted_via_explicit_role() {
        let decision = decide(identity(vec!["Curators"], vec![]), &CURATOR_POLICY);
        assert!(matches!(decision, AccessDecision::Granted(_)));
    }

    #[test]
    fn test_granted_via_group_path() {
        let decision = decide(identity(vec![], vec!["/org/Curators"]), &CURATOR_POLICY);
        assert!(matches!(decision, AccessDecision::Granted(_)));
    }

    #[test]
    fn test_granted_via_localized_alias() {
        let decision = decide(identity(vec!["Администраторы"], vec![]), &ADMIN_POLICY);
        assert!(matches!(decision, AccessDecision::Granted(_)));
    }

    #[test]
    fn test_admin_example_from_service() {
        let decision = decide(identity(vec!["admins"], vec![]), &ADMIN_POLICY);
        assert!(matches!(decision, AccessDecision::Granted(_)));
    }

    #[test]
    fn test_denied_without_redirect() {
        let decision = decide(identity(vec!["students"], vec!["/org/Students"]), &CURATOR_POLICY);
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn test_authentication_missing_redirects_with_return_path() {
        let decision = decide_on_error(&ApiError::AuthenticationMissing, "/curator");
        assert_eq!(
            decision,
            AccessDecision::RedirectToLogin {
                return_path: "/curator".to_string()
            }
        );
    }

    #[test]
    fn test_other_failures_deny_as_failsafe() {
        let error = ApiError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        assert_eq!(decide_on_error(&error, "/admin"), AccessDecision::Denied);

        let decode = ApiError::Decode {
            endpoint: "/auth/user".to_string(),
            message: "missing field".to_string(),
        };
        assert_eq!(decide_on_error(&decode, "/admin"), AccessDecision::Denied);
    }

    #[test]
    fn test_curator_policy_does_not_grant_admin() {
        let decision = decide(identity(vec!["curators"], vec![]), &ADMIN_POLICY);
        assert_eq!(decision, AccessDecision::Denied);
    }
}
