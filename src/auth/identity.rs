//! Normalized identity derived from the auth response.
//!
//! The identity provider reports membership two ways: an explicit role
//! list, and hierarchical group paths inside the raw claims. Both are
//! normalized to lower-case token sets; either set can satisfy a policy.

use crate::models::UserResponse;
use std::collections::BTreeSet;

/// Comparable role/group token sets for one authenticated user.
///
/// Built once per authentication check; immutable. Identical input
/// always yields an identical identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: String,
    /// Explicit roles, lower-cased.
    pub role_tokens: BTreeSet<String>,
    /// Last non-empty segment of each group path, lower-cased.
    pub group_tokens: BTreeSet<String>,
}

impl Identity {
    /// Build an identity from the `/auth/user` response.
    ///
    /// Absent or empty fields degrade to empty sets, never fail.
    pub fn from_response(response: &UserResponse) -> Self {
        let role_tokens = response
            .user
            .roles
            .iter()
            .map(|r| r.to_lowercase())
            .collect();

        let group_tokens = response
            .user
            .raw
            .groups
            .iter()
            .filter_map(|path| last_path_segment(path))
            .collect();

        Self {
            subject_id: response.user.id.clone(),
            role_tokens,
            group_tokens,
        }
    }

    /// Whether any alias matches either token set (case-insensitive;
    /// aliases are expected lower-case).
    pub fn has_any(&self, aliases: &[&str]) -> bool {
        aliases
            .iter()
            .any(|a| self.role_tokens.contains(*a) || self.group_tokens.contains(*a))
    }
}

/// Last non-empty segment of a slash-delimited group path, lower-cased.
/// `/org/Curators` → `curators`; empty or all-slash paths yield nothing.
fn last_path_segment(path: &str) -> Option<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(|segment| segment.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawClaims, UserInfo};

    fn response(roles: Vec<&str>, groups: Vec<&str>) -> UserResponse {
        UserResponse {
            user: UserInfo {
                id: "subject-1".to_string(),
                username: "test".to_string(),
                roles: roles.into_iter().map(String::from).collect(),
                raw: RawClaims {
                    groups: groups.into_iter().map(String::from).collect(),
                },
            },
        }
    }

    #[test]
    fn test_roles_are_lowercased() {
        let identity = Identity::from_response(&response(vec!["Curators", "АДМИНЫ"], vec![]));
        assert!(identity.role_tokens.contains("curators"));
        assert!(identity.role_tokens.contains("админы"));
    }

    #[test]
    fn test_group_paths_keep_last_segment() {
        let identity = Identity::from_response(&response(
            vec![],
            vec!["/org/Curators", "/a/b/Admins", "plain"],
        ));
        assert!(identity.group_tokens.contains("curators"));
        assert!(identity.group_tokens.contains("admins"));
        assert!(identity.group_tokens.contains("plain"));
    }

    #[test]
    fn test_degenerate_paths_are_skipped() {
        let identity = Identity::from_response(&response(vec![], vec!["", "///"]));
        assert!(identity.group_tokens.is_empty());
    }

    #[test]
    fn test_empty_fields_degrade_to_empty_sets() {
        let identity = Identity::from_response(&response(vec![], vec![]));
        assert!(identity.role_tokens.is_empty());
        assert!(identity.group_tokens.is_empty());
    }

    #[test]
    fn test_identical_input_identical_identity() {
        let r = response(vec!["Curators"], vec!["/org/Admins"]);
        assert_eq!(Identity::from_response(&r), Identity::from_response(&r));
    }

    #[test]
    fn test_has_any_checks_both_sets() {
        let identity = Identity::from_response(&response(vec!["curators"], vec!["/x/Admins"]));
        assert!(identity.has_any(&["curators"]));
        assert!(identity.has_any(&["admins"]));
        assert!(!identity.has_any(&["students"]));
    }
}
