//! Identity normalization and the per-view access gate.

pub mod gate;
pub mod identity;

pub use gate::{authorize, AccessDecision, RolePolicy, ADMIN_POLICY, CURATOR_POLICY};
pub use identity::Identity;
