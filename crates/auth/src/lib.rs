//! `shepherd-auth` — permission-based access gating for protected regions.
//!
//! This crate is intentionally decoupled from rendering, routing and storage:
//! callers supply an [`AuthState`] and receive an [`AccessOutcome`] to act on.

pub mod authorize;
pub mod criteria;
pub mod guards;
pub mod permissions;
pub mod roles;
pub mod session;

pub use authorize::{
    AccessController, AccessDecision, AccessExplanation, AccessOutcome, DenialKind, Guard,
};
pub use criteria::{AccessCriteria, CriteriaSpec};
pub use guards::{leadership_guard, module_access, module_view_guard};
pub use permissions::{Permission, PermissionSet};
pub use roles::{LeadershipFlags, LeadershipRole};
pub use session::{Actor, ActorSession, AuthState};
