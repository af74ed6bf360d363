use serde::{Deserialize, Serialize};

use shepherd_core::ActorId;

use crate::PermissionSet;

/// The signed-in identity attempting to view a protected region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub display_name: String,
}

impl Actor {
    pub fn new(id: ActorId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Synchronous view of authentication state, supplied by the host's auth
/// collaborator.
///
/// Any asynchronous session refresh happens before a guard is evaluated; the
/// access layer only reads.
pub trait AuthState {
    fn is_authenticated(&self) -> bool;

    fn actor(&self) -> Option<&Actor>;

    fn permissions(&self) -> &PermissionSet;

    /// Module-level capability, decided by the host rather than a raw token.
    fn can_access_module(&self, module: &str) -> bool;

    /// The actor, masked when the session is not authenticated.
    fn effective_actor(&self) -> Option<&Actor> {
        if self.is_authenticated() { self.actor() } else { None }
    }
}

/// Plain session snapshot.
///
/// `can_access_module` grants a module when any held token belongs to it
/// (e.g. `"finance:approve"` grants `"finance"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSession {
    pub is_authenticated: bool,
    pub actor: Option<Actor>,
    pub permissions: PermissionSet,
}

impl ActorSession {
    /// A signed-out session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(actor: Actor, permissions: PermissionSet) -> Self {
        Self {
            is_authenticated: true,
            actor: Some(actor),
            permissions,
        }
    }
}

impl AuthState for ActorSession {
    fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    fn can_access_module(&self, module: &str) -> bool {
        self.permissions.iter().any(|p| p.module() == module)
    }
}
