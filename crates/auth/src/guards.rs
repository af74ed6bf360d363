//! Named guards built on [`AccessController`].
//!
//! Each is a fixed composition over the same decision algorithm and yields the
//! same three-way [`AccessOutcome`].

use crate::{
    AccessController, AccessCriteria, AccessDecision, AccessOutcome, AuthState, Guard,
    LeadershipFlags, Permission,
};

/// Guard requiring `"<module>:view"`.
pub fn module_view_guard<F>(module: &str) -> Guard<F> {
    Guard::new(AccessCriteria::Single(Permission::view(module)))
}

/// Guard admitting any of the enabled leadership roles.
///
/// With every flag off this is `AnyOf(∅)` and denies everyone.
pub fn leadership_guard<F>(flags: LeadershipFlags) -> Guard<F> {
    Guard::new(AccessCriteria::AnyOf(flags.permissions()))
}

/// Module-level gate delegating the decision to
/// [`AuthState::can_access_module`] instead of a raw token.
///
/// Login precedence and the fallback/redirect rules match
/// [`AccessController::evaluate`]; `redirect_to` overrides the default
/// redirect like [`Guard::redirect_to`].
pub fn module_access<'f, F, S>(
    controller: &AccessController,
    module: &str,
    fallback: Option<&'f F>,
    redirect_to: Option<&str>,
    session: &S,
) -> AccessOutcome<&'f F>
where
    S: AuthState + ?Sized,
{
    let granted = session.effective_actor().is_some() && session.can_access_module(module);
    let outcome = controller.resolve(AccessDecision { granted }, fallback, redirect_to, session);

    tracing::debug!(module, granted, "module access evaluated");

    outcome
}
