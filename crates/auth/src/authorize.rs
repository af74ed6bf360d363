use chrono::{DateTime, Utc};
use serde::Serialize;

use shepherd_core::ShepherdConfig;

use crate::{AccessCriteria, AuthState};

/// Result of evaluating a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessOutcome<F> {
    /// Render the protected content.
    Allow,
    /// Render the caller-supplied fallback instead.
    RenderFallback(F),
    /// Navigate elsewhere.
    Redirect(String),
}

impl<F> AccessOutcome<F> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Redirect(path) => Some(path),
            _ => None,
        }
    }
}

/// Boolean access decision. Computed per call and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub granted: bool,
}

/// Criteria plus presentation choices for a single protected region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard<F = ()> {
    pub criteria: AccessCriteria,
    pub fallback: Option<F>,
    pub redirect_to: Option<String>,
}

impl<F> Guard<F> {
    pub fn new(criteria: AccessCriteria) -> Self {
        Self {
            criteria,
            fallback: None,
            redirect_to: None,
        }
    }

    pub fn with_fallback(mut self, fallback: F) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        self.redirect_to = Some(path.into());
        self
    }
}

/// Evaluates guards against the current session.
///
/// - No IO
/// - No panics
/// - No memoization (session state may change between calls)
#[derive(Debug, Clone)]
pub struct AccessController {
    login_path: String,
    default_redirect: String,
}

impl Default for AccessController {
    fn default() -> Self {
        Self::new(&ShepherdConfig::default())
    }
}

impl AccessController {
    pub fn new(config: &ShepherdConfig) -> Self {
        Self {
            login_path: config.login_path.clone(),
            default_redirect: config.default_redirect.clone(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn default_redirect(&self) -> &str {
        &self.default_redirect
    }

    /// Raw decision: does the session satisfy `criteria`?
    ///
    /// An unauthenticated session or a missing actor is never granted.
    pub fn check<S>(&self, criteria: &AccessCriteria, session: &S) -> AccessDecision
    where
        S: AuthState + ?Sized,
    {
        let granted =
            session.effective_actor().is_some() && criteria.is_satisfied_by(session.permissions());
        AccessDecision { granted }
    }

    /// Evaluate a guard, short-circuiting in this order:
    ///
    /// 1. not authenticated, or no actor → redirect to login (fallback ignored)
    /// 2. criteria satisfied → allow
    /// 3. fallback supplied → render it
    /// 4. redirect to the guard's target, or the default redirect
    pub fn evaluate<'g, F, S>(&self, guard: &'g Guard<F>, session: &S) -> AccessOutcome<&'g F>
    where
        S: AuthState + ?Sized,
    {
        let decision = self.check(&guard.criteria, session);
        let outcome = self.resolve(
            decision,
            guard.fallback.as_ref(),
            guard.redirect_to.as_deref(),
            session,
        );

        tracing::debug!(
            criteria = ?guard.criteria,
            outcome = outcome_label(&outcome),
            "access guard evaluated"
        );

        outcome
    }

    /// Map an externally computed decision onto the same outcome shape.
    pub(crate) fn resolve<F, S>(
        &self,
        decision: AccessDecision,
        fallback: Option<F>,
        redirect_to: Option<&str>,
        session: &S,
    ) -> AccessOutcome<F>
    where
        S: AuthState + ?Sized,
    {
        if session.effective_actor().is_none() {
            return AccessOutcome::Redirect(self.login_path.clone());
        }
        if decision.granted {
            return AccessOutcome::Allow;
        }
        match fallback {
            Some(fallback) => AccessOutcome::RenderFallback(fallback),
            None => {
                let target = redirect_to.unwrap_or(&self.default_redirect);
                AccessOutcome::Redirect(target.to_string())
            }
        }
    }

    /// Explain why `criteria` is (or would be) granted or denied.
    pub fn explain<S>(&self, criteria: &AccessCriteria, session: &S) -> AccessExplanation
    where
        S: AuthState + ?Sized,
    {
        let held = session.permissions();
        let actor = session.effective_actor();

        let (granted, denial, reason) = if !session.is_authenticated() {
            (
                false,
                Some(DenialKind::Unauthenticated),
                "Session is not authenticated".to_string(),
            )
        } else if actor.is_none() {
            (
                false,
                Some(DenialKind::NoActor),
                "Session is authenticated but carries no actor".to_string(),
            )
        } else {
            match criteria {
                AccessCriteria::None => (
                    false,
                    Some(DenialKind::NoCriteria),
                    "Guard declares no criteria; access is denied by default".to_string(),
                ),
                AccessCriteria::AnyOf(set) if set.is_empty() => (
                    false,
                    Some(DenialKind::EmptyAnyOf),
                    "Guard requires any of an empty set, which no actor can satisfy".to_string(),
                ),
                c if c.is_satisfied_by(held) => {
                    (true, None, format!("Actor satisfies {}", describe(c)))
                }
                c => (
                    false,
                    Some(DenialKind::MissingPermission),
                    format!("Actor does not satisfy {}", describe(c)),
                ),
            }
        };

        let missing = if actor.is_some() {
            criteria.missing(held).iter().map(|p| p.to_string()).collect()
        } else {
            Vec::new()
        };

        AccessExplanation {
            granted,
            reason,
            denial,
            actor_id: actor.map(|a| a.id.to_string()),
            held_permissions: held.iter().map(|p| p.to_string()).collect(),
            missing_permissions: missing,
            evaluated_at: Utc::now(),
        }
    }
}

/// Detailed, serializable explanation of an access decision (audit/debug).
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    pub granted: bool,
    pub reason: String,
    pub denial: Option<DenialKind>,
    pub actor_id: Option<String>,
    pub held_permissions: Vec<String>,
    pub missing_permissions: Vec<String>,
    pub evaluated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    NoActor,
    NoCriteria,
    EmptyAnyOf,
    MissingPermission,
}

fn describe(criteria: &AccessCriteria) -> String {
    let join = |set: &crate::PermissionSet| {
        set.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
    };
    match criteria {
        AccessCriteria::Single(p) => format!("'{p}'"),
        AccessCriteria::AnyOf(set) => format!("any of [{}]", join(set)),
        AccessCriteria::AllOf(set) => format!("all of [{}]", join(set)),
        AccessCriteria::None => "no criteria".to_string(),
    }
}

fn outcome_label<F>(outcome: &AccessOutcome<F>) -> &'static str {
    match outcome {
        AccessOutcome::Allow => "allow",
        AccessOutcome::RenderFallback(_) => "fallback",
        AccessOutcome::Redirect(_) => "redirect",
    }
}

#[cfg(test)]
mod tests {
    use shepherd_core::ActorId;

    use super::*;
    use crate::{Actor, ActorSession, PermissionSet};

    fn session(tokens: &[&str]) -> ActorSession {
        let actor = Actor::new(ActorId::new(), "Deacon Ruth");
        ActorSession::signed_in(actor, tokens.iter().copied().collect())
    }

    fn controller() -> AccessController {
        AccessController::default()
    }

    #[test]
    fn missing_criteria_is_denied() {
        let s = session(&["members:view", "units:view"]);
        assert!(!controller().check(&AccessCriteria::None, &s).granted);

        let guard: Guard = Guard::new(AccessCriteria::None);
        assert_eq!(controller().evaluate(&guard, &s), AccessOutcome::Redirect("/dashboard".into()));
    }

    #[test]
    fn unauthenticated_redirects_to_login_even_with_fallback() {
        let guard = Guard::new(AccessCriteria::AllOf(PermissionSet::new())).with_fallback("denied");
        let outcome = controller().evaluate(&guard, &ActorSession::anonymous());
        assert_eq!(outcome, AccessOutcome::Redirect("/login".into()));
    }

    #[test]
    fn authenticated_without_actor_redirects_to_login() {
        let s = ActorSession {
            is_authenticated: true,
            actor: None,
            permissions: ["members:view"].into_iter().collect(),
        };
        let guard = Guard::new(AccessCriteria::single("members:view")).with_fallback(0u8);
        assert_eq!(controller().evaluate(&guard, &s), AccessOutcome::Redirect("/login".into()));
    }

    #[test]
    fn fallback_wins_over_redirect() {
        let s = session(&["units:view"]);

        let with_fallback =
            Guard::new(AccessCriteria::single("members:view")).with_fallback("no access");
        assert_eq!(
            controller().evaluate(&with_fallback, &s),
            AccessOutcome::RenderFallback(&"no access")
        );

        let bare: Guard = Guard::new(AccessCriteria::single("members:view"));
        assert_eq!(controller().evaluate(&bare, &s), AccessOutcome::Redirect("/dashboard".into()));

        let custom: Guard =
            Guard::new(AccessCriteria::single("members:view")).redirect_to("/members");
        assert_eq!(controller().evaluate(&custom, &s).redirect_target(), Some("/members"));
    }

    #[test]
    fn grants_render_content() {
        let s = session(&["members:view", "units:view"]);
        let guard: Guard = Guard::new(AccessCriteria::all_of(["members:view", "units:view"]));
        assert!(controller().evaluate(&guard, &s).is_allowed());
    }

    #[test]
    fn configured_paths_are_used() {
        let config = ShepherdConfig {
            login_path: "/auth/sign-in".into(),
            default_redirect: "/home".into(),
            ..ShepherdConfig::default()
        };
        let controller = AccessController::new(&config);
        assert_eq!(controller.login_path(), "/auth/sign-in");
        assert_eq!(controller.default_redirect(), "/home");

        let guard: Guard = Guard::new(AccessCriteria::single("finance:approve"));

        assert_eq!(
            controller.evaluate(&guard, &ActorSession::anonymous()),
            AccessOutcome::Redirect("/auth/sign-in".into())
        );
        assert_eq!(
            controller.evaluate(&guard, &session(&[])),
            AccessOutcome::Redirect("/home".into())
        );
    }

    #[test]
    fn decisions_track_session_changes() {
        let controller = controller();
        let guard: Guard = Guard::new(AccessCriteria::single("roles:update-role"));
        let mut s = session(&[]);

        assert!(!controller.evaluate(&guard, &s).is_allowed());
        s.permissions.insert("roles:update-role".into());
        assert!(controller.evaluate(&guard, &s).is_allowed());
        s.is_authenticated = false;
        assert_eq!(controller.evaluate(&guard, &s), AccessOutcome::Redirect("/login".into()));
    }

    #[test]
    fn explains_missing_permissions() {
        let s = session(&["members:view"]);
        let criteria = AccessCriteria::all_of(["members:view", "finance:approve"]);
        let explanation = controller().explain(&criteria, &s);

        assert!(!explanation.granted);
        assert_eq!(explanation.denial, Some(DenialKind::MissingPermission));
        assert_eq!(explanation.missing_permissions, vec!["finance:approve".to_string()]);
        assert!(explanation.actor_id.is_some());
    }

    #[test]
    fn explains_fail_closed_cases() {
        let s = session(&["members:view"]);
        let c = controller();

        assert_eq!(c.explain(&AccessCriteria::None, &s).denial, Some(DenialKind::NoCriteria));
        assert_eq!(
            c.explain(&AccessCriteria::AnyOf(PermissionSet::new()), &s).denial,
            Some(DenialKind::EmptyAnyOf)
        );
        assert_eq!(
            c.explain(&AccessCriteria::single("members:view"), &ActorSession::anonymous()).denial,
            Some(DenialKind::Unauthenticated)
        );

        let granted = c.explain(&AccessCriteria::AllOf(PermissionSet::new()), &s);
        assert!(granted.granted);
        assert!(granted.denial.is_none());
    }

    #[test]
    fn explanation_serializes_snake_case() {
        let explanation = controller().explain(&AccessCriteria::None, &session(&[]));
        let json = serde_json::to_value(&explanation).unwrap();
        assert_eq!(json["denial"], "no_criteria");
        assert_eq!(json["granted"], false);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn token() -> impl Strategy<Value = String> {
            "[a-z]{1,8}:[a-z-]{1,8}"
        }

        proptest! {
            /// Property: without criteria nothing is granted.
            #[test]
            fn no_criteria_never_grants(held in prop::collection::vec(token(), 1..8)) {
                let s = session(&held.iter().map(String::as_str).collect::<Vec<_>>());
                prop_assert!(!controller().check(&AccessCriteria::None, &s).granted);
            }

            /// Property: signed-out sessions always go to login.
            #[test]
            fn unauthenticated_always_login(
                held in prop::collection::vec(token(), 0..8),
                required in prop::collection::vec(token(), 0..4),
                fallback in any::<Option<u8>>(),
            ) {
                let mut s = session(&held.iter().map(String::as_str).collect::<Vec<_>>());
                s.is_authenticated = false;

                let criteria =
                    AccessCriteria::all_of(required.into_iter().map(crate::Permission::new));
                let guard = Guard { criteria, fallback, redirect_to: None };
                prop_assert_eq!(
                    controller().evaluate(&guard, &s),
                    AccessOutcome::Redirect("/login".into())
                );
            }

            /// Property: ∀ over ∅ holds, ∃ over ∅ does not.
            #[test]
            fn empty_quantifiers(held in prop::collection::vec(token(), 0..8)) {
                let s = session(&held.iter().map(String::as_str).collect::<Vec<_>>());
                let all_of_none = AccessCriteria::AllOf(PermissionSet::new());
                let any_of_none = AccessCriteria::AnyOf(PermissionSet::new());
                prop_assert!(controller().check(&all_of_none, &s).granted);
                prop_assert!(!controller().check(&any_of_none, &s).granted);
            }
        }
    }
}
