use serde::{Deserialize, Serialize};

use crate::{Permission, PermissionSet};

/// What a protected region requires of the actor.
///
/// `None` is the fail-closed case: a guard without criteria denies everyone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccessCriteria {
    /// Actor must hold exactly this token.
    Single(Permission),
    /// Actor must hold at least one token. An empty set denies.
    AnyOf(PermissionSet),
    /// Actor must hold every token. An empty set grants.
    AllOf(PermissionSet),
    #[default]
    None,
}

impl AccessCriteria {
    pub fn single(permission: impl Into<Permission>) -> Self {
        Self::Single(permission.into())
    }

    pub fn any_of<I, P>(permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self::AnyOf(permissions.into_iter().map(Into::into).collect())
    }

    pub fn all_of<I, P>(permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self::AllOf(permissions.into_iter().map(Into::into).collect())
    }

    /// Pure quantifier check against a held set.
    pub fn is_satisfied_by(&self, held: &PermissionSet) -> bool {
        match self {
            Self::Single(p) => held.contains(p),
            Self::AnyOf(set) => held.contains_any(set),
            Self::AllOf(set) => held.contains_all(set),
            Self::None => false,
        }
    }

    /// Required tokens the actor does not hold.
    pub fn missing(&self, held: &PermissionSet) -> Vec<Permission> {
        match self {
            Self::Single(p) if !held.contains(p) => vec![p.clone()],
            Self::Single(_) | Self::None => Vec::new(),
            Self::AnyOf(set) if held.contains_any(set) => Vec::new(),
            Self::AnyOf(set) | Self::AllOf(set) => held.missing_from(set),
        }
    }
}

/// Loose, declarative form of [`AccessCriteria`] as written in guard tables.
///
/// When several fields are present the precedence is fixed:
/// `permission` > `all` > `any`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CriteriaSpec {
    pub permission: Option<Permission>,
    pub all: Option<Vec<Permission>>,
    pub any: Option<Vec<Permission>>,
}

impl CriteriaSpec {
    /// Number of modes supplied; more than one means precedence applied.
    pub fn modes_supplied(&self) -> usize {
        [self.permission.is_some(), self.all.is_some(), self.any.is_some()]
            .into_iter()
            .filter(|b| *b)
            .count()
    }
}

impl From<CriteriaSpec> for AccessCriteria {
    fn from(spec: CriteriaSpec) -> Self {
        if spec.modes_supplied() > 1 {
            tracing::debug!(
                ?spec,
                "multiple criteria modes supplied; applying permission > all > any"
            );
        }

        match spec {
            CriteriaSpec { permission: Some(p), .. } => Self::Single(p),
            CriteriaSpec { all: Some(all), .. } => Self::AllOf(all.into_iter().collect()),
            CriteriaSpec { any: Some(any), .. } => Self::AnyOf(any.into_iter().collect()),
            _ => Self::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(tokens: &[&str]) -> PermissionSet {
        tokens.iter().copied().collect()
    }

    #[test]
    fn single_requires_exact_token() {
        let c = AccessCriteria::single("members:view");
        assert!(c.is_satisfied_by(&held(&["members:view", "units:view"])));
        assert!(!c.is_satisfied_by(&held(&["units:view"])));
    }

    #[test]
    fn none_never_satisfied() {
        assert!(!AccessCriteria::None.is_satisfied_by(&held(&["members:view"])));
        assert!(!AccessCriteria::default().is_satisfied_by(&PermissionSet::new()));
    }

    #[test]
    fn empty_any_denies_empty_all_grants() {
        let perms = held(&["members:view"]);
        assert!(!AccessCriteria::AnyOf(PermissionSet::new()).is_satisfied_by(&perms));
        assert!(AccessCriteria::AllOf(PermissionSet::new()).is_satisfied_by(&perms));
    }

    #[test]
    fn missing_reports_only_relevant_tokens() {
        let perms = held(&["members:view"]);

        let any = AccessCriteria::any_of(["members:view", "units:view"]);
        assert!(any.missing(&perms).is_empty());

        let all = AccessCriteria::all_of(["members:view", "units:view"]);
        assert_eq!(all.missing(&perms), vec![Permission::new("units:view")]);
    }

    #[test]
    fn spec_precedence_is_permission_then_all_then_any() {
        let spec: CriteriaSpec = serde_json::from_str(
            r#"{"permission": "members:view", "all": ["a:b"], "any": ["c:d"]}"#,
        )
        .unwrap();
        assert_eq!(spec.modes_supplied(), 3);
        assert_eq!(AccessCriteria::from(spec), AccessCriteria::single("members:view"));

        let spec: CriteriaSpec =
            serde_json::from_str(r#"{"all": ["a:b"], "any": ["c:d"]}"#).unwrap();
        assert_eq!(AccessCriteria::from(spec), AccessCriteria::all_of(["a:b"]));

        let spec: CriteriaSpec = serde_json::from_str(r#"{"any": []}"#).unwrap();
        assert_eq!(AccessCriteria::from(spec), AccessCriteria::AnyOf(PermissionSet::new()));
    }

    #[test]
    fn empty_spec_is_fail_closed() {
        let spec: CriteriaSpec = serde_json::from_str("{}").unwrap();
        assert_eq!(AccessCriteria::from(spec), AccessCriteria::None);
    }
}
