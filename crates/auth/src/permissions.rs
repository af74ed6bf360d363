use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Permission token.
///
/// Tokens are flat, case-sensitive strings of the form `"<module>:<action>"`
/// (e.g. `"members:view"`, `"roles:update-role"`). The access layer attaches no
/// further structure to them; `module()`/`action()` are conveniences for
/// callers that want to group tokens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The `"<module>:view"` token for a module.
    pub fn view(module: &str) -> Self {
        Self(Cow::Owned(format!("{module}:view")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part before the first `:` (the whole token if there is none).
    pub fn module(&self) -> &str {
        self.as_str().split_once(':').map_or(self.as_str(), |(m, _)| m)
    }

    /// Part after the first `:`, if any.
    pub fn action(&self) -> Option<&str> {
        self.as_str().split_once(':').map(|(_, a)| a)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

/// Set of permission tokens held by an actor or required by a guard.
///
/// Ordered so that explanations and logs list tokens deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.0.contains(permission)
    }

    /// ∃ p ∈ `required`: p is held. False for an empty `required`.
    pub fn contains_any(&self, required: &PermissionSet) -> bool {
        required.iter().any(|p| self.contains(p))
    }

    /// ∀ p ∈ `required`: p is held. True for an empty `required`.
    pub fn contains_all(&self, required: &PermissionSet) -> bool {
        required.iter().all(|p| self.contains(p))
    }

    /// Tokens of `required` not held by this set.
    pub fn missing_from(&self, required: &PermissionSet) -> Vec<Permission> {
        required.iter().filter(|p| !self.contains(p)).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(|p| Permission::new(p.to_string())).collect())
    }
}

impl Extend<Permission> for PermissionSet {
    fn extend<I: IntoIterator<Item = Permission>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for PermissionSet {
    type Item = Permission;
    type IntoIter = std::collections::btree_set::IntoIter<Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
