//! Identity directory — the administrators an operator can act as.
//!
//! Each identity is a [`UserRecord`] carrying exactly one [`Scope`]. The
//! directory is ordered: the first entry is the default selection. The
//! built-in table stands in for a real user store; anything implementing
//! [`IdentityDirectory`] can replace it without touching callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The slice of the dataset an identity is permitted to see.
///
/// Closed set: anything that is not a grade or a region is kept as
/// `Unrecognized` and sees nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Scope {
    /// Rows whose `grade` equals this value.
    Grade(i64),
    /// Rows whose `region` equals this value (case-sensitive).
    Region(String),
    /// A scope kind this build does not know how to enforce.
    Unrecognized { kind: String, value: String },
}

impl Scope {
    /// The scope kind as it appears in configuration (`grade`, `region`, ...).
    pub fn kind(&self) -> &str {
        match self {
            Self::Grade(_) => "grade",
            Self::Region(_) => "region",
            Self::Unrecognized { kind, .. } => kind,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grade(grade) => write!(f, "grade = {grade}"),
            Self::Region(region) => write!(f, "region = {region}"),
            Self::Unrecognized { kind, value } => write!(f, "{kind} = {value}"),
        }
    }
}

/// An administrator identity. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable identifier; a change of identifier resets the chat.
    pub identifier: String,

    /// Name shown in the selection list
    pub display_name: String,

    /// Free-form role label (e.g. "admin")
    pub role: String,

    /// The access scope
    pub scope: Scope,
}

impl UserRecord {
    pub fn new(
        identifier: impl Into<String>,
        display_name: impl Into<String>,
        role: impl Into<String>,
        scope: Scope,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: display_name.into(),
            role: role.into(),
            scope,
        }
    }
}

/// Lookup capability over the set of selectable identities.
pub trait IdentityDirectory: Send + Sync {
    /// Display names in selection order.
    fn list(&self) -> Vec<String>;

    /// Resolve a display name. Unknown names yield `None`, never an error.
    fn resolve(&self, name: &str) -> Option<UserRecord>;

    /// The identity selected when nothing else was chosen: the first entry.
    fn default_name(&self) -> Option<String> {
        self.list().into_iter().next()
    }
}

/// A fixed, insertion-ordered identity table.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    users: Vec<UserRecord>,
}

impl StaticDirectory {
    /// Build a directory from records, keeping their order.
    ///
    /// Later records with a display name already present are ignored.
    pub fn new(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let mut deduped: Vec<UserRecord> = Vec::new();
        for user in users {
            if deduped.iter().any(|u| u.display_name == user.display_name) {
                tracing::warn!(name = %user.display_name, "Duplicate identity ignored");
                continue;
            }
            deduped.push(user);
        }
        Self { users: deduped }
    }

    /// The built-in administrator table.
    pub fn builtin() -> Self {
        Self::new([
            UserRecord::new("u001", "Ms. Davis (Grade 8 Admin)", "admin", Scope::Grade(8)),
            UserRecord::new("u002", "Mr. Chen (Grade 9 Admin)", "admin", Scope::Grade(9)),
            UserRecord::new(
                "u003",
                "Mrs. Iqbal (North Region)",
                "admin",
                Scope::Region("North".into()),
            ),
            UserRecord::new("u004", "Mr. Frank (Grade 10 Admin)", "admin", Scope::Grade(10)),
        ])
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl IdentityDirectory for StaticDirectory {
    fn list(&self) -> Vec<String> {
        self.users.iter().map(|u| u.display_name.clone()).collect()
    }

    fn resolve(&self, name: &str) -> Option<UserRecord> {
        self.users.iter().find(|u| u.display_name == name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order_is_preserved() {
        let dir = StaticDirectory::builtin();
        assert_eq!(
            dir.list(),
            vec![
                "Ms. Davis (Grade 8 Admin)",
                "Mr. Chen (Grade 9 Admin)",
                "Mrs. Iqbal (North Region)",
                "Mr. Frank (Grade 10 Admin)",
            ]
        );
        assert_eq!(dir.default_name().as_deref(), Some("Ms. Davis (Grade 8 Admin)"));
    }

    #[test]
    fn resolve_known_name() {
        let dir = StaticDirectory::builtin();
        let user = dir.resolve("Mrs. Iqbal (North Region)").unwrap();
        assert_eq!(user.identifier, "u003");
        assert_eq!(user.scope, Scope::Region("North".into()));
    }

    #[test]
    fn resolve_unknown_name_is_absent() {
        let dir = StaticDirectory::builtin();
        assert!(dir.resolve("Principal Skinner").is_none());
    }

    #[test]
    fn empty_directory_has_no_default() {
        let dir = StaticDirectory::default();
        assert!(dir.default_name().is_none());
        assert!(dir.is_empty());
    }

    #[test]
    fn duplicate_display_names_keep_first() {
        let dir = StaticDirectory::new([
            UserRecord::new("a", "Same", "admin", Scope::Grade(1)),
            UserRecord::new("b", "Same", "admin", Scope::Grade(2)),
        ]);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.resolve("Same").unwrap().identifier, "a");
    }

    #[test]
    fn scope_display() {
        assert_eq!(Scope::Grade(8).to_string(), "grade = 8");
        assert_eq!(Scope::Region("North".into()).to_string(), "region = North");
        let odd = Scope::Unrecognized {
            kind: "district".into(),
            value: "7".into(),
        };
        assert_eq!(odd.to_string(), "district = 7");
        assert_eq!(odd.kind(), "district");
    }
}
