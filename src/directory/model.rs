use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Directory groups that carry privileges. Membership in anything else
/// is ignored by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Group {
    Admin,
    CityOfficial,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Admin => "Admin",
            Group::CityOfficial => "CityOfficial",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Admin" => Some(Group::Admin),
            "CityOfficial" => Some(Group::CityOfficial),
            _ => None,
        }
    }

    pub fn all() -> [Group; 2] {
        [Group::Admin, Group::CityOfficial]
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective role of a user, derived from group membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    CityOfficial,
    Citizen,
}

impl Role {
    /// Admin wins over CityOfficial; no privileged group means Citizen.
    pub fn derive(groups: &BTreeSet<Group>) -> Self {
        if groups.contains(&Group::Admin) {
            Role::Admin
        } else if groups.contains(&Group::CityOfficial) {
            Role::CityOfficial
        } else {
            Role::Citizen
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::CityOfficial => "CityOfficial",
            Role::Citizen => "Citizen",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time snapshot of one directory user. Immutable once
/// persisted; a later backup supersedes the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub username: String,
    pub attributes: BTreeMap<String, String>,
    pub groups: BTreeSet<Group>,
    pub enabled: bool,
    pub status: String,
    #[serde(default)]
    pub mfa_settings: Vec<String>,
    #[serde(default)]
    pub preferred_mfa: Option<String>,
}

impl DirectoryUser {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn role(&self) -> Role {
        Role::derive(&self.groups)
    }
}

/// Fold raw name/value pairs into an attribute map. Pairs without a
/// value are skipped, never an error.
pub fn fold_attribute_pairs<I, S>(pairs: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (S, Option<S>)>,
    S: Into<String>,
{
    pairs
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name.into(), v.into())))
        .collect()
}
