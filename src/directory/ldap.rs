//! LDAP-backed directory adapter.
//!
//! Users are `inetOrgPerson` entries under the configured people
//! subtree; groups are `groupOfNames` entries holding member dns.
//! Account enablement follows the 389-DS `nsAccountLock` convention.

use async_trait::async_trait;
use ldap3::adapters::{Adapter, EntriesOnly, PagedResults};
use ldap3::{Ldap as LdapHandle, LdapConnAsync, LdapError, Mod, Scope, SearchEntry};
use std::collections::{BTreeSet, HashSet};

use crate::config::DirectoryConfig;
use crate::directory::model::{fold_attribute_pairs, DirectoryUser, Group};
use crate::directory::{
    DirectoryError, DirectoryResult, DirectoryService, DirectoryStatus, GroupPage, NewUser,
    UserPage,
};

// LDAP result codes this adapter classifies.
const RC_NO_SUCH_OBJECT: u32 = 32;
const RC_ATTR_OR_VALUE_EXISTS: u32 = 20;
const RC_ENTRY_ALREADY_EXISTS: u32 = 68;

/// Snapshot attribute name to LDAP attribute type, both directions.
const ATTRIBUTE_MAP: &[(&str, &str)] = &[
    ("email", "mail"),
    ("name", "cn"),
    ("telephone", "telephoneNumber"),
    ("region", "st"),
    ("city", "l"),
];

pub struct LdapDirectory {
    config: DirectoryConfig,
}

impl LdapDirectory {
    pub fn new(config: DirectoryConfig) -> DirectoryResult<Self> {
        if !config.user_dn_template.contains("{uid}") {
            return Err(DirectoryError::Service(
                "user dn template must contain {uid}".to_string(),
            ));
        }
        if !config.group_dn_template.contains("{group}") {
            return Err(DirectoryError::Service(
                "group dn template must contain {group}".to_string(),
            ));
        }
        Ok(Self { config })
    }

    fn user_dn(&self, username: &str) -> String {
        self.config
            .user_dn_template
            .replace("{uid}", &escape_ldap(username))
    }

    fn group_dn(&self, group: Group) -> String {
        self.config
            .group_dn_template
            .replace("{group}", group.as_str())
    }

    async fn open(&self) -> DirectoryResult<LdapHandle> {
        let (handle, mut ldap) = LdapConnAsync::new(&self.config.ldap_addr)
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
        ldap3::drive!(handle);

        if let Some(dn) = &self.config.bind_dn {
            let password = self.config.bind_password.as_deref().unwrap_or("");
            ldap.simple_bind(dn, password)
                .await
                .and_then(|r| r.success())
                .map_err(|e| DirectoryError::Unavailable(format!("bind failed: {}", e)))?;
        }

        Ok(ldap)
    }

    fn entry_to_user(entry: SearchEntry) -> DirectoryUser {
        let attributes = fold_attribute_pairs(ATTRIBUTE_MAP.iter().map(|(snapshot_name, ldap_name)| {
            ((*snapshot_name).to_string(), first_attr(&entry, ldap_name))
        }));

        let username = first_attr(&entry, "uid").unwrap_or_else(|| rdn_value(&entry.dn));

        let locked = first_attr(&entry, "nsAccountLock")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let mut groups = BTreeSet::new();
        if let Some(member_of) = entry.attrs.get("memberOf") {
            for dn in member_of {
                if let Some(group) = Group::parse(&rdn_value(dn)) {
                    groups.insert(group);
                }
            }
        }

        DirectoryUser {
            username,
            attributes,
            groups,
            enabled: !locked,
            // Lifecycle state is informational; entries we can read are
            // confirmed accounts.
            status: "CONFIRMED".to_string(),
            mfa_settings: Vec::new(),
            preferred_mfa: None,
        }
    }

    fn user_attrs() -> Vec<&'static str> {
        let mut attrs = vec!["uid", "nsAccountLock", "memberOf"];
        attrs.extend(ATTRIBUTE_MAP.iter().map(|(_, ldap_name)| *ldap_name));
        attrs
    }
}

#[async_trait]
impl DirectoryService for LdapDirectory {
    async fn list_users(&self, _page: Option<String>) -> DirectoryResult<UserPage> {
        let mut ldap = self.open().await?;

        let adapters: Vec<Box<dyn Adapter<_, _>>> = vec![
            Box::new(EntriesOnly::new()),
            Box::new(PagedResults::new(self.config.page_size)),
        ];
        let mut search = ldap
            .streaming_search_with(
                adapters,
                &self.config.users_base_dn,
                Scope::Subtree,
                "(objectClass=inetOrgPerson)",
                Self::user_attrs(),
            )
            .await
            .map_err(|e| map_ldap_error(e, "user listing"))?;

        let mut users = Vec::new();
        loop {
            match search.next().await {
                Ok(Some(entry)) => users.push(Self::entry_to_user(SearchEntry::construct(entry))),
                Ok(None) => break,
                Err(e) => return Err(map_ldap_error(e, "user listing")),
            }
        }
        search
            .finish()
            .await
            .success()
            .map_err(|e| map_ldap_error(e, "user listing"))?;

        // The wire pages are drained here; callers see one logical page.
        Ok(UserPage { users, next: None })
    }

    async fn list_users_in_group(
        &self,
        group: Group,
        _page: Option<String>,
    ) -> DirectoryResult<GroupPage> {
        let mut ldap = self.open().await?;

        let (entries, _) = ldap
            .search(
                &self.group_dn(group),
                Scope::Base,
                "(objectClass=groupOfNames)",
                vec!["member"],
            )
            .await
            .and_then(|r| r.success())
            .map_err(|e| map_ldap_error(e, &format!("group {}", group)))?;

        let mut usernames = Vec::new();
        for entry in entries {
            let entry = SearchEntry::construct(entry);
            if let Some(members) = entry.attrs.get("member") {
                usernames.extend(members.iter().map(|dn| rdn_value(dn)));
            }
        }

        Ok(GroupPage {
            usernames,
            next: None,
        })
    }

    async fn get_user_detail(&self, username: &str) -> DirectoryResult<DirectoryUser> {
        let mut ldap = self.open().await?;

        let filter = format!("(uid={})", escape_ldap(username));
        let (entries, _) = ldap
            .search(
                &self.config.users_base_dn,
                Scope::Subtree,
                &filter,
                Self::user_attrs(),
            )
            .await
            .and_then(|r| r.success())
            .map_err(|e| map_ldap_error(e, &format!("user {}", username)))?;

        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| DirectoryError::NotFound(format!("user {}", username)))?;

        Ok(Self::entry_to_user(SearchEntry::construct(entry)))
    }

    async fn create_user(&self, user: NewUser) -> DirectoryResult<()> {
        let mut ldap = self.open().await?;
        let dn = self.user_dn(&user.username);

        let name = user
            .attributes
            .get("name")
            .cloned()
            .unwrap_or_else(|| user.username.clone());
        let surname = name
            .rsplit(' ')
            .next()
            .unwrap_or(name.as_str())
            .to_string();

        let mut attrs: Vec<(String, HashSet<String>)> = vec![
            (
                "objectClass".to_string(),
                ["top", "person", "organizationalPerson", "inetOrgPerson"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            ),
            ("uid".to_string(), [user.username.clone()].into()),
            ("cn".to_string(), [name].into()),
            ("sn".to_string(), [surname].into()),
            (
                "userPassword".to_string(),
                [user.temporary_password.clone()].into(),
            ),
        ];

        for (snapshot_name, ldap_name) in ATTRIBUTE_MAP {
            if *ldap_name == "cn" {
                continue;
            }
            if let Some(value) = user.attributes.get(*snapshot_name) {
                attrs.push(((*ldap_name).to_string(), [value.clone()].into()));
            }
        }

        // The directory sends no invitations of its own; suppression is
        // implicit here and recorded for parity with the request.
        if user.suppress_invitation {
            tracing::debug!(username = %user.username, "invitation suppressed");
        }

        ldap.add(&dn, attrs)
            .await
            .and_then(|r| r.success())
            .map_err(|e| map_ldap_error(e, &format!("user {}", user.username)))?;

        Ok(())
    }

    async fn set_password(
        &self,
        username: &str,
        password: &str,
        permanent: bool,
    ) -> DirectoryResult<()> {
        let mut ldap = self.open().await?;
        let dn = self.user_dn(username);

        let mut mods = vec![Mod::Replace(
            "userPassword",
            HashSet::from([password]),
        )];
        if !permanent {
            // Force a change at next bind (password policy reset flag).
            mods.push(Mod::Replace("pwdReset", HashSet::from(["TRUE"])));
        }

        ldap.modify(&dn, mods)
            .await
            .and_then(|r| r.success())
            .map_err(|e| map_ldap_error(e, &format!("user {}", username)))?;

        Ok(())
    }

    async fn disable_user(&self, username: &str) -> DirectoryResult<()> {
        let mut ldap = self.open().await?;
        let dn = self.user_dn(username);

        ldap.modify(
            &dn,
            vec![Mod::Replace("nsAccountLock", HashSet::from(["true"]))],
        )
        .await
        .and_then(|r| r.success())
        .map_err(|e| map_ldap_error(e, &format!("user {}", username)))?;

        Ok(())
    }

    async fn add_user_to_group(&self, username: &str, group: Group) -> DirectoryResult<()> {
        let mut ldap = self.open().await?;
        let group_dn = self.group_dn(group);
        let member_dn = self.user_dn(username);

        let outcome = ldap
            .modify(
                &group_dn,
                vec![Mod::Add("member", HashSet::from([member_dn.as_str()]))],
            )
            .await
            .and_then(|r| r.success());

        match outcome {
            Ok(_) => Ok(()),
            // Already a member; the desired state holds.
            Err(LdapError::LdapResult { result }) if result.rc == RC_ATTR_OR_VALUE_EXISTS => Ok(()),
            Err(e) => Err(map_ldap_error(e, &format!("group {}", group))),
        }
    }

    async fn delete_user(&self, username: &str) -> DirectoryResult<()> {
        let mut ldap = self.open().await?;
        let dn = self.user_dn(username);

        ldap.delete(&dn)
            .await
            .and_then(|r| r.success())
            .map_err(|e| map_ldap_error(e, &format!("user {}", username)))?;

        Ok(())
    }

    async fn describe(&self) -> DirectoryResult<DirectoryStatus> {
        let mut ldap = self.open().await?;

        let probe = ldap
            .search(
                &self.config.users_base_dn,
                Scope::Base,
                "(objectClass=*)",
                vec!["dn"],
            )
            .await
            .and_then(|r| r.success());

        match probe {
            Ok(_) => Ok(DirectoryStatus {
                directory_id: self.config.directory_id.clone(),
                active: true,
                detail: format!("base dn {} reachable", self.config.users_base_dn),
            }),
            Err(e) => Ok(DirectoryStatus {
                directory_id: self.config.directory_id.clone(),
                active: false,
                detail: e.to_string(),
            }),
        }
    }
}

fn map_ldap_error(err: LdapError, what: &str) -> DirectoryError {
    match err {
        LdapError::LdapResult { result } if result.rc == RC_NO_SUCH_OBJECT => {
            DirectoryError::NotFound(what.to_string())
        }
        LdapError::LdapResult { result } if result.rc == RC_ENTRY_ALREADY_EXISTS => {
            DirectoryError::AlreadyExists(what.to_string())
        }
        LdapError::LdapResult { result } => {
            DirectoryError::Service(format!("{}: rc={} {}", what, result.rc, result.text))
        }
        other => DirectoryError::Unavailable(other.to_string()),
    }
}

fn first_attr(entry: &SearchEntry, name: &str) -> Option<String> {
    entry.attrs.get(name).and_then(|v| v.first()).cloned()
}

/// Value of the first rdn of a dn, e.g. `uid=alice,ou=people,..` → `alice`.
fn rdn_value(dn: &str) -> String {
    let first = dn.split(',').next().unwrap_or(dn);
    match first.split_once('=') {
        Some((_, value)) => value.trim().to_string(),
        None => first.trim().to_string(),
    }
}

fn escape_ldap(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.as_bytes() {
        match *b {
            b'*' => out.push_str(r"\2a"),
            b'(' => out.push_str(r"\28"),
            b')' => out.push_str(r"\29"),
            b'\\' => out.push_str(r"\5c"),
            0 => out.push_str(r"\00"),
            c => out.push(c as char),
        }
    }
    out
}
