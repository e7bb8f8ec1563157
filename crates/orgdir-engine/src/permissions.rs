//! Permission normalization and effective-permission aggregation.
//!
//! Raw permission identifiers have the form `action_module[_submodule]`
//! (e.g. `edit_hrm_departments`). The leading underscore-delimited
//! token is always read as the action; the remainder is the module
//! path and may itself contain underscores.

use std::collections::{BTreeMap, BTreeSet};

use orgdir_core::error::OrgdirResult;
use orgdir_core::models::role::Role;
use orgdir_core::repository::RoleRepository;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// The seven canonical actions a permission can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Write,
    Create,
    Delete,
    Submit,
    Report,
    Export,
}

impl Action {
    /// Map a raw action token to its canonical action.
    ///
    /// Unknown tokens return `None` and the caller skips the
    /// identifier; malformed grants must never abort aggregation.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "read" | "view" | "access" | "show" => Some(Action::Read),
            "write" | "edit" | "update" => Some(Action::Write),
            "create" | "add" | "store" => Some(Action::Create),
            "delete" | "destroy" | "remove" => Some(Action::Delete),
            "submit" | "approve" => Some(Action::Submit),
            "report" => Some(Action::Report),
            "export" | "download" => Some(Action::Export),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Create => "create",
            Action::Delete => "delete",
            Action::Submit => "submit",
            Action::Report => "report",
            Action::Export => "export",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a raw identifier into `(action, module path)`.
///
/// Splits on the *first* underscore only, so `edit_hrm_departments`
/// yields `(Write, "hrm_departments")`. A module whose own name starts
/// with a verb-like token (e.g. a module literally named `report`)
/// misparses under this rule; that ambiguity is inherited from the
/// identifier format itself.
///
/// Returns `None` for identifiers with no separator, an empty module
/// path, or an unknown action token.
pub fn parse_permission(raw: &str) -> Option<(Action, &str)> {
    let (action_token, module) = raw.split_once('_')?;
    if module.is_empty() {
        return None;
    }
    let action = Action::from_token(action_token)?;
    Some((action, module))
}

/// Per-document grant record: one flag per canonical action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFlags {
    pub read: bool,
    pub write: bool,
    pub create: bool,
    pub delete: bool,
    pub submit: bool,
    pub report: bool,
    pub export: bool,
}

impl ActionFlags {
    pub fn grant(&mut self, action: Action) {
        match action {
            Action::Read => self.read = true,
            Action::Write => self.write = true,
            Action::Create => self.create = true,
            Action::Delete => self.delete = true,
            Action::Submit => self.submit = true,
            Action::Report => self.report = true,
            Action::Export => self.export = true,
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Read => self.read,
            Action::Write => self.write,
            Action::Create => self.create,
            Action::Delete => self.delete,
            Action::Submit => self.submit,
            Action::Report => self.report,
            Action::Export => self.export,
        }
    }
}

/// One document's grants within a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAccess {
    pub document: String,
    pub actions: ActionFlags,
}

/// One module entry of the effective-permission matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleAccess {
    pub module: String,
    pub documents: Vec<DocumentAccess>,
}

/// Merge every permission across `roles` into a module → document →
/// action matrix.
///
/// Identifiers are unioned into a set first, so the same grant held
/// through several roles counts once. Output is sorted alphabetically
/// by module; identical role sets always produce identical output.
/// An empty role set yields an empty matrix.
pub fn effective_permissions(roles: &[Role]) -> Vec<ModuleAccess> {
    let identifiers: BTreeSet<&str> = roles
        .iter()
        .flat_map(|role| role.permissions.iter().map(String::as_str))
        .collect();

    let mut modules: BTreeMap<&str, ActionFlags> = BTreeMap::new();
    for raw in identifiers {
        let Some((action, module)) = parse_permission(raw) else {
            debug!(identifier = raw, "skipping unrecognized permission identifier");
            continue;
        };
        modules.entry(module).or_default().grant(action);
    }

    modules
        .into_iter()
        .map(|(module, actions)| ModuleAccess {
            module: module.to_string(),
            // One document per module today; sub-document grouping
            // slots in here.
            documents: vec![DocumentAccess {
                document: module.to_string(),
                actions,
            }],
        })
        .collect()
}

/// Loads a user's role set and computes the effective matrix.
pub struct PermissionService<R: RoleRepository> {
    role_repo: R,
}

impl<R: RoleRepository> PermissionService<R> {
    pub fn new(role_repo: R) -> Self {
        Self { role_repo }
    }

    pub async fn effective_permissions_for_user(
        &self,
        user_id: Uuid,
    ) -> OrgdirResult<Vec<ModuleAccess>> {
        let roles = self.role_repo.get_user_roles(user_id).await?;
        Ok(effective_permissions(&roles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn role(permissions: &[&str]) -> Role {
        Role {
            id: Uuid::new_v4(),
            name: "test".into(),
            description: String::new(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn action_synonyms_canonicalize() {
        assert_eq!(Action::from_token("view"), Some(Action::Read));
        assert_eq!(Action::from_token("access"), Some(Action::Read));
        assert_eq!(Action::from_token("edit"), Some(Action::Write));
        assert_eq!(Action::from_token("update"), Some(Action::Write));
        assert_eq!(Action::from_token("add"), Some(Action::Create));
        assert_eq!(Action::from_token("store"), Some(Action::Create));
        assert_eq!(Action::from_token("destroy"), Some(Action::Delete));
        assert_eq!(Action::from_token("remove"), Some(Action::Delete));
        assert_eq!(Action::from_token("approve"), Some(Action::Submit));
        assert_eq!(Action::from_token("download"), Some(Action::Export));
        assert_eq!(Action::from_token("frobnicate"), None);
    }

    #[test]
    fn parse_splits_on_first_separator_only() {
        assert_eq!(
            parse_permission("edit_hrm_departments"),
            Some((Action::Write, "hrm_departments"))
        );
        assert_eq!(parse_permission("view_users"), Some((Action::Read, "users")));
    }

    #[test]
    fn parse_skips_malformed_identifiers() {
        assert_eq!(parse_permission("foo"), None);
        assert_eq!(parse_permission("frobnicate_widgets"), None);
        assert_eq!(parse_permission("read_"), None);
        assert_eq!(parse_permission(""), None);
    }

    #[test]
    fn malformed_identifiers_contribute_nothing() {
        let matrix = effective_permissions(&[role(&["foo", "frobnicate_widgets"])]);
        assert!(matrix.is_empty());
    }

    #[test]
    fn empty_role_set_yields_empty_matrix() {
        assert!(effective_permissions(&[]).is_empty());
    }

    #[test]
    fn duplicate_grants_across_roles_count_once() {
        let once = effective_permissions(&[role(&["view_users"])]);
        let twice = effective_permissions(&[role(&["view_users"]), role(&["view_users"])]);
        assert_eq!(once, twice);
    }

    #[test]
    fn modules_sort_alphabetically() {
        let matrix = effective_permissions(&[role(&[
            "view_users",
            "edit_departments",
            "create_attendance",
        ])]);
        let modules: Vec<&str> = matrix.iter().map(|m| m.module.as_str()).collect();
        assert_eq!(modules, vec!["attendance", "departments", "users"]);
    }

    #[test]
    fn actions_or_into_one_cell() {
        let matrix = effective_permissions(&[
            role(&["view_users", "edit_users"]),
            role(&["delete_users", "approve_users"]),
        ]);
        assert_eq!(matrix.len(), 1);
        let doc = &matrix[0].documents[0];
        assert_eq!(doc.document, "users");
        assert!(doc.actions.read);
        assert!(doc.actions.write);
        assert!(doc.actions.delete);
        assert!(doc.actions.submit);
        assert!(!doc.actions.create);
        assert!(!doc.actions.report);
        assert!(!doc.actions.export);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let roles = vec![
            role(&["view_users", "edit_hrm_departments", "download_reports"]),
            role(&["store_users", "approve_leave_requests"]),
        ];
        assert_eq!(effective_permissions(&roles), effective_permissions(&roles));
    }

    #[test]
    fn union_is_monotonic() {
        let r1 = vec![role(&["view_users", "edit_users"])];
        let r2 = vec![role(&["view_departments", "delete_users"])];
        let combined: Vec<Role> = r1.iter().chain(r2.iter()).cloned().collect();

        let merged = effective_permissions(&combined);
        for part in [effective_permissions(&r1), effective_permissions(&r2)] {
            for module in part {
                let found = merged
                    .iter()
                    .find(|m| m.module == module.module)
                    .expect("module lost in union");
                for (doc, merged_doc) in module.documents.iter().zip(&found.documents) {
                    for action in [
                        Action::Read,
                        Action::Write,
                        Action::Create,
                        Action::Delete,
                        Action::Submit,
                        Action::Report,
                        Action::Export,
                    ] {
                        if doc.actions.allows(action) {
                            assert!(merged_doc.actions.allows(action));
                        }
                    }
                }
            }
        }
    }
}
