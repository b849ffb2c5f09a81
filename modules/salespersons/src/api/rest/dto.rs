use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{
    Activity, DeletionReport, ForceDeleteCounts, OwnedDependencies, Prospect, Reminder,
    ResolvedIdentity, Salesperson, User,
};

/// Response of `DELETE /salespersons/{id}`. Field names are kept for
/// compatibility with the existing admin UI.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSalespersonResponse {
    pub success: bool,
    pub message: String,
    /// Whether a `users` row was removed
    #[serde(rename = "mongoDBUsers")]
    pub mongo_db_users: bool,
    /// Whether a `salespersons` row was removed
    #[serde(rename = "mongoDBSalespersons")]
    pub mongo_db_salespersons: bool,
    /// Whether the external auth account was removed
    pub firebase_auth: bool,
    pub prospects_deleted: u64,
    pub activities_count: u64,
    pub reminders_count: u64,
    pub force_mode: bool,
    /// Rows removed by the force fallback, present only when it ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_deleted: Option<ForceDeletedDto>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ForceDeletedDto {
    pub salespersons: u64,
    pub users: u64,
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`; a bare `?force` means true.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(None),
        Some(s) => match s.as_str() {
            "" | "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "invalid boolean flag '{other}'"
            ))),
        },
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteSalespersonQuery {
    /// Enable the force-delete fallback for identities the normal lookup cannot find
    #[serde(default, deserialize_with = "deserialize_flag")]
    #[param(value_type = Option<bool>)]
    pub force: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSalespersonsQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalespersonDto {
    pub id: String,
    pub auth_uid: Option<String>,
    pub email: Option<String>,
    pub display_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub auth_uid: Option<String>,
    pub email: Option<String>,
    pub display_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalespersonListDto {
    pub salespersons: Vec<SalespersonDto>,
    pub total: usize,
    pub limit: u32,
    pub offset: u32,
}

/// Both identity records found for one identifier
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityDto {
    pub salesperson: Option<SalespersonDto>,
    pub user: Option<UserDto>,
    pub auth_uid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProspectDto {
    pub id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub status: String,
    pub assigned_to_id: Option<String>,
    pub salesperson_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDto {
    pub id: String,
    pub prospect_id: String,
    pub kind: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDto {
    pub id: String,
    pub prospect_id: String,
    pub title: String,
    pub status: String,
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// What `DELETE` would remove for an identifier
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnedDependenciesDto {
    pub identity: IdentityDto,
    pub prospects: Vec<ProspectDto>,
    pub activities: Vec<ActivityDto>,
    pub reminders: Vec<ReminderDto>,
}

// Conversion implementations between REST DTOs and contract models

impl From<DeletionReport> for DeleteSalespersonResponse {
    fn from(r: DeletionReport) -> Self {
        Self {
            success: true,
            message: r.message,
            mongo_db_users: r.user_deleted,
            mongo_db_salespersons: r.salesperson_deleted,
            firebase_auth: r.external_auth_deleted,
            prospects_deleted: r.prospects_deleted,
            activities_count: r.activities_deleted,
            reminders_count: r.reminders_deleted,
            force_mode: r.force_mode,
            force_deleted: r.force_deleted.map(Into::into),
        }
    }
}

impl From<ForceDeleteCounts> for ForceDeletedDto {
    fn from(c: ForceDeleteCounts) -> Self {
        Self {
            salespersons: c.salespersons,
            users: c.users,
        }
    }
}

impl From<Salesperson> for SalespersonDto {
    fn from(s: Salesperson) -> Self {
        Self {
            id: s.id,
            auth_uid: s.auth_uid,
            email: s.email,
            display_name: s.display_name,
            role: s.role.as_str().to_string(),
            created_at: s.created_at,
        }
    }
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            auth_uid: u.auth_uid,
            email: u.email,
            display_name: u.display_name,
            role: u.role.as_str().to_string(),
            created_at: u.created_at,
        }
    }
}

impl From<ResolvedIdentity> for IdentityDto {
    fn from(i: ResolvedIdentity) -> Self {
        Self {
            salesperson: i.salesperson.map(Into::into),
            user: i.user.map(Into::into),
            auth_uid: i.auth_uid,
        }
    }
}

impl From<Prospect> for ProspectDto {
    fn from(p: Prospect) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            email: p.email,
            status: p.status.as_str().to_string(),
            assigned_to_id: p.assigned_to_id,
            salesperson_id: p.salesperson_id,
            created_at: p.created_at,
        }
    }
}

impl From<Activity> for ActivityDto {
    fn from(a: Activity) -> Self {
        Self {
            id: a.id,
            prospect_id: a.prospect_id,
            kind: a.kind.as_str().to_string(),
            notes: a.notes,
            created_at: a.created_at,
        }
    }
}

impl From<Reminder> for ReminderDto {
    fn from(r: Reminder) -> Self {
        Self {
            id: r.id,
            prospect_id: r.prospect_id,
            title: r.title,
            status: r.status.as_str().to_string(),
            due_at: r.due_at,
            created_at: r.created_at,
        }
    }
}

impl From<OwnedDependencies> for OwnedDependenciesDto {
    fn from(d: OwnedDependencies) -> Self {
        Self {
            identity: d.identity.into(),
            prospects: d.prospects.into_iter().map(Into::into).collect(),
            activities: d.activities.into_iter().map(Into::into).collect(),
            reminders: d.reminders.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_response_uses_legacy_field_names() {
        let body = DeleteSalespersonResponse::from(DeletionReport {
            message: "done".into(),
            user_deleted: true,
            salesperson_deleted: false,
            external_auth_deleted: false,
            prospects_deleted: 2,
            activities_deleted: 3,
            reminders_deleted: 1,
            force_mode: false,
            force_deleted: None,
        });
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["mongoDBUsers"], true);
        assert_eq!(json["mongoDBSalespersons"], false);
        assert_eq!(json["firebaseAuth"], false);
        assert_eq!(json["prospectsDeleted"], 2);
        assert_eq!(json["activitiesCount"], 3);
        assert_eq!(json["remindersCount"], 1);
        assert_eq!(json["forceMode"], false);
        assert!(json.get("forceDeleted").is_none());
    }

    #[test]
    fn force_flag_accepts_common_spellings() {
        let parse = |q: &str| -> Option<bool> {
            serde_json::from_value::<DeleteSalespersonQuery>(serde_json::json!({ "force": q }))
                .unwrap()
                .force
        };
        assert_eq!(parse("true"), Some(true));
        assert_eq!(parse("1"), Some(true));
        assert_eq!(parse(""), Some(true));
        assert_eq!(parse("False"), Some(false));
        assert!(serde_json::from_value::<DeleteSalespersonQuery>(
            serde_json::json!({ "force": "maybe" })
        )
        .is_err());
    }
}
