//! Entity to contract conversion. Stored enum strings predate any schema, so
//! they are normalized here instead of being trusted.

use crate::contract::model::{
    Activity, ActivityKind, IdentityRole, Prospect, ProspectStatus, Reminder, ReminderStatus,
    Salesperson, User,
};
use crate::infra::storage::entity::{activity, prospect, reminder, salesperson, user};

/// Lowercase, trimmed, with `-` and spaces folded to `_`.
fn fold(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

pub fn normalize_role(raw: &str) -> IdentityRole {
    match fold(raw).as_str() {
        "admin" => IdentityRole::Admin,
        _ => IdentityRole::Salesperson,
    }
}

pub fn normalize_prospect_status(raw: Option<&str>) -> ProspectStatus {
    match raw.map(fold).as_deref() {
        Some("contacted" | "in_progress") => ProspectStatus::Contacted,
        Some("qualified") => ProspectStatus::Qualified,
        Some("enrolled" | "won" | "converted") => ProspectStatus::Enrolled,
        Some("lost" | "closed" | "dead") => ProspectStatus::Lost,
        _ => ProspectStatus::New,
    }
}

pub fn normalize_activity_kind(raw: Option<&str>) -> ActivityKind {
    match raw.map(fold).as_deref() {
        Some("call" | "phone" | "phone_call") => ActivityKind::Call,
        Some("email" | "mail") => ActivityKind::Email,
        Some("meeting") => ActivityKind::Meeting,
        Some("task") => ActivityKind::Task,
        _ => ActivityKind::Note,
    }
}

pub fn normalize_reminder_status(raw: Option<&str>) -> ReminderStatus {
    match raw.map(fold).as_deref() {
        Some("done" | "completed" | "complete") => ReminderStatus::Done,
        Some("cancelled" | "canceled") => ReminderStatus::Cancelled,
        _ => ReminderStatus::Pending,
    }
}

impl From<salesperson::Model> for Salesperson {
    fn from(m: salesperson::Model) -> Self {
        Self {
            role: normalize_role(&m.role),
            id: m.id,
            auth_uid: m.auth_uid,
            email: m.email,
            display_name: m.display_name,
            created_at: m.created_at,
        }
    }
}

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            role: normalize_role(&m.role),
            id: m.id,
            auth_uid: m.auth_uid,
            email: m.email,
            display_name: m.display_name,
            created_at: m.created_at,
        }
    }
}

impl From<prospect::Model> for Prospect {
    fn from(m: prospect::Model) -> Self {
        Self {
            status: normalize_prospect_status(m.status.as_deref()),
            id: m.id,
            full_name: m.full_name,
            email: m.email,
            assigned_to_id: m.assigned_to_id,
            salesperson_id: m.salesperson_id,
            created_at: m.created_at,
        }
    }
}

impl From<activity::Model> for Activity {
    fn from(m: activity::Model) -> Self {
        Self {
            kind: normalize_activity_kind(m.kind.as_deref()),
            id: m.id,
            prospect_id: m.prospect_id,
            notes: m.notes,
            created_at: m.created_at,
        }
    }
}

impl From<reminder::Model> for Reminder {
    fn from(m: reminder::Model) -> Self {
        Self {
            status: normalize_reminder_status(m.status.as_deref()),
            id: m.id,
            prospect_id: m.prospect_id,
            title: m.title,
            due_at: m.due_at,
            created_at: m.created_at,
        }
    }
}
