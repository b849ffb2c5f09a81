use chrono::{DateTime, Utc};

/// Role carried by both identity representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRole {
    Admin,
    Salesperson,
}

impl IdentityRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Salesperson => "salesperson",
        }
    }
}

/// Row of the `salespersons` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salesperson {
    pub id: String,
    pub auth_uid: Option<String>,
    pub email: Option<String>,
    pub display_name: String,
    pub role: IdentityRole,
    pub created_at: DateTime<Utc>,
}

/// Row of the `users` collection. Same person as a `Salesperson` when the
/// two share an `auth_uid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub auth_uid: Option<String>,
    pub email: Option<String>,
    pub display_name: String,
    pub role: IdentityRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProspectStatus {
    New,
    Contacted,
    Qualified,
    Enrolled,
    Lost,
}

impl ProspectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Enrolled => "enrolled",
            Self::Lost => "lost",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Call,
    Email,
    Meeting,
    Note,
    Task,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Email => "email",
            Self::Meeting => "meeting",
            Self::Note => "note",
            Self::Task => "task",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderStatus {
    Pending,
    Done,
    Cancelled,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A prospect (student lead). Ownership is recorded under either of two
/// legacy fields; both are optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prospect {
    pub id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub status: ProspectStatus,
    pub assigned_to_id: Option<String>,
    pub salesperson_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: String,
    pub prospect_id: String,
    pub kind: ActivityKind,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: String,
    pub prospect_id: String,
    pub title: String,
    pub status: ReminderStatus,
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Identity records located for one identifier. Either side may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub salesperson: Option<Salesperson>,
    pub user: Option<User>,
    /// Canonical external-auth reference, when either record carries one.
    pub auth_uid: Option<String>,
}

impl ResolvedIdentity {
    pub fn is_empty(&self) -> bool {
        self.salesperson.is_none() && self.user.is_none()
    }
}

/// Everything a cascade would remove for one identity, read without writing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedDependencies {
    pub identity: ResolvedIdentity,
    pub prospects: Vec<Prospect>,
    pub activities: Vec<Activity>,
    pub reminders: Vec<Reminder>,
}

/// Rows removed by the force-delete fallback, per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForceDeleteCounts {
    pub salespersons: u64,
    pub users: u64,
}

/// Outcome of deleting a salesperson and everything it owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub message: String,
    pub user_deleted: bool,
    pub salesperson_deleted: bool,
    pub external_auth_deleted: bool,
    pub prospects_deleted: u64,
    pub activities_deleted: u64,
    pub reminders_deleted: u64,
    pub force_mode: bool,
    /// Present only when the force-delete fallback ran.
    pub force_deleted: Option<ForceDeleteCounts>,
}
