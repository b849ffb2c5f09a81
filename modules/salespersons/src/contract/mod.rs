pub mod client;
pub mod error;
pub mod model;

pub use model::{
    Activity, ActivityKind, DeletionReport, ForceDeleteCounts, IdentityRole, OwnedDependencies,
    Prospect, ProspectStatus, Reminder, ReminderStatus, ResolvedIdentity, Salesperson, User,
};
