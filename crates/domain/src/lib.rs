mod reminder;
mod scheduled_job;
mod shared;
mod user;

pub use reminder::{Reminder, SendOutcome, CONTROL_CATEGORY, CONTROL_LEAD_TIME_MILLIS};
pub use scheduled_job::ScheduledJob;
pub use shared::email::looks_like_email;
pub use shared::entity::{Entity, ID};
pub use user::User;
