pub mod envelope;
pub mod events;
pub mod history;
pub mod profile;

pub use envelope::{
    Contacts, Envelope, EventKind, Grade, HistoryPayload, Period, PersonalPayload, PositionPayload,
};
pub use events::{AuditEvent, DeadLetter, NewAuditEvent, NewDeadLetter};
pub use history::{EmploymentRecord, NewEmploymentRecord};
pub use profile::{EmployeeProfile, PersonalFields, PositionFields};
