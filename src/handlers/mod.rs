pub mod admin;
pub mod events;
pub mod health;
pub mod profiles;
pub mod publish;

pub use admin::reset_state;
pub use events::{list_audit, list_dead_letters};
pub use health::health_check;
pub use profiles::{get_employee, get_employee_history, list_employees};
pub use publish::{publish_history, publish_personal, publish_position};
