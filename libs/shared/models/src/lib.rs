pub mod entities;
pub mod error;
pub mod validation;

pub use entities::{Appointment, AppointmentStatus, Doctor};
pub use error::AppError;
pub use validation::{FieldViolation, Violations};
