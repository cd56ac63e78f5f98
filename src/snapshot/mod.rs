pub mod types;
pub mod reducer;
pub mod selectors;

pub use types::{
    Appointment, AppointmentId, Day, Id, Interview, Interviewer, InterviewerId, Snapshot,
    UpdateEvent,
};
pub use reducer::{apply, apply_event};
