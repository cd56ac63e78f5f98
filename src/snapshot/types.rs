use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier used for appointments and interviewers.
///
/// The backend is not consistent about id types: appointment keys are JSON
/// strings, but ids inside records and day lists are often integers. Both
/// forms decode to the same textual id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

pub type AppointmentId = Id;
pub type InterviewerId = Id;

impl Id {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Id(text),
            RawId::Signed(n) => Id(n.to_string()),
            RawId::Unsigned(n) => Id(n.to_string()),
        })
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id(value)
    }
}

impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A booked interview in an appointment slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub student: String,
    pub interviewer: InterviewerId,
}

/// A single time slot; `interview` is None while the slot is open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub time: String,
    #[serde(default)]
    pub interview: Option<Interview>,
}

impl Appointment {
    pub fn is_booked(&self) -> bool {
        self.interview.is_some()
    }
}

/// A day and the ordered list of appointment slots it offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub name: String,
    #[serde(default)]
    pub appointments: Vec<AppointmentId>,
    #[serde(default)]
    pub spots: u32,
}

/// An interviewer. Fields beyond identity are kept as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interviewer {
    pub id: InterviewerId,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An incremental update received from the push stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEvent {
    pub id: AppointmentId,
    pub interview: Option<Interview>,
}

/// Complete view of the scheduling data at one point in time.
///
/// The three collections sit behind `Arc`s so a snapshot is cheap to clone
/// and hand out to readers. Nothing mutates them after construction; the
/// reducer builds a new snapshot instead.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Snapshot {
    days: Arc<Vec<Day>>,
    appointments: Arc<BTreeMap<AppointmentId, Appointment>>,
    interviewers: Arc<BTreeMap<InterviewerId, Interviewer>>,
}

impl Snapshot {
    pub fn new(
        days: Vec<Day>,
        appointments: BTreeMap<AppointmentId, Appointment>,
        interviewers: BTreeMap<InterviewerId, Interviewer>,
    ) -> Self {
        Snapshot {
            days: Arc::new(days),
            appointments: Arc::new(appointments),
            interviewers: Arc::new(interviewers),
        }
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn appointments(&self) -> &BTreeMap<AppointmentId, Appointment> {
        &self.appointments
    }

    pub fn interviewers(&self) -> &BTreeMap<InterviewerId, Interviewer> {
        &self.interviewers
    }

    pub fn appointment(&self, id: &str) -> Option<&Appointment> {
        self.appointments.get(id)
    }

    /// Same snapshot with the appointment map swapped out, sharing days and interviewers
    pub(crate) fn with_appointments(
        &self,
        appointments: BTreeMap<AppointmentId, Appointment>,
    ) -> Self {
        Snapshot {
            days: Arc::clone(&self.days),
            appointments: Arc::new(appointments),
            interviewers: Arc::clone(&self.interviewers),
        }
    }

    /// True when both snapshots point at the same underlying storage
    pub fn shares_storage_with(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.days, &other.days)
            && Arc::ptr_eq(&self.appointments, &other.appointments)
            && Arc::ptr_eq(&self.interviewers, &other.interviewers)
    }
}
