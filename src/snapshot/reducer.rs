use super::types::{AppointmentId, Interview, Snapshot, UpdateEvent};

/// Applies one interview change to a snapshot and returns the next snapshot.
///
/// The input is never modified. An unknown appointment id, or an interview
/// equal to the one already stored, returns a snapshot sharing all storage
/// with the input. Otherwise only the appointment map is copied.
pub fn apply(snapshot: &Snapshot, id: &AppointmentId, interview: Option<Interview>) -> Snapshot {
    let Some(current) = snapshot.appointment(id.as_str()) else {
        return snapshot.clone();
    };

    if current.interview == interview {
        return snapshot.clone();
    }

    let mut appointments = snapshot.appointments().clone();
    if let Some(appointment) = appointments.get_mut(id) {
        appointment.interview = interview;
    }

    snapshot.with_appointments(appointments)
}

/// Applies a decoded stream event
pub fn apply_event(snapshot: &Snapshot, event: &UpdateEvent) -> Snapshot {
    apply(snapshot, &event.id, event.interview.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::types::{Appointment, Day, Id};
    use std::collections::BTreeMap;

    fn monday_snapshot() -> Snapshot {
        let days = vec![Day {
            name: "Monday".to_string(),
            appointments: vec![Id::from("a1"), Id::from("a2")],
            spots: 1,
        }];
        let mut appointments = BTreeMap::new();
        appointments.insert(
            Id::from("a1"),
            Appointment { id: Id::from("a1"), time: "9am".to_string(), interview: None },
        );
        appointments.insert(
            Id::from("a2"),
            Appointment {
                id: Id::from("a2"),
                time: "10am".to_string(),
                interview: Some(Interview {
                    student: "Bob".to_string(),
                    interviewer: Id::from("i2"),
                }),
            },
        );
        Snapshot::new(days, appointments, BTreeMap::new())
    }

    fn alice() -> Option<Interview> {
        Some(Interview { student: "Alice".to_string(), interviewer: Id::from("i1") })
    }

    #[test]
    fn books_an_open_slot() {
        let snapshot = monday_snapshot();
        let next = apply(&snapshot, &Id::from("a1"), alice());

        assert_eq!(next.appointment("a1").unwrap().interview, alice());
        assert_eq!(next.appointment("a2"), snapshot.appointment("a2"));
        assert_eq!(next.days(), snapshot.days());
    }

    #[test]
    fn clearing_an_interview_opens_the_slot() {
        let snapshot = monday_snapshot();
        let next = apply(&snapshot, &Id::from("a2"), None);
        assert!(!next.appointment("a2").unwrap().is_booked());
    }

    #[test]
    fn input_snapshot_is_left_untouched() {
        let snapshot = monday_snapshot();
        let before = snapshot.clone();
        let _ = apply(&snapshot, &Id::from("a1"), alice());
        let _ = apply(&snapshot, &Id::from("a2"), None);

        assert_eq!(snapshot, before);
        assert!(snapshot.shares_storage_with(&before));
        assert!(!snapshot.appointment("a1").unwrap().is_booked());
    }

    #[test]
    fn unknown_id_is_a_no_op() {
        let snapshot = monday_snapshot();
        let next = apply(&snapshot, &Id::from("missing"), alice());
        assert_eq!(next, snapshot);
        assert!(next.shares_storage_with(&snapshot));
    }

    #[test]
    fn repeating_an_event_is_idempotent() {
        let snapshot = monday_snapshot();
        let once = apply(&snapshot, &Id::from("a1"), alice());
        let twice = apply(&once, &Id::from("a1"), alice());
        assert_eq!(twice, once);
    }

    #[test]
    fn days_and_interviewers_are_shared_not_copied() {
        let snapshot = monday_snapshot();
        let next = apply(&snapshot, &Id::from("a1"), alice());
        assert!(!next.shares_storage_with(&snapshot));
        assert!(std::ptr::eq(next.days(), snapshot.days()));
        assert!(std::ptr::eq(next.interviewers(), snapshot.interviewers()));
    }

    #[test]
    fn apply_event_uses_the_event_fields() {
        let snapshot = monday_snapshot();
        let event = UpdateEvent { id: Id::from("a1"), interview: alice() };
        assert_eq!(apply_event(&snapshot, &event), apply(&snapshot, &Id::from("a1"), alice()));
    }
}
