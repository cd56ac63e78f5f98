use std::collections::HashMap;

use super::types::{Appointment, Day, Snapshot};

/// Number of appointments that currently hold an interview
pub fn total_interviews(snapshot: &Snapshot) -> usize {
    snapshot.appointments().values().filter(|a| a.is_booked()).count()
}

/// Resolves a day's appointment ids, skipping ids with no live appointment
fn day_appointments<'a>(
    snapshot: &'a Snapshot,
    day: &'a Day,
) -> impl Iterator<Item = &'a Appointment> + 'a {
    day.appointments.iter().filter_map(move |id| snapshot.appointment(id.as_str()))
}

fn booked_in_day(snapshot: &Snapshot, day: &Day) -> usize {
    day_appointments(snapshot, day).filter(|a| a.is_booked()).count()
}

/// Time with the fewest booked interviews across all days.
/// Ties go to the time seen first; empty when there are no slots.
pub fn least_popular_time_slot(snapshot: &Snapshot) -> String {
    // (time, booked) in first-seen order, plus an index into it
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for day in snapshot.days() {
        for appointment in day_appointments(snapshot, day) {
            let time = appointment.time.as_str();
            let slot = *index.entry(time).or_insert_with(|| {
                counts.push((time, 0));
                counts.len() - 1
            });
            if appointment.is_booked() {
                counts[slot].1 += 1;
            }
        }
    }

    let mut least: Option<(&str, usize)> = None;
    for (time, booked) in counts {
        match least {
            Some((_, fewest)) if booked >= fewest => {}
            _ => least = Some((time, booked)),
        }
    }

    least.map(|(time, _)| time.to_string()).unwrap_or_default()
}

/// Day with the most booked interviews; ties go to the earliest day
pub fn most_popular_day(snapshot: &Snapshot) -> String {
    let mut best: Option<(&str, usize)> = None;
    for day in snapshot.days() {
        let booked = booked_in_day(snapshot, day);
        match best {
            Some((_, most)) if booked <= most => {}
            _ => best = Some((day.name.as_str(), booked)),
        }
    }

    best.map(|(name, _)| name.to_string()).unwrap_or_default()
}

/// Average number of booked interviews per day
pub fn interviews_per_day(snapshot: &Snapshot) -> f64 {
    let days = snapshot.days().len();
    if days == 0 {
        return 0.0;
    }
    total_interviews(snapshot) as f64 / days as f64
}

/// Booked interviews per day, in day order
pub fn interviews_by_day(snapshot: &Snapshot) -> Vec<(String, usize)> {
    snapshot
        .days()
        .iter()
        .map(|day| (day.name.clone(), booked_in_day(snapshot, day)))
        .collect()
}
