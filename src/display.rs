use std::io::Write;

use crate::controller::DashboardState;
use crate::panel::{visible_panels, PanelView};
use crate::snapshot::selectors::interviews_by_day;

/// Formats one panel as `[id] label: value`
pub fn format_panel(panel: &PanelView) -> String {
    format!("[{}] {}: {}", panel.id.number(), panel.label, panel.value)
}

/// Writes the dashboard the way the panel view would show it
pub fn write_dashboard<W: Write>(out: &mut W, state: &DashboardState) -> std::io::Result<()> {
    let Some(snapshot) = state.snapshot() else {
        writeln!(out, "Loading...")?;
        if let Some(error) = &state.last_error {
            writeln!(out, "⚠️  Bootstrap failed: {}", error)?;
        }
        return Ok(());
    };

    match state.focused {
        Some(panel) => writeln!(out, "\n=== Dashboard (focused on {}) ===", panel.label())?,
        None => writeln!(out, "\n=== Dashboard ===")?,
    }
    for panel in visible_panels(snapshot, state.focused) {
        writeln!(out, "  {}", format_panel(&panel))?;
    }

    // The per-day breakdown only belongs to the four-panel view
    if state.focused.is_none() {
        writeln!(out, "\nInterviews by day:")?;
        for (day, booked) in interviews_by_day(snapshot) {
            writeln!(out, "  {} -> {}", day, booked)?;
        }
    }

    Ok(())
}

/// Prints the dashboard to stdout
pub fn print_dashboard(state: &DashboardState) {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = write_dashboard(&mut out, state) {
        log::warn!("Could not print dashboard: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Phase;
    use crate::panel::PanelId;
    use crate::snapshot::{Appointment, Day, Id, Interview, Snapshot};
    use std::collections::BTreeMap;

    fn ready_state(focused: Option<PanelId>) -> DashboardState {
        let mut appointments = BTreeMap::new();
        appointments.insert(
            Id::from("1"),
            Appointment {
                id: Id::from("1"),
                time: "12pm".to_string(),
                interview: Some(Interview {
                    student: "Archie".to_string(),
                    interviewer: Id::from("1"),
                }),
            },
        );
        let days = vec![Day {
            name: "Monday".to_string(),
            appointments: vec![Id::from("1")],
            spots: 0,
        }];
        DashboardState {
            phase: Phase::Ready(Snapshot::new(days, appointments, BTreeMap::new())),
            focused,
            ..DashboardState::default()
        }
    }

    fn render(state: &DashboardState) -> String {
        let mut out = Vec::new();
        write_dashboard(&mut out, state).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn loading_state_mentions_the_error() {
        let state = DashboardState {
            last_error: Some("days returned HTTP 503".to_string()),
            ..DashboardState::default()
        };
        let text = render(&state);
        assert!(text.starts_with("Loading..."));
        assert!(text.contains("HTTP 503"));
    }

    #[test]
    fn all_panels_and_breakdown_when_unfocused() {
        let text = render(&ready_state(None));
        assert!(text.contains("[1] Total Interviews: 1"));
        assert!(text.contains("[2] Least Popular Time Slot: 12pm"));
        assert!(text.contains("[3] Most Popular Day: Monday"));
        assert!(text.contains("[4] Interviews Per Day: 1.0"));
        assert!(text.contains("Monday -> 1"));
    }

    #[test]
    fn only_the_focused_panel() {
        let text = render(&ready_state(Some(PanelId::MostPopularDay)));
        assert!(text.contains("[3] Most Popular Day: Monday"));
        assert!(!text.contains("Total Interviews"));
        assert!(!text.contains("Interviews by day"));
    }
}
