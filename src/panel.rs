use std::fmt;

use serde::{Deserialize, Serialize};

use crate::snapshot::selectors::{
    interviews_per_day, least_popular_time_slot, most_popular_day, total_interviews,
};
use crate::snapshot::Snapshot;

/// The four dashboard panels. Serialized as their integer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PanelId {
    TotalInterviews = 1,
    LeastPopularTimeSlot = 2,
    MostPopularDay = 3,
    InterviewsPerDay = 4,
}

impl PanelId {
    pub const ALL: [PanelId; 4] = [
        PanelId::TotalInterviews,
        PanelId::LeastPopularTimeSlot,
        PanelId::MostPopularDay,
        PanelId::InterviewsPerDay,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            PanelId::TotalInterviews => "Total Interviews",
            PanelId::LeastPopularTimeSlot => "Least Popular Time Slot",
            PanelId::MostPopularDay => "Most Popular Day",
            PanelId::InterviewsPerDay => "Interviews Per Day",
        }
    }

    /// Evaluates the panel's selector against the latest snapshot
    pub fn value(self, snapshot: &Snapshot) -> MetricValue {
        match self {
            PanelId::TotalInterviews => MetricValue::Count(total_interviews(snapshot)),
            PanelId::LeastPopularTimeSlot => MetricValue::Label(least_popular_time_slot(snapshot)),
            PanelId::MostPopularDay => MetricValue::Label(most_popular_day(snapshot)),
            PanelId::InterviewsPerDay => MetricValue::Average(interviews_per_day(snapshot)),
        }
    }
}

impl TryFrom<u8> for PanelId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PanelId::ALL
            .into_iter()
            .find(|panel| panel.number() == value)
            .ok_or_else(|| format!("unknown panel id {}", value))
    }
}

impl From<PanelId> for u8 {
    fn from(panel: PanelId) -> u8 {
        panel.number()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(usize),
    Label(String),
    Average(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Label(label) => f.write_str(label),
            MetricValue::Average(avg) => write!(f, "{:.1}", avg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub id: PanelId,
    pub label: &'static str,
    pub value: MetricValue,
}

/// Panels to show: all of them in id order, or only the focused one
pub fn visible_panels(snapshot: &Snapshot, focused: Option<PanelId>) -> Vec<PanelView> {
    PanelId::ALL
        .into_iter()
        .filter(|panel| focused.is_none_or(|f| f == *panel))
        .map(|panel| PanelView {
            id: panel,
            label: panel.label(),
            value: panel.value(snapshot),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_ids_round_trip_through_integers() {
        for panel in PanelId::ALL {
            assert_eq!(PanelId::try_from(panel.number()), Ok(panel));
        }
        assert!(PanelId::try_from(0).is_err());
        assert!(PanelId::try_from(5).is_err());
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&PanelId::MostPopularDay).unwrap(), "3");
        assert_eq!(serde_json::from_str::<PanelId>("2").unwrap(), PanelId::LeastPopularTimeSlot);
        assert!(serde_json::from_str::<PanelId>("5").is_err());
    }

    #[test]
    fn unfocused_view_shows_all_panels() {
        let panels = visible_panels(&Snapshot::default(), None);
        let ids: Vec<u8> = panels.iter().map(|p| p.id.number()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(panels[0].value, MetricValue::Count(0));
    }

    #[test]
    fn focused_view_shows_one_panel() {
        let panels = visible_panels(&Snapshot::default(), Some(PanelId::MostPopularDay));
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].label, "Most Popular Day");
    }

    #[test]
    fn metric_values_display() {
        assert_eq!(MetricValue::Count(4).to_string(), "4");
        assert_eq!(MetricValue::Label("1pm".to_string()).to_string(), "1pm");
        assert_eq!(MetricValue::Average(4.0 / 3.0).to_string(), "1.3");
    }
}
