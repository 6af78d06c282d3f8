//! Live "time remaining" label on the grievance detail page.

use crate::dom::{Dom, Marker, Mutation};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::time::Duration;
use tracing::{debug, warn};

pub const CONTAINER_ID: &str = "grievance-detail-container";
pub const TIMER_ID: &str = "sla-timer";
pub const WRAPPER_CLASS: &str = "sla-wrapper";
pub const BREACHED_LABEL: &str = "SLA BREACHED";
pub const DANGER_CLASSES: [&str; 2] = ["text-danger", "bg-danger-subtle"];

pub const TICK: Duration = Duration::from_millis(60_000);

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a due date attribute.
///
/// Offsets are honoured; date-times without one are local time and bare
/// dates are UTC midnight.
pub fn parse_due(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlaStatus {
    Remaining { days: i64, hours: i64, minutes: i64 },
    Breached,
}

impl SlaStatus {
    pub fn from_millis(remaining: i64) -> Self {
        if remaining <= 0 {
            return SlaStatus::Breached;
        }
        SlaStatus::Remaining {
            days: remaining / MS_PER_DAY,
            hours: (remaining / MS_PER_HOUR) % 24,
            minutes: (remaining / MS_PER_MINUTE) % 60,
        }
    }

    pub fn at(due: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_millis((due - now).num_milliseconds())
    }

    pub fn label(&self) -> String {
        match self {
            SlaStatus::Remaining {
                days,
                hours,
                minutes,
            } => format!("{days}d {hours}h {minutes}m"),
            SlaStatus::Breached => BREACHED_LABEL.to_string(),
        }
    }
}

/// The countdown widget found on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct SlaCountdown<N> {
    pub due: DateTime<Utc>,
    pub timer: N,
    pub wrapper: Option<N>,
}

impl<N: Clone> SlaCountdown<N> {
    pub fn locate<D: Dom<Node = N>>(dom: &D) -> Option<Self> {
        let container = dom.element_by_id(CONTAINER_ID)?;
        let timer = dom.element_by_id(TIMER_ID)?;
        let raw = dom.dataset(&container, "due").filter(|due| !due.is_empty())?;
        let Some(due) = parse_due(&raw) else {
            warn!(due = %raw, "unparseable SLA due date");
            return None;
        };
        let wrapper = dom
            .closest(&timer, Marker::Class(WRAPPER_CLASS))
            .or_else(|| dom.parent(&timer));
        debug!(%due, "SLA countdown armed");
        Some(Self { due, timer, wrapper })
    }

    /// Mutations for one tick. Danger styling is only ever added.
    pub fn tick(&self, now: DateTime<Utc>) -> Vec<Mutation<N>> {
        let status = SlaStatus::at(self.due, now);
        let mut mutations = vec![Mutation::SetText {
            node: self.timer.clone(),
            text: status.label(),
        }];
        if status == SlaStatus::Breached {
            if let Some(wrapper) = &self.wrapper {
                for class in DANGER_CLASSES {
                    mutations.push(Mutation::AddClass {
                        node: wrapper.clone(),
                        class,
                    });
                }
            }
        }
        mutations
    }
}
