//! The session log and its display grouping.

use serde::{Deserialize, Serialize};
use tm_core::template::Step;

use crate::session::StepOutcome;

/// One completed step, recorded when the player moves past it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Cycle the step was played in (1-based).
    pub cycle: u32,
    /// Index of the phase within the template.
    pub phase_index: usize,
    /// Phase name at the time of play.
    pub phase_name: String,
    /// The step as it was played.
    pub step: Step,
    /// The step's result, if it was executed before advancing.
    pub outcome: Option<StepOutcome>,
}

/// A line in the grouped log view.
#[derive(Debug, Clone, PartialEq)]
pub enum LogItem<'a> {
    /// A new cycle begins.
    CycleHeader(u32),
    /// A new phase begins within the current cycle.
    PhaseHeader(&'a str),
    /// A played step.
    Entry(&'a LogEntry),
}

/// Group a flat log for display.
///
/// One left-to-right scan: whenever the cycle changes a cycle header is
/// emitted, whenever the phase name changes (or a new cycle starts) a
/// phase header is emitted, then the entry itself. Headers key on the
/// name, so adjacent phases sharing a name share one header.
pub fn grouped(log: &[LogEntry]) -> Vec<LogItem<'_>> {
    let mut items = Vec::with_capacity(log.len());
    let mut last_cycle = None;
    let mut last_phase: Option<&str> = None;
    for entry in log {
        if last_cycle != Some(entry.cycle) {
            items.push(LogItem::CycleHeader(entry.cycle));
            last_cycle = Some(entry.cycle);
            last_phase = None;
        }
        if last_phase != Some(entry.phase_name.as_str()) {
            items.push(LogItem::PhaseHeader(&entry.phase_name));
            last_phase = Some(entry.phase_name.as_str());
        }
        items.push(LogItem::Entry(entry));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cycle: u32, phase_index: usize, phase_name: &str) -> LogEntry {
        LogEntry {
            cycle,
            phase_index,
            phase_name: phase_name.to_string(),
            step: Step::text("", "do the thing"),
            outcome: None,
        }
    }

    #[test]
    fn headers_appear_on_cycle_and_phase_changes() {
        let log = vec![
            entry(1, 0, "Setup"),
            entry(1, 0, "Setup"),
            entry(1, 1, "Play"),
            entry(2, 0, "Setup"),
        ];
        let items = grouped(&log);
        let shape: Vec<&str> = items
            .iter()
            .map(|i| match i {
                LogItem::CycleHeader(_) => "cycle",
                LogItem::PhaseHeader(_) => "phase",
                LogItem::Entry(_) => "entry",
            })
            .collect();
        assert_eq!(
            shape,
            vec![
                "cycle", "phase", "entry", "entry", "phase", "entry", "cycle", "phase", "entry",
            ]
        );
    }

    #[test]
    fn adjacent_phases_sharing_a_name_share_a_header() {
        let log = vec![
            entry(1, 0, "Upkeep"),
            entry(1, 1, "Upkeep"),
            entry(1, 2, "Play"),
        ];
        let headers = grouped(&log)
            .iter()
            .filter(|i| matches!(i, LogItem::PhaseHeader(_)))
            .count();
        assert_eq!(headers, 2);
    }

    #[test]
    fn empty_log_groups_to_nothing() {
        assert!(grouped(&[]).is_empty());
    }
}
