//! Capacity alerts: tier movements between two matrix computations.
//!
//! Moving into the critical tier is an escalation: consumers raise a
//! persistent alert for it, not just a colour swap. Every other tier change
//! is reported as a plain change.

use crate::{
    capacity::WeekCapacity,
    department::Department,
    engine::CapacityMatrix,
    utilization::{is_escalation, Tier},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CapacityAlert {
    Escalated {
        department:          Department,
        week_start:          NaiveDate,
        week_number:         u32,
        from:                Option<Tier>,
        utilization_percent: f64,
        net:                 f64,
    },
    TierChanged {
        department:  Department,
        week_start:  NaiveDate,
        week_number: u32,
        from:        Option<Tier>,
        to:          Option<Tier>,
    },
}

impl CapacityAlert {
    pub fn requires_escalation(&self) -> bool {
        matches!(self, Self::Escalated { .. })
    }

    pub fn department(&self) -> Department {
        match self {
            Self::Escalated { department, .. } | Self::TierChanged { department, .. } => *department,
        }
    }
}

fn alert_for(
    previous:    Option<Tier>,
    cell:        &WeekCapacity,
    week_number: u32,
) -> Option<CapacityAlert> {
    if is_escalation(previous, cell.tier) {
        return Some(CapacityAlert::Escalated {
            department: cell.department,
            week_start: cell.week_start,
            week_number,
            from: previous,
            utilization_percent: cell.utilization.percent().unwrap_or(0.0),
            net: cell.net,
        });
    }
    (previous != cell.tier).then(|| CapacityAlert::TierChanged {
        department: cell.department,
        week_start: cell.week_start,
        week_number,
        from: previous,
        to: cell.tier,
    })
}

/// Compare `current` against the previous computation. With no previous
/// matrix every critical cell is reported as an escalation and nothing else.
pub fn escalations(previous: Option<&CapacityMatrix>, current: &CapacityMatrix) -> Vec<CapacityAlert> {
    let week_numbers: HashMap<NaiveDate, u32> =
        current.weeks.iter().map(|w| (w.date, w.week_number)).collect();
    let week_number = |cell: &WeekCapacity| week_numbers.get(&cell.week_start).copied().unwrap_or(0);

    let alerts: Vec<CapacityAlert> = match previous {
        None => current
            .critical_cells()
            .filter_map(|cell| alert_for(None, cell, week_number(cell)))
            .collect(),
        Some(prev) => {
            let before: HashMap<(Department, NaiveDate), Option<Tier>> = prev
                .cells
                .iter()
                .map(|c| ((c.department, c.week_start), c.tier))
                .collect();
            current
                .cells
                .iter()
                .filter_map(|cell| {
                    let from = before.get(&(cell.department, cell.week_start)).copied().flatten();
                    alert_for(from, cell, week_number(cell))
                })
                .collect()
        }
    };

    for alert in &alerts {
        if let CapacityAlert::Escalated { department, week_start, utilization_percent, .. } = alert {
            log::warn!("{department} week of {week_start} over-allocated: {utilization_percent:.2}%");
        }
    }
    alerts
}
