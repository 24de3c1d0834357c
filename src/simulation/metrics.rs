//! Hourly metrics collection and CSV output.
//!
//! One [`HourlyRecord`] is appended per simulated hour; the first five
//! columns mirror the dashboard feed (hour, arrivals, waiting,
//! treating, available rooms), the remaining columns carry the wait
//! and treatment accumulators.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One row of per-hour observations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRecord {
    /// Hour index since the simulation epoch.
    pub hour: i64,
    /// Arrivals during this hour.
    pub arrivals: i64,
    /// Waiting-queue size at the end of the hour.
    pub waiting: i64,
    /// Patients in treatment at the end of the hour.
    pub treating: i64,
    /// Free treatment rooms at the end of the hour.
    pub available_rooms: i64,
    /// Cumulative treatment seconds across all discharges so far.
    pub total_treatment_secs: i64,
    /// Average treatment seconds per discharge so far.
    pub avg_treatment_secs: i64,
    /// Cumulative waiting seconds across all treatment starts so far.
    pub total_wait_secs: i64,
    /// Average waiting seconds per treatment start so far.
    pub avg_wait_secs: i64,
    /// Cumulative arrivals since the epoch.
    pub total_arrivals: i64,
}

/// Cycle-level performance summary fed back into demand planning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceMetrics {
    /// Fraction of arrivals rejected in the cycle (0.0..=1.0).
    pub rejection_rate: f64,
    /// Mean wait from arrival to treatment start, minutes.
    pub avg_wait_mins: f64,
}

impl PerformanceMetrics {
    /// A neutral baseline (no feedback signal).
    pub fn baseline() -> Self {
        Self {
            rejection_rate: 0.0,
            avg_wait_mins: 0.0,
        }
    }
}

/// End-of-run utilization summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilizationSummary {
    /// Mean fraction of treatment rooms occupied, percent.
    pub room_utilization_pct: f64,
    /// Treated arrivals as a share of all arrivals, percent.
    pub throughput_pct: f64,
    /// Rejected arrivals as a share of all arrivals, percent.
    pub rejection_rate_pct: f64,
}

/// Accumulates hourly rows and writes the run log.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    rows: Vec<HourlyRecord>,
}

impl MetricsRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one hourly row.
    pub fn record(&mut self, row: HourlyRecord) {
        self.rows.push(row);
    }

    /// All recorded rows, in append order.
    pub fn rows(&self) -> &[HourlyRecord] {
        &self.rows
    }

    /// Mean room occupancy across recorded hours, percent.
    pub fn room_utilization_pct(&self, total_rooms: u32) -> f64 {
        if self.rows.is_empty() || total_rooms == 0 {
            return 0.0;
        }
        let occupied: i64 = self
            .rows
            .iter()
            .map(|r| total_rooms as i64 - r.available_rooms)
            .sum();
        100.0 * occupied as f64 / (self.rows.len() as i64 * total_rooms as i64) as f64
    }

    /// Renders all rows as CSV text.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "Hour,Arrivals,Waiting,Treating,Available Rooms,\
             Total Treatment Secs,Avg Treatment Secs,\
             Total Wait Secs,Avg Wait Secs,Total Arrivals\n",
        );
        for r in &self.rows {
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{}\n",
                r.hour,
                r.arrivals,
                r.waiting,
                r.treating,
                r.available_rooms,
                r.total_treatment_secs,
                r.avg_treatment_secs,
                r.total_wait_secs,
                r.avg_wait_secs,
                r.total_arrivals,
            ));
        }
        out
    }

    /// Writes the CSV log to `log_<ddMMHHmmss>.csv` under `dir` and
    /// returns the path.
    pub fn write_csv(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let stamp = chrono::Local::now().format("%d%m%H%M%S");
        let path = dir.as_ref().join(format!("log_{stamp}.csv"));
        let mut file = std::fs::File::create(&path)?;
        file.write_all(self.to_csv().as_bytes())?;
        Ok(path)
    }
}
