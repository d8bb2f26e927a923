//! CSV run report.
//!
//! One header line, then one line per train in train-number order:
//!
//! ```text
//! TrainNum,TrainType,A_ArrivalTime,A_AvailCap,A_Boarding,...,U_Arrival,U_AvailCap,U_Offloading
//! 1,L8,7:00,400,25,7:11,375,125,7:23,250,250,7:37,0,400
//! ```

use std::fmt::Write as _;
use std::path::Path;

use crate::models::RunRecord;

/// Report header line (without newline).
pub const HEADER: &str = "TrainNum,TrainType,A_ArrivalTime,A_AvailCap,A_Boarding,B_ArrivalTime,B_AvailCap,B_Boarding,C_ArrivalTime,C_AvailCap,C_Boarding,U_Arrival,U_AvailCap,U_Offloading";

/// Formats one run record as a report line (without newline).
pub fn format_row(record: &RunRecord) -> String {
    let mut row = format!("{},{}", record.train_number, record.train_type);
    for stop in &record.stops {
        // Writing to a String cannot fail
        let _ = write!(
            row,
            ",{},{},{}",
            stop.arrival, stop.available_capacity, stop.boarded
        );
    }
    let _ = write!(
        row,
        ",{},{},{}",
        record.terminus_arrival, record.terminus_available, record.offloaded
    );
    row
}

/// Renders the full report, every line newline-terminated.
pub fn to_csv(records: &[RunRecord]) -> String {
    let mut out = String::with_capacity(64 * (records.len() + 1));
    out.push_str(HEADER);
    out.push('\n');
    for record in records {
        out.push_str(&format_row(record));
        out.push('\n');
    }
    out
}

/// Writes the report to `path`.
pub fn write_csv(path: impl AsRef<Path>, records: &[RunRecord]) -> std::io::Result<()> {
    std::fs::write(path, to_csv(records))
}

/// Formats an average wait in minutes as `M:SS`.
pub fn format_wait(minutes: f64) -> String {
    let seconds = (minutes.max(0.0) * 60.0).round() as u64;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
