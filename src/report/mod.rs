//! Reporting: CSV run reports and KPI summaries.

mod kpi;
mod table;

pub use kpi::ScheduleKpi;
pub use table::{format_row, format_wait, to_csv, write_csv, HEADER};
