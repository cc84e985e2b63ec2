//! Human-readable job numbers: `JOB-YYYYMMDD-NNNN`.
//!
//! `NNNN` is the 1-based sequence of jobs created on that UTC day. The
//! store computes the next sequence under a lock; this module only formats
//! and parses.

use chrono::NaiveDate;

/// Width of the zero-padded daily sequence.
const SEQUENCE_WIDTH: usize = 4;

/// The `JOB-YYYYMMDD-` prefix shared by every job created on `date`.
pub fn daily_prefix(date: NaiveDate) -> String {
    format!("JOB-{}-", date.format("%Y%m%d"))
}

/// Format the job number for the `sequence`-th job created on `date`.
pub fn format_job_number(date: NaiveDate, sequence: u32) -> String {
    format!(
        "{}{:0width$}",
        daily_prefix(date),
        sequence,
        width = SEQUENCE_WIDTH
    )
}

/// Extract the daily sequence from a job number, if it is well-formed.
pub fn parse_sequence(job_number: &str) -> Option<u32> {
    let mut parts = job_number.splitn(3, '-');
    if parts.next()? != "JOB" {
        return None;
    }
    let date = parts.next()?;
    if date.len() != 8 || NaiveDate::parse_from_str(date, "%Y%m%d").is_err() {
        return None;
    }
    parts.next()?.parse().ok()
}
