use chrono::{DateTime, FixedOffset, Offset, Utc};

/// India Standard Time, UTC+05:30.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

/// Branding and locale settings applied to every generated report.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    /// Printed in the header brand box and the footer disclaimer.
    pub company_name: String,
    /// Lines printed beside the brand box.
    pub company_details: Vec<String>,
    /// Offset used for dates printed inside the document.
    pub utc_offset_minutes: i32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            company_name: "Buhariwala Logistics".to_string(),
            company_details: vec![
                "Enterprise Solutions".to_string(),
                "Email: info@buhariwala.com".to_string(),
            ],
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

impl ReportSettings {
    /// Load settings from environment variables with defaults.
    ///
    /// | Env Var                     | Default                          |
    /// |-----------------------------|----------------------------------|
    /// | `REPORT_COMPANY_NAME`       | `Buhariwala Logistics`           |
    /// | `REPORT_COMPANY_DETAILS`    | `;`-separated lines              |
    /// | `REPORT_UTC_OFFSET_MINUTES` | `330`                            |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let company_name = std::env::var("REPORT_COMPANY_NAME")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.company_name);

        let company_details = std::env::var("REPORT_COMPANY_DETAILS")
            .map(|s| {
                s.split(';')
                    .map(|line| line.trim().to_string())
                    .filter(|line| !line.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.company_details);

        let utc_offset_minutes: i32 = std::env::var("REPORT_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|_| DEFAULT_UTC_OFFSET_MINUTES.to_string())
            .parse()
            .expect("REPORT_UTC_OFFSET_MINUTES must be a valid i32");

        Self {
            company_name,
            company_details,
            utc_offset_minutes,
        }
    }

    /// The display offset; out-of-range values fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn localize(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        at.with_timezone(&self.offset())
    }
}

/// `2/1/2025`
pub fn format_date(at: &DateTime<FixedOffset>) -> String {
    at.format("%-d/%-m/%Y").to_string()
}

/// `6:30:00 pm`
pub fn format_time(at: &DateTime<FixedOffset>) -> String {
    at.format("%-I:%M:%S %P").to_string()
}
