use chrono::Utc;
use haulage_core::report::{non_blank, report_filename, ReportData, ReportItem, ReportJob, ReportType};

use crate::error::GenerationError;
use crate::layout::{Canvas, Layout};
use crate::render::render;
use crate::sections::{self, SectionContext, SignatureImages};
use crate::settings::ReportSettings;
use crate::signature::decode_data_url;

/// A finished PDF and its download name.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub page_count: usize,
}

/// Report data that passed validation, with signatures decoded.
struct CheckedReport<'a> {
    job: &'a ReportJob,
    job_number: &'a str,
    items: &'a [ReportItem],
    report_type: ReportType,
    signatures: SignatureImages,
}

/// Stateless PDF report generator.
///
/// Each call owns its own canvas, so one generator can serve concurrent
/// requests.
#[derive(Debug, Clone, Default)]
pub struct ReportGenerator {
    settings: ReportSettings,
}

impl ReportGenerator {
    pub fn new(settings: ReportSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Lay out and render a report.
    pub fn generate(&self, data: &ReportData) -> Result<GeneratedReport, GenerationError> {
        let checked = check(data)?;
        let generated_at = data.generated_at.unwrap_or_else(Utc::now);
        let filename = report_filename(checked.report_type, checked.job_number, generated_at);
        let job_number = checked.job_number.to_string();
        let item_count = checked.items.len();

        let layout = self.lay_out(checked, generated_at)?;
        let bytes = render(&layout)?;

        tracing::debug!(
            job_number = %job_number,
            report_type = data.report_type.as_str(),
            items = item_count,
            pages = layout.page_count(),
            bytes = bytes.len(),
            "Report rendered",
        );

        Ok(GeneratedReport {
            bytes,
            filename,
            page_count: layout.page_count(),
        })
    }

    /// Lay out a report without rendering it.
    pub fn layout(&self, data: &ReportData) -> Result<Layout, GenerationError> {
        let checked = check(data)?;
        let generated_at = data.generated_at.unwrap_or_else(Utc::now);
        self.lay_out(checked, generated_at)
    }

    fn lay_out(
        &self,
        report: CheckedReport<'_>,
        generated_at: chrono::DateTime<Utc>,
    ) -> Result<Layout, GenerationError> {
        let ctx = SectionContext {
            settings: &self.settings,
            generated_at: self.settings.localize(generated_at),
        };

        let mut canvas = Canvas::new();
        sections::header(&mut canvas, &ctx, report.job, report.report_type);
        sections::items_table(&mut canvas, report.items);
        sections::summary(&mut canvas, &ctx, report.items);
        sections::signatures(&mut canvas, report.signatures);
        sections::footer(&mut canvas, &ctx)?;

        Ok(canvas.finish())
    }
}

fn check(data: &ReportData) -> Result<CheckedReport<'_>, GenerationError> {
    let job = data
        .job
        .as_ref()
        .ok_or_else(|| GenerationError::InvalidInput("Job data is required".to_string()))?;
    let items = data
        .items
        .as_deref()
        .ok_or_else(|| GenerationError::InvalidInput("Items data is required".to_string()))?;

    if job.id.is_none() {
        return Err(GenerationError::InvalidInput("Job id is required".to_string()));
    }
    let job_number = non_blank(job.job_number.as_deref())
        .ok_or_else(|| GenerationError::InvalidInput("Job number is required".to_string()))?;
    if non_blank(job.client_name.as_deref()).is_none() {
        return Err(GenerationError::InvalidInput("Client name is required".to_string()));
    }

    let signatures = match &data.signatures {
        Some(s) => SignatureImages {
            customer: decode_optional(s.customer.as_deref())?,
            staff: decode_optional(s.staff.as_deref())?,
        },
        None => SignatureImages::default(),
    };

    Ok(CheckedReport {
        job,
        job_number,
        items,
        report_type: data.report_type,
        signatures,
    })
}

fn decode_optional(url: Option<&str>) -> Result<Option<crate::layout::EmbeddedImage>, GenerationError> {
    non_blank(url).map(decode_data_url).transpose()
}
