//! The five report sections, drawn top to bottom onto a [`Canvas`].

use chrono::{DateTime, FixedOffset};
use haulage_core::currency::format_rupees;
use haulage_core::inventory::InventorySummary;
use haulage_core::report::{non_blank, ReportItem, ReportJob, ReportType};

use crate::layout::{
    Align, Canvas, DrawOp, EmbeddedImage, Font, Rgb, TextStyle, CONTENT_WIDTH, MARGIN, PAGE_HEIGHT,
    PAGE_WIDTH,
};
use crate::settings::{format_date, format_time, ReportSettings};
use crate::signature::fit;
use crate::text::truncate;
use crate::GenerationError;

/// A row is never started within this distance of the page bottom.
pub const ROW_BREAK_RESERVE: f64 = 40.0;

/// The signature block is never started within this distance of the bottom.
pub const SIGNATURE_BREAK_RESERVE: f64 = 60.0;

pub const TABLE_HEADER_HEIGHT: f64 = 8.0;
pub const ROW_HEIGHT: f64 = 8.0;
pub const DETAILED_ROW_HEIGHT: f64 = 12.0;
pub const ROW_GAP: f64 = 2.0;

/// Item Name, Category, Qty, Condition, Value, Notes.
pub const COLUMN_WIDTHS: [f64; 6] = [50.0, 35.0, 15.0, 25.0, 25.0, 20.0];
const COLUMN_HEADERS: [&str; 6] = ["Item Name", "Category", "Qty", "Condition", "Value (₹)", "Notes"];

const ITEM_NAME_BUDGET: usize = 45;
const CATEGORY_BUDGET: usize = 30;
const HANDLING_BUDGET: usize = 100;
const DETAIL_LINE_BUDGET: usize = 130;
const DETAIL_VALUE_BUDGET: usize = 40;

const SUMMARY_HEIGHT: f64 = 25.0;
const SUMMARY_ADVANCE: f64 = 30.0;
const SIGNATURE_BOX_HEIGHT: f64 = 25.0;

const FOOTER_OFFSET: f64 = 15.0;

const BODY: TextStyle = TextStyle::new(Font::Regular, 10.0, Rgb::BLACK);
const SECTION_TITLE: TextStyle = TextStyle::new(Font::Bold, 12.0, Rgb::PRIMARY);

/// Shared inputs for every section.
pub struct SectionContext<'a> {
    pub settings: &'a ReportSettings,
    pub generated_at: DateTime<FixedOffset>,
}

impl SectionContext<'_> {
    fn timestamp(&self) -> String {
        format!(
            "{}, {}",
            format_date(&self.generated_at),
            format_time(&self.generated_at)
        )
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

pub fn header(
    canvas: &mut Canvas,
    ctx: &SectionContext<'_>,
    job: &ReportJob,
    report_type: ReportType,
) {
    let top = canvas.cursor();

    canvas.fill_rect(MARGIN, top, 40.0, 15.0, Rgb::PRIMARY);
    let brand = TextStyle::new(Font::Bold, 11.0, Rgb::WHITE);
    let (first, rest) = brand_lines(&ctx.settings.company_name);
    canvas.text(MARGIN + 2.0, top + 6.5, brand, first);
    if let Some(rest) = rest {
        canvas.text(MARGIN + 2.0, top + 11.5, brand, rest);
    }

    let mut detail_y = top + 5.0;
    for detail in &ctx.settings.company_details {
        canvas.text(MARGIN + 45.0, detail_y, BODY, truncate(detail, 70));
        detail_y += 3.5;
    }
    canvas.advance(20.0);

    canvas.aligned_text(
        PAGE_WIDTH / 2.0,
        canvas.cursor(),
        Align::Center,
        TextStyle::new(Font::Bold, 16.0, Rgb::PRIMARY),
        report_type.title(),
    );
    canvas.advance(10.0);

    let top = canvas.cursor();
    canvas.fill_rect(MARGIN, top, CONTENT_WIDTH, 25.0, Rgb::PANEL);
    canvas.text(
        MARGIN + 5.0,
        top + 7.0,
        TextStyle::new(Font::Bold, 12.0, Rgb::BLACK),
        "Job Details",
    );

    let job_number = non_blank(job.job_number.as_deref()).unwrap_or_default();
    let client = non_blank(job.client_name.as_deref()).unwrap_or_default();
    let left = [
        format!("Job Number: {job_number}"),
        truncate(&format!("Client: {client}"), DETAIL_VALUE_BUDGET),
        format!("Status: {}", job.status.to_uppercase()),
    ];

    let created = job
        .created_at
        .map(|at| at.with_timezone(&ctx.generated_at.timezone()))
        .unwrap_or(ctx.generated_at);
    let mut right = vec![format!("Date: {}", format_date(&created))];
    if let Some(pickup) = non_blank(job.pickup_location.as_deref()) {
        right.push(truncate(&format!("Pickup: {pickup}"), DETAIL_VALUE_BUDGET));
    }
    if let Some(delivery) = non_blank(job.delivery_location.as_deref()) {
        right.push(truncate(&format!("Delivery: {delivery}"), DETAIL_VALUE_BUDGET));
    }

    for (i, line) in left.into_iter().enumerate() {
        canvas.text(MARGIN + 5.0, top + 12.0 + 4.0 * i as f64, BODY, line);
    }
    for (i, line) in right.into_iter().enumerate() {
        canvas.text(PAGE_WIDTH / 2.0 + 10.0, top + 12.0 + 4.0 * i as f64, BODY, line);
    }

    canvas.advance(30.0);
}

/// Split the company name over the two lines of the brand box.
fn brand_lines(name: &str) -> (String, Option<String>) {
    let upper = name.trim().to_uppercase();
    match upper.split_once(char::is_whitespace) {
        Some((first, rest)) => (truncate(first, 14), Some(truncate(rest.trim(), 14))),
        None => (truncate(&upper, 14), None),
    }
}

// ---------------------------------------------------------------------------
// Items table
// ---------------------------------------------------------------------------

pub fn items_table(canvas: &mut Canvas, items: &[ReportItem]) {
    let top = canvas.cursor();
    canvas.fill_rect(MARGIN, top, CONTENT_WIDTH, TABLE_HEADER_HEIGHT, Rgb::PRIMARY);
    let header_style = TextStyle::new(Font::Bold, 9.0, Rgb::WHITE);
    let mut x = MARGIN + 2.0;
    for (title, width) in COLUMN_HEADERS.iter().zip(COLUMN_WIDTHS) {
        canvas.text(x, top + 5.5, header_style, *title);
        x += width;
    }
    canvas.advance(TABLE_HEADER_HEIGHT);

    let cell = TextStyle::new(Font::Regular, 8.0, Rgb::BLACK);
    let detail = TextStyle::new(Font::Italic, 7.0, Rgb::MUTED);

    for (index, item) in items.iter().enumerate() {
        canvas.break_if_within(ROW_BREAK_RESERVE);

        let top = canvas.cursor();
        let extra = detail_line(item);
        let height = if extra.is_some() {
            DETAILED_ROW_HEIGHT
        } else {
            ROW_HEIGHT
        };

        if index % 2 == 0 {
            canvas.fill_rect(MARGIN, top, CONTENT_WIDTH, height, Rgb::ROW_SHADE);
        }

        let cells = [
            truncate(&item.item_name, ITEM_NAME_BUDGET),
            truncate(&item.category, CATEGORY_BUDGET),
            item.quantity.to_string(),
            item.condition.display_label().to_string(),
            format_rupees(item.item_value),
            item.notes(),
        ];
        let mut x = MARGIN + 2.0;
        for (value, width) in cells.into_iter().zip(COLUMN_WIDTHS) {
            canvas.text(x, top + 4.0, cell, value);
            x += width;
        }

        if let Some(line) = extra {
            canvas.text(MARGIN + 2.0, top + 8.0, detail, line);
        }

        canvas.advance(height);
        let rule_y = canvas.cursor();
        canvas.line(MARGIN, rule_y, PAGE_WIDTH - MARGIN, rule_y, Rgb::RULE);
        canvas.advance(ROW_GAP);
        canvas.record_row(top, canvas.cursor());
    }

    canvas.advance(5.0);
}

/// Second row line: size, fragile flag and special handling, or `None`.
pub fn detail_line(item: &ReportItem) -> Option<String> {
    let parts: Vec<String> = item
        .detail_parts()
        .into_iter()
        .map(|part| truncate(&part, HANDLING_BUDGET + "Special: ".len()))
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(truncate(&parts.join(" • "), DETAIL_LINE_BUDGET))
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

pub fn summary(canvas: &mut Canvas, ctx: &SectionContext<'_>, items: &[ReportItem]) {
    canvas.break_if_within(MARGIN + SUMMARY_ADVANCE);

    let top = canvas.cursor();
    canvas.fill_rect(MARGIN, top, CONTENT_WIDTH, SUMMARY_HEIGHT, Rgb::SUMMARY_PANEL);
    canvas.text(MARGIN + 5.0, top + 7.0, SECTION_TITLE, "Summary");

    let totals = InventorySummary::from_items(items);
    let left = [
        format!("Total Items: {}", totals.total_quantity),
        format!("Categories: {}", totals.category_count),
        format!("Damaged Items: {}", totals.damaged_count),
    ];
    let right = [
        format!(
            "Total Estimated Value: {}",
            format_rupees(Some(totals.total_value))
        ),
        format!("Fragile Items: {}", totals.fragile_count),
        format!("Generated: {}", ctx.timestamp()),
    ];

    for (i, line) in left.into_iter().enumerate() {
        canvas.text(MARGIN + 5.0, top + 12.0 + 4.0 * i as f64, BODY, line);
    }
    for (i, line) in right.into_iter().enumerate() {
        canvas.text(PAGE_WIDTH / 2.0 + 10.0, top + 12.0 + 4.0 * i as f64, BODY, line);
    }

    canvas.advance(SUMMARY_ADVANCE);
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// Decoded signature images, if any were supplied.
#[derive(Debug, Default)]
pub struct SignatureImages {
    pub customer: Option<EmbeddedImage>,
    pub staff: Option<EmbeddedImage>,
}

pub fn signatures(canvas: &mut Canvas, images: SignatureImages) {
    canvas.break_if_within(SIGNATURE_BREAK_RESERVE);
    canvas.record_signature_top();

    canvas.text(MARGIN, canvas.cursor(), SECTION_TITLE, "Signatures");
    canvas.advance(10.0);

    let top = canvas.cursor();
    let box_width = (PAGE_WIDTH - 3.0 * MARGIN) / 2.0;
    let boxes = [
        (MARGIN, "Customer Signature", images.customer),
        (PAGE_WIDTH / 2.0 + 10.0, "Staff Signature", images.staff),
    ];

    for (x, label, image) in boxes {
        canvas.stroke_rect(x, top, box_width, SIGNATURE_BOX_HEIGHT, Rgb::BLACK);
        if let Some(image) = image {
            let (w, h) = fit(&image, box_width - 10.0, 14.0);
            canvas.image(x + 5.0, top + 2.0, w, h, image);
        }
        canvas.text(x + 5.0, top + 20.0, BODY, label);
        canvas.text(x + 5.0, top + 23.0, BODY, "Date: _______________");
    }

    canvas.advance(SIGNATURE_BOX_HEIGHT + 5.0);
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

/// Second pass: stamp every page once the page count is known.
pub fn footer(canvas: &mut Canvas, ctx: &SectionContext<'_>) -> Result<(), GenerationError> {
    let y = PAGE_HEIGHT - FOOTER_OFFSET;
    let style = TextStyle::new(Font::Italic, 8.0, Rgb::MUTED);
    let disclaimer = format!(
        "This is a computer-generated report from {} Management System",
        ctx.settings.company_name
    );
    let generated = format!(
        "Generated on {} at {}",
        format_date(&ctx.generated_at),
        format_time(&ctx.generated_at)
    );

    let total = canvas.page_count();
    for page in 0..total {
        for (x, y, align, text) in [
            (PAGE_WIDTH / 2.0, y, Align::Center, disclaimer.clone()),
            (PAGE_WIDTH / 2.0, y + 3.0, Align::Center, generated.clone()),
            (
                PAGE_WIDTH - MARGIN,
                y,
                Align::Right,
                format!("Page {} of {}", page + 1, total),
            ),
        ] {
            canvas.push_to(
                page,
                DrawOp::Text {
                    x,
                    y,
                    align,
                    style,
                    text,
                },
            )?;
        }
    }
    Ok(())
}
