//! Serialize a [`Layout`] to PDF bytes with `lopdf`.

use std::fmt::Write as _;

use lopdf::{dictionary, Document, Object, Stream};

use crate::error::GenerationError;
use crate::layout::{Align, DrawOp, Font, Layout, Rgb, PAGE_HEIGHT, PAGE_WIDTH};
use crate::text::{encode_win_ansi, hex_operand, measure};

const PT_PER_MM: f64 = 72.0 / 25.4;

fn pt(mm: f64) -> f64 {
    mm * PT_PER_MM
}

/// PDF y coordinate (origin bottom-left) for a top-left millimetre offset.
fn flip(y_mm: f64) -> f64 {
    pt(PAGE_HEIGHT - y_mm)
}

fn font_resource(font: Font) -> &'static str {
    match font {
        Font::Regular => "F1",
        Font::Bold => "F2",
        Font::Italic => "F3",
    }
}

fn color(rgb: Rgb) -> String {
    format!(
        "{:.3} {:.3} {:.3}",
        f64::from(rgb.0) / 255.0,
        f64::from(rgb.1) / 255.0,
        f64::from(rgb.2) / 255.0
    )
}

/// Build the content stream for one page.
fn page_content(ops: &[DrawOp], image_count: usize) -> Result<String, GenerationError> {
    let mut out = String::new();
    for op in ops {
        // Writing to a String never fails.
        let _ = match op {
            DrawOp::Text {
                x,
                y,
                align,
                style,
                text,
            } => {
                let encoded = encode_win_ansi(text);
                let width = measure(&encoded, style.size, style.font == Font::Bold);
                let left = match align {
                    Align::Left => *x,
                    Align::Center => x - width / 2.0,
                    Align::Right => x - width,
                };
                writeln!(
                    out,
                    "BT /{} {:.1} Tf {} rg {:.2} {:.2} Td {} Tj ET",
                    font_resource(style.font),
                    style.size,
                    color(style.color),
                    pt(left),
                    flip(*y),
                    hex_operand(&encoded)
                )
            }
            DrawOp::FillRect { x, y, w, h, color: c } => writeln!(
                out,
                "{} rg {:.2} {:.2} {:.2} {:.2} re f",
                color(*c),
                pt(*x),
                flip(y + h),
                pt(*w),
                pt(*h)
            ),
            DrawOp::StrokeRect { x, y, w, h, color: c } => writeln!(
                out,
                "{} RG 0.57 w {:.2} {:.2} {:.2} {:.2} re S",
                color(*c),
                pt(*x),
                flip(y + h),
                pt(*w),
                pt(*h)
            ),
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color: c,
            } => writeln!(
                out,
                "{} RG 0.57 w {:.2} {:.2} m {:.2} {:.2} l S",
                color(*c),
                pt(*x1),
                flip(*y1),
                pt(*x2),
                flip(*y2)
            ),
            DrawOp::Image { x, y, w, h, image } => {
                if *image >= image_count {
                    return Err(GenerationError::Render(format!(
                        "Image {image} was drawn but never registered"
                    )));
                }
                writeln!(
                    out,
                    "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /Im{} Do Q",
                    pt(*w),
                    pt(*h),
                    pt(*x),
                    flip(y + h),
                    image
                )
            }
        };
    }
    Ok(out)
}

/// Render every page of `layout` into a single PDF document.
pub fn render(layout: &Layout) -> Result<Vec<u8>, GenerationError> {
    if layout.pages.is_empty() {
        return Err(GenerationError::Render("Document has no pages".to_string()));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for (name, base) in [
        ("F1", "Helvetica"),
        ("F2", "Helvetica-Bold"),
        ("F3", "Helvetica-Oblique"),
    ] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base,
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(name, font_id);
    }

    let mut xobjects = lopdf::Dictionary::new();
    for (index, image) in layout.images.iter().enumerate() {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width as i64,
            "Height" => image.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        if image.jpeg {
            dict.set("Filter", "DCTDecode");
        }
        let image_id = doc.add_object(Object::Stream(Stream::new(dict, image.data.clone())));
        xobjects.set(format!("Im{index}"), image_id);
    }

    doc.objects.insert(
        resources_id,
        Object::Dictionary(dictionary! {
            "Font" => fonts,
            "XObject" => xobjects,
        }),
    );

    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        (pt(PAGE_WIDTH).round() as i64).into(),
        (pt(PAGE_HEIGHT).round() as i64).into(),
    ];

    let mut page_ids = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = page_content(&page.ops, layout.images.len())?;
        let content_id = doc.add_object(Object::Stream(Stream::new(
            dictionary! {},
            content.into_bytes(),
        )));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.clone(),
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| (*id).into()).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| GenerationError::Render(e.to_string()))?;

    Ok(buffer)
}
