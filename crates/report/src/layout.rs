//! Page geometry and the cursor-based canvas the report sections draw on.
//!
//! Coordinates are millimetres from the top-left corner of an A4 page, the
//! same convention the sections are written in. [`crate::render`] converts
//! to PDF points and flips the y axis.

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 20.0;

/// Usable width between the left and right margins.
pub const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const PRIMARY: Rgb = Rgb(128, 14, 19);
    pub const MUTED: Rgb = Rgb(100, 100, 100);
    pub const RULE: Rgb = Rgb(200, 200, 200);
    pub const PANEL: Rgb = Rgb(245, 245, 245);
    pub const SUMMARY_PANEL: Rgb = Rgb(248, 249, 250);
    pub const ROW_SHADE: Rgb = Rgb(250, 250, 250);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size: f64,
    pub color: Rgb,
}

impl TextStyle {
    pub const fn new(font: Font, size: f64, color: Rgb) -> Self {
        Self { font, size, color }
    }
}

/// Decoded raster image ready for embedding.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    /// `data` is a JPEG file (DCTDecode) rather than raw RGB samples.
    pub jpeg: bool,
}

/// A single drawing instruction on one page.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the text baseline.
    Text {
        x: f64,
        y: f64,
        align: Align,
        style: TextStyle,
        text: String,
    },
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Rgb,
    },
    StrokeRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Rgb,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Rgb,
    },
    /// Draws `Canvas::images[image]` scaled into the box.
    Image {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        image: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// Vertical extent occupied by one item row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlacement {
    pub page: usize,
    pub top: f64,
    pub bottom: f64,
}

/// Pages under construction plus the vertical cursor on the current page.
#[derive(Debug, Clone)]
pub struct Canvas {
    pages: Vec<Page>,
    cursor: f64,
    images: Vec<EmbeddedImage>,
    rows: Vec<RowPlacement>,
    signature_top: Option<(usize, f64)>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// A canvas with one empty page and the cursor at the top margin.
    pub fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            cursor: MARGIN,
            images: Vec::new(),
            rows: Vec::new(),
            signature_top: None,
        }
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn advance(&mut self, dy: f64) {
        self.cursor += dy;
    }

    /// Zero-based index of the page being drawn on.
    pub fn current_page(&self) -> usize {
        self.pages.len() - 1
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = MARGIN;
    }

    /// Start a new page when the cursor is below `PAGE_HEIGHT - reserve`.
    /// Returns whether a break happened.
    pub fn break_if_within(&mut self, reserve: f64) -> bool {
        if self.cursor > PAGE_HEIGHT - reserve {
            self.new_page();
            true
        } else {
            false
        }
    }

    pub fn push(&mut self, op: DrawOp) {
        let page = self.current_page();
        self.pages[page].ops.push(op);
    }

    /// Add an op to an arbitrary page (used by the footer pass).
    pub fn push_to(&mut self, page: usize, op: DrawOp) -> Result<(), crate::GenerationError> {
        self.pages
            .get_mut(page)
            .map(|p| p.ops.push(op))
            .ok_or_else(|| crate::GenerationError::Layout(format!("No page at index {page}")))
    }

    pub fn text(&mut self, x: f64, y: f64, style: TextStyle, text: impl Into<String>) {
        self.aligned_text(x, y, Align::Left, style, text);
    }

    pub fn aligned_text(
        &mut self,
        x: f64,
        y: f64,
        align: Align,
        style: TextStyle,
        text: impl Into<String>,
    ) {
        self.push(DrawOp::Text {
            x,
            y,
            align,
            style,
            text: text.into(),
        });
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) {
        self.push(DrawOp::FillRect { x, y, w, h, color });
    }

    pub fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) {
        self.push(DrawOp::StrokeRect { x, y, w, h, color });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Rgb) {
        self.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color,
        });
    }

    /// Register an image and draw it into the given box.
    pub fn image(&mut self, x: f64, y: f64, w: f64, h: f64, image: EmbeddedImage) {
        self.images.push(image);
        let index = self.images.len() - 1;
        self.push(DrawOp::Image {
            x,
            y,
            w,
            h,
            image: index,
        });
    }

    pub fn record_row(&mut self, top: f64, bottom: f64) {
        self.rows.push(RowPlacement {
            page: self.current_page(),
            top,
            bottom,
        });
    }

    pub fn record_signature_top(&mut self) {
        self.signature_top = Some((self.current_page(), self.cursor));
    }

    pub fn finish(self) -> Layout {
        Layout {
            pages: self.pages,
            images: self.images,
            rows: self.rows,
            signature_top: self.signature_top,
        }
    }
}

/// A finished, render-ready document.
#[derive(Debug, Clone)]
pub struct Layout {
    pub pages: Vec<Page>,
    pub images: Vec<EmbeddedImage>,
    /// Where each item row landed, in item order.
    pub rows: Vec<RowPlacement>,
    /// Page and cursor where the signature block starts.
    pub signature_top: Option<(usize, f64)>,
}

impl Layout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text drawn on a page, in draw order.
    pub fn page_text(&self, page: usize) -> Vec<&str> {
        self.pages
            .get(page)
            .map(|p| {
                p.ops
                    .iter()
                    .filter_map(|op| match op {
                        DrawOp::Text { text, .. } => Some(text.as_str()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
