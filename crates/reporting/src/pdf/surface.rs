//! FPDF-flavored drawing surface over `printpdf`.
//!
//! Coordinates are millimeters from the top-left page corner (the
//! convention the legacy layout numbers were written in); conversion
//! to the PDF bottom-left origin happens at the draw calls. The
//! surface keeps a text cursor and exposes cell / paragraph / image
//! primitives; it knows nothing about report structure.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::image_crate::{load_from_memory, GenericImageView};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Polygon, Rgb,
};

use crate::errors::{ReportError, Result};
use crate::pdf::encoding::latin1;

/// Letter page, millimeters.
const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 10.0;
/// Horizontal text inset inside a cell.
const CELL_PAD: f32 = 1.0;
/// Approximate Helvetica advance width as a fraction of font size.
const GLYPH_WIDTH_EM: f32 = 0.5;
const PT_PER_MM: f32 = 72.0 / 25.4;
/// Resolution used when sizing embedded images.
const IMAGE_DPI: f32 = 300.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Cursor movement after a cell, FPDF-style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ln {
    /// Stay on the line, cursor moves right of the cell.
    Right,
    /// Next line, cursor back at the left margin.
    NewLine,
    /// Below the cell, same x.
    Below,
}

/// A paginated Letter document under construction.
///
/// Exclusively owned by the renderer for the lifetime of one run and
/// written out once by [`save`](Self::save).
pub struct PdfSurface {
    doc: PdfDocumentReference,
    first_page: PdfPageIndex,
    first_layer: PdfLayerIndex,
    layer: Option<PdfLayerReference>,
    font_regular: IndirectFontRef,
    font_bold: IndirectFontRef,
    style: FontStyle,
    size: f32,
    fill_gray: f32,
    pages: usize,
    x: f32,
    y: f32,
}

fn pdf_err(e: impl std::fmt::Display) -> ReportError {
    ReportError::Pdf(e.to_string())
}

impl PdfSurface {
    pub fn new(title: &str) -> Result<Self> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH.into()),
            Mm(PAGE_HEIGHT.into()),
            "Page 1",
        );
        let font_regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?;

        Ok(Self {
            doc,
            first_page,
            first_layer,
            layer: None,
            font_regular,
            font_bold,
            style: FontStyle::Regular,
            size: 12.0,
            fill_gray: 0.0,
            pages: 0,
            x: MARGIN,
            y: MARGIN,
        })
    }

    /// Start a new page; the cursor moves to the top-left margin.
    pub fn add_page(&mut self) {
        self.start_page();
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    pub fn set_font(&mut self, style: FontStyle, size: f32) {
        self.style = style;
        self.size = size;
    }

    /// Fill shade for subsequent filled cells, 0.0 (black) to 1.0
    /// (white).
    pub fn set_fill_gray(&mut self, level: f32) {
        self.fill_gray = level.clamp(0.0, 1.0);
    }

    /// Move the cursor to an absolute y; x returns to the left margin.
    pub fn set_y(&mut self, y: f32) {
        self.x = MARGIN;
        self.y = y;
    }

    /// Line break of the given height.
    pub fn ln(&mut self, h: f32) {
        self.x = MARGIN;
        self.y += h;
    }

    /// Draw one cell. `w == 0.0` extends the cell to the right margin.
    pub fn cell(
        &mut self,
        w: f32,
        h: f32,
        text: &str,
        border: bool,
        ln: Ln,
        align: Align,
        fill: bool,
    ) {
        let layer = self.current_layer();
        let w = if w == 0.0 {
            (PAGE_WIDTH - MARGIN - self.x).max(0.0)
        } else {
            w
        };

        if fill {
            let g = self.fill_gray;
            layer.set_fill_color(Color::Rgb(Rgb::new(g.into(), g.into(), g.into(), None)));
            self.rect(&layer, self.x, self.y, w, h, PaintMode::Fill);
        }
        if border {
            self.rect(&layer, self.x, self.y, w, h, PaintMode::Stroke);
        }

        let text = latin1(text);
        if !text.is_empty() {
            // Text is filled, not stroked: reset the fill color so a
            // shaded cell does not shade its own label.
            layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
            let tx = match align {
                Align::Left => self.x + CELL_PAD,
                Align::Center => self.x + (w - self.text_width(&text)) / 2.0,
                Align::Right => self.x + w - self.text_width(&text) - CELL_PAD,
            };
            let baseline = PAGE_HEIGHT - (self.y + h * 0.72);
            layer.use_text(
                text,
                self.size.into(),
                Mm(tx.into()),
                Mm(baseline.into()),
                self.font(),
            );
        }

        match ln {
            Ln::Right => self.x += w,
            Ln::NewLine => {
                self.x = MARGIN;
                self.y += h;
            }
            Ln::Below => self.y += h,
        }
    }

    /// Draw a wrapped paragraph, one line of height `h` per row. The
    /// cursor ends below the paragraph at the left margin.
    pub fn multi_cell(&mut self, w: f32, h: f32, text: &str, align: Align) {
        let layer = self.current_layer();
        let w = if w == 0.0 {
            (PAGE_WIDTH - MARGIN - self.x).max(0.0)
        } else {
            w
        };
        let line_capacity = ((w - 2.0 * CELL_PAD) / self.glyph_width()).max(1.0) as usize;

        layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        let text = latin1(text);
        for paragraph in text.split('\n') {
            if paragraph.is_empty() {
                self.y += h;
                continue;
            }
            for line in textwrap::wrap(paragraph, line_capacity) {
                let tx = match align {
                    Align::Left => self.x + CELL_PAD,
                    Align::Center => self.x + (w - self.text_width(&line)) / 2.0,
                    Align::Right => self.x + w - self.text_width(&line) - CELL_PAD,
                };
                let baseline = PAGE_HEIGHT - (self.y + h * 0.72);
                layer.use_text(
                    line.as_ref(),
                    self.size.into(),
                    Mm(tx.into()),
                    Mm(baseline.into()),
                    self.font(),
                );
                self.y += h;
            }
        }
        self.x = MARGIN;
    }

    /// Place an image scaled to width `w` mm, preserving aspect ratio.
    /// With `y == None` the image flows at the cursor and advances it
    /// below the image. `source` only labels decode errors.
    pub fn image(&mut self, bytes: &[u8], source: &str, x: f32, y: Option<f32>, w: f32) -> Result<()> {
        let layer = self.current_layer();
        let dynamic = load_from_memory(bytes).map_err(|e| ReportError::Image {
            url: source.to_string(),
            details: e.to_string(),
        })?;
        let (px_w, px_h) = dynamic.dimensions();
        if px_w == 0 || px_h == 0 {
            return Err(ReportError::Image {
                url: source.to_string(),
                details: "empty image".to_string(),
            });
        }

        let natural_w = px_w as f32 * 25.4 / IMAGE_DPI;
        let natural_h = px_h as f32 * 25.4 / IMAGE_DPI;
        let scale = w / natural_w;
        let drawn_h = natural_h * scale;
        let top = y.unwrap_or(self.y);

        let image = Image::from_dynamic_image(&dynamic);
        image.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(x.into())),
                translate_y: Some(Mm((PAGE_HEIGHT - top - drawn_h).into())),
                scale_x: Some(scale.into()),
                scale_y: Some(scale.into()),
                dpi: Some(IMAGE_DPI.into()),
                ..Default::default()
            },
        );

        if y.is_none() {
            self.y = top + drawn_h;
        }
        Ok(())
    }

    /// Finalize the document and write it to `path`.
    pub fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.doc.save(&mut BufWriter::new(file)).map_err(pdf_err)?;
        Ok(())
    }

    fn font(&self) -> &IndirectFontRef {
        match self.style {
            FontStyle::Regular => &self.font_regular,
            FontStyle::Bold => &self.font_bold,
        }
    }

    /// Approximate width of one glyph at the current size, in mm.
    fn glyph_width(&self) -> f32 {
        self.size * GLYPH_WIDTH_EM / PT_PER_MM
    }

    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.glyph_width()
    }

    fn current_layer(&mut self) -> PdfLayerReference {
        match &self.layer {
            Some(layer) => layer.clone(),
            None => self.start_page(),
        }
    }

    fn start_page(&mut self) -> PdfLayerReference {
        let layer = if self.pages == 0 {
            self.doc.get_page(self.first_page).get_layer(self.first_layer)
        } else {
            let (page, layer) = self.doc.add_page(
                Mm(PAGE_WIDTH.into()),
                Mm(PAGE_HEIGHT.into()),
                format!("Page {}", self.pages + 1),
            );
            self.doc.get_page(page).get_layer(layer)
        };
        layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        layer.set_outline_thickness(0.57);
        self.pages += 1;
        self.x = MARGIN;
        self.y = MARGIN;
        self.layer = Some(layer.clone());
        layer
    }

    fn rect(&self, layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, mode: PaintMode) {
        let top = PAGE_HEIGHT - y;
        let bottom = PAGE_HEIGHT - y - h;
        let corners = vec![
            (Point::new(Mm(x.into()), Mm(top.into())), false),
            (Point::new(Mm((x + w).into()), Mm(top.into())), false),
            (Point::new(Mm((x + w).into()), Mm(bottom.into())), false),
            (Point::new(Mm(x.into()), Mm(bottom.into())), false),
        ];
        match mode {
            PaintMode::Stroke => layer.add_line(Line {
                points: corners,
                is_closed: true,
            }),
            _ => layer.add_polygon(Polygon {
                rings: vec![corners],
                mode,
                winding_order: WindingOrder::NonZero,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_are_counted() {
        let mut pdf = PdfSurface::new("test").unwrap();
        assert_eq!(pdf.page_count(), 0);
        pdf.add_page();
        pdf.add_page();
        assert_eq!(pdf.page_count(), 2);
    }

    #[test]
    fn test_cell_cursor_movement() {
        let mut pdf = PdfSurface::new("test").unwrap();
        pdf.add_page();
        pdf.cell(30.0, 7.0, "a", false, Ln::Right, Align::Left, false);
        pdf.cell(30.0, 7.0, "b", false, Ln::NewLine, Align::Left, false);
        // After a NewLine cell the cursor is back at the margin, one
        // row down.
        pdf.set_y(100.0);
        pdf.cell(0.0, 7.0, "full width", true, Ln::NewLine, Align::Center, false);
        assert_eq!(pdf.page_count(), 1);
    }

    #[test]
    fn test_drawing_without_a_page_starts_one() {
        let mut pdf = PdfSurface::new("test").unwrap();
        pdf.cell(0.0, 7.0, "implicit page", false, Ln::NewLine, Align::Left, false);
        assert_eq!(pdf.page_count(), 1);
    }

    #[test]
    fn test_save_writes_a_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        let mut pdf = PdfSurface::new("test").unwrap();
        pdf.add_page();
        pdf.set_font(FontStyle::Bold, 12.0);
        pdf.cell(0.0, 10.0, "Heading", false, Ln::NewLine, Align::Center, false);
        pdf.set_font(FontStyle::Regular, 12.0);
        pdf.multi_cell(0.0, 7.0, "Some paragraph text that should wrap onto multiple lines when it exceeds the available cell width on the page.", Align::Left);
        pdf.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_invalid_image_bytes_error() {
        let mut pdf = PdfSurface::new("test").unwrap();
        pdf.add_page();
        let result = pdf.image(b"not an image", "mem://logo", 10.0, None, 40.0);
        assert!(matches!(result, Err(ReportError::Image { .. })));
    }
}
