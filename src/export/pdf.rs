//! PDF emitter
//!
//! Implements the layout [`Canvas`] on top of printpdf. The layout engine
//! works in top-left millimetres; printpdf places content from the
//! bottom-left corner, so every y coordinate is flipped here.

use crate::error::{RendicionError, RendicionResult};
use crate::reports::{FontCapability, LayoutEngine, LayoutOutcome, RenditionReport, ReportProfile};

/// Lay out `report` and return the PDF bytes
#[cfg(feature = "pdf")]
pub fn render_pdf(
    report: &RenditionReport,
    profile: &ReportProfile,
    fonts: &FontCapability,
    logo: Option<&[u8]>,
) -> RendicionResult<(Vec<u8>, LayoutOutcome)> {
    let (mut canvas, fonts) = match PdfCanvas::new(&report.title, profile, fonts) {
        Ok(canvas) => (canvas, fonts.clone()),
        Err(e) if fonts.is_embedded() => {
            tracing::warn!(error = %e, "Embedded font rejected, falling back to Helvetica");
            (
                PdfCanvas::new(&report.title, profile, &FontCapability::Builtin)?,
                FontCapability::Builtin,
            )
        }
        Err(e) => return Err(e),
    };

    let outcome = LayoutEngine::new(&mut canvas, profile, &fonts).render(report, logo);
    let bytes = canvas.finish()?;
    Ok((bytes, outcome))
}

#[cfg(not(feature = "pdf"))]
pub fn render_pdf(
    _report: &RenditionReport,
    _profile: &ReportProfile,
    _fonts: &FontCapability,
    _logo: Option<&[u8]>,
) -> RendicionResult<(Vec<u8>, LayoutOutcome)> {
    Err(RendicionError::DependencyUnavailable(
        "PDF export requires the 'pdf' feature".to_string(),
    ))
}

#[cfg(feature = "pdf")]
pub use backend::PdfCanvas;

#[cfg(feature = "pdf")]
mod backend {
    use std::io::{BufWriter, Cursor};

    use printpdf::image_crate::{self, GenericImageView};
    use printpdf::{
        BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
        PdfDocumentReference, PdfLayerReference, Point,
    };

    use super::*;
    use crate::reports::layout::CELL_PADDING;
    use crate::reports::{Align, Canvas, FontSpec, FontStyle, PageGeometry, Rect, RenderSkip, TextMeasure};

    const LAYER_NAME: &str = "Layer 1";
    const BORDER_THICKNESS: f32 = 0.2;
    const IMAGE_DPI: f32 = 300.0;
    /// Baseline offset below the vertical middle of a line, as a share of the font size
    const BASELINE_SHIFT: f64 = 0.35;

    /// A printpdf document being drawn by the layout engine
    pub struct PdfCanvas {
        doc: PdfDocumentReference,
        layer: PdfLayerReference,
        regular: IndirectFontRef,
        bold: IndirectFontRef,
        fonts: FontCapability,
        geometry: PageGeometry,
        font: FontSpec,
    }

    impl PdfCanvas {
        pub fn new(
            title: &str,
            profile: &ReportProfile,
            fonts: &FontCapability,
        ) -> RendicionResult<Self> {
            let geometry = PageGeometry::a4(profile.orientation);
            let (doc, page, layer) = PdfDocument::new(
                title,
                Mm(geometry.width as f32),
                Mm(geometry.height as f32),
                LAYER_NAME,
            );
            let layer = doc.get_page(page).get_layer(layer);

            let (regular, bold) = match fonts {
                FontCapability::Embedded { name, bytes } => {
                    let font = doc
                        .add_external_font(Cursor::new(bytes.as_slice()))
                        .map_err(|e| {
                            RendicionError::Export(format!("Failed to embed font {}: {}", name, e))
                        })?;
                    (font.clone(), font)
                }
                FontCapability::Builtin => (
                    doc.add_builtin_font(BuiltinFont::Helvetica)
                        .map_err(pdf_error)?,
                    doc.add_builtin_font(BuiltinFont::HelveticaBold)
                        .map_err(pdf_error)?,
                ),
            };

            layer.set_outline_thickness(BORDER_THICKNESS);

            Ok(Self {
                doc,
                layer,
                regular,
                bold,
                fonts: fonts.clone(),
                geometry,
                font: crate::reports::layout::BODY_FONT,
            })
        }

        /// Serialize the document
        pub fn finish(self) -> RendicionResult<Vec<u8>> {
            let mut writer = BufWriter::new(Vec::<u8>::new());
            self.doc.save(&mut writer).map_err(pdf_error)?;
            writer
                .into_inner()
                .map_err(|e| RendicionError::Export(format!("Failed to write PDF: {}", e)))
        }

        fn y(&self, top_down: f64) -> Mm {
            Mm((self.geometry.height - top_down) as f32)
        }

        fn point(&self, x: f64, y: f64) -> (Point, bool) {
            (Point::new(Mm(x as f32), self.y(y)), false)
        }

        fn current_font(&self) -> &IndirectFontRef {
            match self.font.style {
                FontStyle::Regular => &self.regular,
                FontStyle::Bold => &self.bold,
            }
        }

        fn border(&self, rect: Rect) {
            self.layer.add_line(Line {
                points: vec![
                    self.point(rect.x, rect.y),
                    self.point(rect.x + rect.w, rect.y),
                    self.point(rect.x + rect.w, rect.bottom()),
                    self.point(rect.x, rect.bottom()),
                ],
                is_closed: true,
            });
        }

        /// Draw one line of text vertically centered on `middle`
        fn text(&self, rect: Rect, middle: f64, text: &str, align: Align) {
            if text.is_empty() {
                return;
            }
            let width = self.fonts.metrics(self.font).text_width(text);
            let x = match align {
                Align::Left => rect.x + CELL_PADDING,
                Align::Center => rect.x + (rect.w - width) / 2.0,
                Align::Right => rect.x + rect.w - CELL_PADDING - width,
            };
            let baseline = middle + self.font.size_mm() * BASELINE_SHIFT;
            self.layer.use_text(
                text,
                self.font.size_pt as f32,
                Mm(x as f32),
                self.y(baseline),
                self.current_font(),
            );
        }
    }

    impl Canvas for PdfCanvas {
        fn set_font(&mut self, font: FontSpec) {
            self.font = font;
        }

        fn cell(&mut self, rect: Rect, text: &str, align: Align, border: bool) {
            if border {
                self.border(rect);
            }
            self.text(rect, rect.y + rect.h / 2.0, text, align);
        }

        fn multi_cell(
            &mut self,
            rect: Rect,
            line_height: f64,
            lines: &[String],
            align: Align,
            border: bool,
        ) {
            if border {
                self.border(rect);
            }
            for (i, line) in lines.iter().enumerate() {
                let middle = rect.y + line_height * (i as f64 + 0.5);
                self.text(rect, middle, line, align);
            }
        }

        fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
            self.layer.add_line(Line {
                points: vec![self.point(x1, y1), self.point(x2, y2)],
                is_closed: false,
            });
        }

        fn image(&mut self, rect: Rect, bytes: &[u8]) -> Result<(), RenderSkip> {
            let decoded = image_crate::load_from_memory(bytes)
                .map_err(|e| RenderSkip::new("image", e.to_string()))?;
            let (px_w, px_h) = decoded.dimensions();
            if px_w == 0 || px_h == 0 {
                return Err(RenderSkip::new("image", "empty image"));
            }

            // Natural size at the reference resolution, then shrink to fit
            let mm_per_px = 25.4 / f64::from(IMAGE_DPI);
            let natural_w = f64::from(px_w) * mm_per_px;
            let natural_h = f64::from(px_h) * mm_per_px;
            let scale = (rect.w / natural_w).min(rect.h / natural_h);
            let (drawn_w, drawn_h) = (natural_w * scale, natural_h * scale);

            let x = rect.x + (rect.w - drawn_w) / 2.0;
            let bottom = rect.y + drawn_h;

            Image::from_dynamic_image(&decoded).add_to_layer(
                self.layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(x as f32)),
                    translate_y: Some(self.y(bottom)),
                    scale_x: Some(scale as f32),
                    scale_y: Some(scale as f32),
                    dpi: Some(IMAGE_DPI),
                    ..Default::default()
                },
            );
            Ok(())
        }

        fn page_break(&mut self) {
            let (page, layer) = self.doc.add_page(
                Mm(self.geometry.width as f32),
                Mm(self.geometry.height as f32),
                LAYER_NAME,
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.layer.set_outline_thickness(BORDER_THICKNESS);
        }
    }

    fn pdf_error(e: printpdf::Error) -> RendicionError {
        RendicionError::Export(format!("PDF generation failed: {}", e))
    }
}
