//! Tabular report layout engine
//!
//! Lays a [`RenditionReport`] out on A4 pages through the [`Canvas`] draw
//! contract. Coordinates are millimetres with the origin at the top-left
//! corner of the page and y growing downwards.
//!
//! The engine walks the blocks strictly in order
//! (`Header -> DetailRows -> SummaryBlock -> SignatureBlock -> Done`) and
//! keeps a vertical cursor. Before a block is drawn its full height is
//! known, and the block moves to a new page when it does not fit in what is
//! left of the current one. Detail rows are checked one by one under
//! [`RowBreakPolicy::BeforeRow`] and not at all under
//! [`RowBreakPolicy::Unchecked`].
//!
//! Optional images (logo, scanned signatures) that the canvas refuses are
//! reported as [`RenderSkip`]s; the rest of the report is still drawn.

use std::fmt;

use super::columns::normalize_widths;
use super::metrics::{FontCapability, FontSpec};
use super::model::RenditionReport;
use super::profile::{ColumnSpec, Orientation, ReportProfile, RowBreakPolicy, SignatureSpec};
use super::wrap::wrap;

pub const A4_SHORT_SIDE: f64 = 210.0;
pub const A4_LONG_SIDE: f64 = 297.0;
pub const PAGE_MARGIN: f64 = 10.0;

/// Horizontal padding inside bordered cells
pub const CELL_PADDING: f64 = 1.0;

pub const BODY_FONT: FontSpec = FontSpec::regular(9.0);
pub const BODY_BOLD_FONT: FontSpec = FontSpec::bold(9.0);
pub const TITLE_FONT: FontSpec = FontSpec::bold(12.0);

pub const LINE_HEIGHT: f64 = 5.0;
const TITLE_LINE_HEIGHT: f64 = 6.0;
const ISSUED_LINE_HEIGHT: f64 = 6.0;
const TABLE_HEADER_MIN_HEIGHT: f64 = 7.0;
const META_LABEL_WIDTH: f64 = 45.0;
const HEADER_GAP: f64 = 4.0;
const SECTION_GAP: f64 = 6.0;

const SUMMARY_TITLE_HEIGHT: f64 = 7.0;
const SUMMARY_ROW_HEIGHT: f64 = 7.0;
/// Label and value column proportions of the summary block
const SUMMARY_SHARES: [f64; 2] = [3.0, 1.0];

pub const LOGO_X: f64 = 10.0;
pub const LOGO_Y: f64 = 8.0;
pub const LOGO_WIDTH: f64 = 30.0;
const LOGO_HEIGHT: f64 = 15.0;

const SIGNATURE_LEADING: f64 = 5.0;
/// Blank space above the rule of a box without an image
const SIGNATURE_SPACE: f64 = 20.0;
const SIGNATURE_IMAGE_HEIGHT: f64 = 25.0;
const SIGNATURE_TEXT_LINE: f64 = 5.0;
const SIGNATURE_ROW_GAP: f64 = 10.0;
/// Horizontal gap between the two boxes of a row
const SIGNATURE_GAP: f64 = 10.0;
const SIGNATURE_RULE_INSET: f64 = 8.0;

/// Page size and margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl PageGeometry {
    pub fn a4(orientation: Orientation) -> Self {
        let (width, height) = match orientation {
            Orientation::Portrait => (A4_SHORT_SIDE, A4_LONG_SIDE),
            Orientation::Landscape => (A4_LONG_SIDE, A4_SHORT_SIDE),
        };
        Self {
            width,
            height,
            margin: PAGE_MARGIN,
        }
    }

    pub fn usable_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn usable_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }

    pub fn top(&self) -> f64 {
        self.margin
    }

    pub fn bottom(&self) -> f64 {
        self.height - self.margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// An optional visual element that could not be drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSkip {
    pub element: String,
    pub reason: String,
}

impl RenderSkip {
    pub fn new(element: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RenderSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} skipped: {}", self.element, self.reason)
    }
}

/// Draw contract shared by the report emitters
///
/// Text handed to a canvas has already been prepared for its font
/// capability, and multi-line text has already been wrapped.
pub trait Canvas {
    fn set_font(&mut self, font: FontSpec);

    /// Single line of text in `rect`, vertically centered
    fn cell(&mut self, rect: Rect, text: &str, align: Align, border: bool);

    /// Pre-wrapped lines stacked from the top of `rect`
    fn multi_cell(
        &mut self,
        rect: Rect,
        line_height: f64,
        lines: &[String],
        align: Align,
        border: bool,
    );

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);

    /// Image scaled to fit inside `rect`, keeping its aspect ratio
    fn image(&mut self, rect: Rect, bytes: &[u8]) -> Result<(), RenderSkip>;

    /// Start a new page
    fn page_break(&mut self);
}

/// Layout progress; blocks are visited in this order exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LayoutState {
    Header,
    DetailRows,
    SummaryBlock,
    SignatureBlock,
    Done,
}

impl LayoutState {
    pub fn next(self) -> Self {
        match self {
            Self::Header => Self::DetailRows,
            Self::DetailRows => Self::SummaryBlock,
            Self::SummaryBlock => Self::SignatureBlock,
            Self::SignatureBlock | Self::Done => Self::Done,
        }
    }
}

/// Result of laying out one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOutcome {
    pub pages: usize,
    pub skipped: Vec<RenderSkip>,
}

/// Lays out one report onto a canvas
pub struct LayoutEngine<'a, C: Canvas> {
    canvas: &'a mut C,
    profile: &'a ReportProfile,
    fonts: &'a FontCapability,
    geometry: PageGeometry,
    widths: Vec<f64>,
    cursor: f64,
    state: LayoutState,
    pages: usize,
    skipped: Vec<RenderSkip>,
}

impl<'a, C: Canvas> LayoutEngine<'a, C> {
    pub fn new(canvas: &'a mut C, profile: &'a ReportProfile, fonts: &'a FontCapability) -> Self {
        let geometry = PageGeometry::a4(profile.orientation);
        let nominal: Vec<f64> = profile.columns.iter().map(|c| c.nominal_width).collect();
        let widths = normalize_widths(&nominal, geometry.usable_width());

        Self {
            canvas,
            profile,
            fonts,
            geometry,
            widths,
            cursor: geometry.top(),
            state: LayoutState::Header,
            pages: 1,
            skipped: Vec::new(),
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// Detail-table column widths, summing to the usable width
    pub fn column_widths(&self) -> &[f64] {
        &self.widths
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    /// Lay out the whole report
    pub fn render(mut self, report: &RenditionReport, logo: Option<&[u8]>) -> LayoutOutcome {
        if self.profile.include_header {
            self.draw_header(report, logo);
        }

        self.enter(LayoutState::DetailRows);
        self.draw_detail_table(report);

        self.enter(LayoutState::SummaryBlock);
        if self.profile.include_summary {
            self.draw_summary(report);
        }

        self.enter(LayoutState::SignatureBlock);
        if self.profile.include_signatures {
            self.draw_signatures();
        }

        self.enter(LayoutState::Done);
        tracing::debug!(
            pages = self.pages,
            skipped = self.skipped.len(),
            "Report laid out"
        );

        LayoutOutcome {
            pages: self.pages,
            skipped: self.skipped,
        }
    }

    fn enter(&mut self, next: LayoutState) {
        debug_assert_eq!(self.state.next(), next, "layout blocks out of order");
        tracing::trace!(from = ?self.state, to = ?next, "Layout state");
        self.state = next;
    }

    fn remaining(&self) -> f64 {
        self.geometry.bottom() - self.cursor
    }

    fn new_page(&mut self) {
        self.canvas.page_break();
        self.pages += 1;
        self.cursor = self.geometry.top();
    }

    /// Break the page when `height` does not fit below the cursor
    ///
    /// Returns whether a break happened. Never breaks at the top of a page.
    fn ensure_space(&mut self, height: f64) -> bool {
        if height > self.remaining() && self.cursor > self.geometry.top() {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn wrap_text(&self, text: &str, width: f64, font: FontSpec) -> Vec<String> {
        let metrics = self.fonts.metrics(font);
        wrap(&self.fonts.prepare(text), width - 2.0 * CELL_PADDING, &metrics)
    }

    fn prepared(&self, text: &str) -> String {
        self.fonts.prepare(text).into_owned()
    }

    fn draw_image(&mut self, element: &str, rect: Rect, bytes: &[u8]) {
        if let Err(mut skip) = self.canvas.image(rect, bytes) {
            skip.element = element.to_string();
            tracing::warn!(element = %skip.element, reason = %skip.reason, "Skipping report element");
            self.skipped.push(skip);
        }
    }

    fn draw_header(&mut self, report: &RenditionReport, logo: Option<&[u8]>) {
        let usable = self.geometry.usable_width();
        let left = self.geometry.margin;

        // Keep the title clear of the logo on both sides so it stays centered
        let reserved = match logo {
            Some(bytes) => {
                self.draw_image(
                    "logo",
                    Rect::new(LOGO_X, LOGO_Y, LOGO_WIDTH, LOGO_HEIGHT),
                    bytes,
                );
                2.0 * (LOGO_X + LOGO_WIDTH - left)
            }
            None => 0.0,
        };

        let title_width = usable - reserved;
        let title = self.wrap_text(&report.title, title_width, TITLE_FONT);
        let title_height = title.len() as f64 * TITLE_LINE_HEIGHT;
        self.canvas.set_font(TITLE_FONT);
        self.canvas.multi_cell(
            Rect::new(left + reserved / 2.0, self.cursor, title_width, title_height),
            TITLE_LINE_HEIGHT,
            &title,
            Align::Center,
            false,
        );
        self.cursor += title_height;
        if logo.is_some() {
            self.cursor = self.cursor.max(LOGO_Y + LOGO_HEIGHT);
        }
        self.cursor += 2.0;

        self.canvas.set_font(BODY_FONT);
        let issued = self.prepared(&report.issued_line());
        self.canvas.cell(
            Rect::new(left, self.cursor, usable, ISSUED_LINE_HEIGHT),
            &issued,
            Align::Left,
            false,
        );
        self.cursor += ISSUED_LINE_HEIGHT;

        let value_width = usable - META_LABEL_WIDTH;
        for (label, value) in &report.meta {
            let label_lines = self.wrap_text(label, META_LABEL_WIDTH, BODY_BOLD_FONT);
            let value_lines = self.wrap_text(value, value_width, BODY_FONT);
            let height = label_lines.len().max(value_lines.len()) as f64 * LINE_HEIGHT;
            self.ensure_space(height);

            self.canvas.set_font(BODY_BOLD_FONT);
            self.canvas.multi_cell(
                Rect::new(left, self.cursor, META_LABEL_WIDTH, height),
                LINE_HEIGHT,
                &label_lines,
                Align::Left,
                true,
            );
            self.canvas.set_font(BODY_FONT);
            self.canvas.multi_cell(
                Rect::new(left + META_LABEL_WIDTH, self.cursor, value_width, height),
                LINE_HEIGHT,
                &value_lines,
                Align::Left,
                true,
            );
            self.cursor += height;
        }

        self.cursor += HEADER_GAP;
    }

    fn column_align(column: &ColumnSpec) -> Align {
        if column.kind.is_numeric() {
            Align::Right
        } else {
            Align::Left
        }
    }

    fn draw_table_header(&mut self) {
        let profile = self.profile;
        let labels: Vec<Vec<String>> = profile
            .columns
            .iter()
            .zip(&self.widths)
            .map(|(column, &width)| self.wrap_text(&column.label, width, BODY_BOLD_FONT))
            .collect();
        let height = labels
            .iter()
            .map(|lines| lines.len() as f64 * LINE_HEIGHT)
            .fold(TABLE_HEADER_MIN_HEIGHT, f64::max);

        // Never leave the header alone at the bottom of a page
        self.ensure_space(height + LINE_HEIGHT);

        self.canvas.set_font(BODY_BOLD_FONT);
        let mut x = self.geometry.margin;
        for (lines, &width) in labels.iter().zip(&self.widths) {
            self.canvas.multi_cell(
                Rect::new(x, self.cursor, width, height),
                LINE_HEIGHT,
                lines,
                Align::Center,
                true,
            );
            x += width;
        }
        self.cursor += height;
    }

    /// Make room for a detail row according to the row-break policy
    fn place_row(&mut self, height: f64) {
        if self.profile.row_breaks == RowBreakPolicy::BeforeRow
            && self.ensure_space(height)
            && self.profile.repeat_table_header
        {
            self.draw_table_header();
        }
    }

    fn draw_detail_table(&mut self, report: &RenditionReport) {
        let profile = self.profile;
        let left = self.geometry.margin;
        let usable = self.geometry.usable_width();

        self.draw_table_header();
        self.canvas.set_font(BODY_FONT);

        let padded_to = profile.pad_rows.unwrap_or(0);
        if report.rows.is_empty() && padded_to == 0 {
            self.place_row(LINE_HEIGHT);
            self.canvas.set_font(BODY_FONT);
            self.canvas.cell(
                Rect::new(left, self.cursor, usable, LINE_HEIGHT),
                "Sin registros",
                Align::Center,
                true,
            );
            self.cursor += LINE_HEIGHT;
        }

        for row in &report.rows {
            let cells: Vec<(Vec<String>, Align)> = profile
                .columns
                .iter()
                .zip(&self.widths)
                .map(|(column, &width)| {
                    (
                        self.wrap_text(&row.cell(column.kind), width, BODY_FONT),
                        Self::column_align(column),
                    )
                })
                .collect();
            let height = cells
                .iter()
                .map(|(lines, _)| lines.len())
                .max()
                .unwrap_or(1) as f64
                * LINE_HEIGHT;

            self.place_row(height);
            self.canvas.set_font(BODY_FONT);
            let mut x = left;
            for ((lines, align), &width) in cells.iter().zip(&self.widths) {
                self.canvas.multi_cell(
                    Rect::new(x, self.cursor, width, height),
                    LINE_HEIGHT,
                    lines,
                    *align,
                    true,
                );
                x += width;
            }
            self.cursor += height;
        }

        for _ in report.rows.len()..padded_to {
            self.place_row(LINE_HEIGHT);
            self.canvas.set_font(BODY_FONT);
            let mut x = left;
            for &width in &self.widths {
                self.canvas.cell(
                    Rect::new(x, self.cursor, width, LINE_HEIGHT),
                    "",
                    Align::Left,
                    true,
                );
                x += width;
            }
            self.cursor += LINE_HEIGHT;
        }

        self.draw_total_row(report);
        self.cursor += SECTION_GAP;
    }

    fn draw_total_row(&mut self, report: &RenditionReport) {
        let left = self.geometry.margin;
        self.place_row(LINE_HEIGHT);
        self.canvas.set_font(BODY_BOLD_FONT);

        let total = self.prepared(&report.total_text);
        match self.widths.split_last() {
            Some((&last, rest)) if !rest.is_empty() => {
                let label_width: f64 = rest.iter().sum();
                self.canvas.cell(
                    Rect::new(left, self.cursor, label_width, LINE_HEIGHT),
                    "Total",
                    Align::Right,
                    true,
                );
                self.canvas.cell(
                    Rect::new(left + label_width, self.cursor, last, LINE_HEIGHT),
                    &total,
                    Align::Right,
                    true,
                );
            }
            _ => {
                self.canvas.cell(
                    Rect::new(left, self.cursor, self.geometry.usable_width(), LINE_HEIGHT),
                    &format!("Total {}", total),
                    Align::Right,
                    true,
                );
            }
        }
        self.cursor += LINE_HEIGHT;
    }

    fn draw_summary(&mut self, report: &RenditionReport) {
        let left = self.geometry.margin;
        let widths = normalize_widths(&SUMMARY_SHARES, self.geometry.usable_width());
        let (label_width, value_width) = (widths[0], widths[1]);

        let rows: Vec<(Vec<String>, String, f64)> = report
            .summary
            .iter()
            .map(|line| {
                let label = self.wrap_text(&line.label, label_width, BODY_FONT);
                let height = (label.len() as f64 * LINE_HEIGHT).max(SUMMARY_ROW_HEIGHT);
                (label, self.prepared(&line.value), height)
            })
            .collect();
        let block: f64 = SUMMARY_TITLE_HEIGHT + rows.iter().map(|(_, _, h)| h).sum::<f64>();

        self.ensure_space(block);

        self.canvas.set_font(BODY_BOLD_FONT);
        self.canvas.cell(
            Rect::new(left, self.cursor, label_width + value_width, SUMMARY_TITLE_HEIGHT),
            "Resumen",
            Align::Left,
            false,
        );
        self.cursor += SUMMARY_TITLE_HEIGHT;

        self.canvas.set_font(BODY_FONT);
        for (label, value, height) in &rows {
            self.canvas.multi_cell(
                Rect::new(left, self.cursor, label_width, *height),
                LINE_HEIGHT,
                label,
                Align::Left,
                true,
            );
            self.canvas.cell(
                Rect::new(left + label_width, self.cursor, value_width, *height),
                value,
                Align::Right,
                true,
            );
            self.cursor += height;
        }
        self.cursor += SECTION_GAP;
    }

    fn signature_box_height(spec: &SignatureSpec) -> f64 {
        let area = if spec.image.is_some() {
            SIGNATURE_IMAGE_HEIGHT
        } else {
            SIGNATURE_SPACE
        };
        area + SIGNATURE_TEXT_LINE * (1 + spec.detail_lines.len()) as f64
    }

    fn signature_row_height(row: &[SignatureSpec]) -> f64 {
        row.iter()
            .map(Self::signature_box_height)
            .fold(0.0, f64::max)
            + SIGNATURE_ROW_GAP
    }

    /// Total height of the signature block, known before anything is drawn
    pub fn signature_block_height(signatures: &[SignatureSpec]) -> f64 {
        if signatures.is_empty() {
            return 0.0;
        }
        SIGNATURE_LEADING
            + signatures
                .chunks(2)
                .map(Self::signature_row_height)
                .sum::<f64>()
    }

    fn draw_signatures(&mut self) {
        let profile = self.profile;
        let signatures = &profile.signatures;
        if signatures.is_empty() {
            return;
        }

        let block = Self::signature_block_height(signatures);
        let fits_on_a_page = block <= self.geometry.usable_height();
        if fits_on_a_page {
            self.ensure_space(block);
        } else {
            tracing::debug!(height = block, "Signature block taller than a page, breaking by row");
        }

        self.cursor += SIGNATURE_LEADING;
        for row in signatures.chunks(2) {
            let height = Self::signature_row_height(row);
            if !fits_on_a_page {
                self.ensure_space(height);
            }
            self.draw_signature_row(row, height);
        }
    }

    fn draw_signature_row(&mut self, row: &[SignatureSpec], height: f64) {
        let left = self.geometry.margin;
        let usable = self.geometry.usable_width();
        let box_width = (usable - SIGNATURE_GAP) / 2.0;
        let top = self.cursor;

        for (i, spec) in row.iter().enumerate() {
            let x = if row.len() == 1 {
                left + (usable - box_width) / 2.0
            } else {
                left + i as f64 * (box_width + SIGNATURE_GAP)
            };

            let area = match &spec.image {
                Some(bytes) => {
                    self.draw_image(
                        &format!("firma '{}'", spec.caption),
                        Rect::new(x, top, box_width, SIGNATURE_IMAGE_HEIGHT - 2.0),
                        bytes,
                    );
                    SIGNATURE_IMAGE_HEIGHT
                }
                None => SIGNATURE_SPACE,
            };

            let rule_y = top + area;
            self.canvas.line(
                x + SIGNATURE_RULE_INSET,
                rule_y,
                x + box_width - SIGNATURE_RULE_INSET,
                rule_y,
            );

            self.canvas.set_font(BODY_BOLD_FONT);
            let caption = self.prepared(&spec.caption);
            self.canvas.cell(
                Rect::new(x, rule_y, box_width, SIGNATURE_TEXT_LINE),
                &caption,
                Align::Center,
                false,
            );

            self.canvas.set_font(BODY_FONT);
            for (n, detail) in spec.detail_lines.iter().enumerate() {
                let detail = self.prepared(detail);
                self.canvas.cell(
                    Rect::new(
                        x + SIGNATURE_RULE_INSET,
                        rule_y + SIGNATURE_TEXT_LINE * (n + 1) as f64,
                        box_width - SIGNATURE_RULE_INSET,
                        SIGNATURE_TEXT_LINE,
                    ),
                    &detail,
                    Align::Left,
                    false,
                );
            }
        }

        self.cursor = top + height;
    }
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Font(FontSpec),
    Cell {
        rect: Rect,
        text: String,
        align: Align,
        border: bool,
    },
    MultiCell {
        rect: Rect,
        line_height: f64,
        lines: Vec<String>,
        align: Align,
        border: bool,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Image {
        rect: Rect,
        len: usize,
    },
    PageBreak,
}

impl DrawOp {
    /// Area covered on the page, if any
    pub fn rect(&self) -> Option<Rect> {
        match self {
            Self::Cell { rect, .. } | Self::MultiCell { rect, .. } | Self::Image { rect, .. } => {
                Some(*rect)
            }
            Self::Line { x1, y1, x2, y2 } => {
                Some(Rect::new(x1.min(*x2), y1.min(*y2), (x2 - x1).abs(), (y2 - y1).abs()))
            }
            Self::Font(_) | Self::PageBreak => None,
        }
    }

    /// Text drawn by this op
    pub fn text(&self) -> Vec<&str> {
        match self {
            Self::Cell { text, .. } => vec![text.as_str()],
            Self::MultiCell { lines, .. } => lines.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// Canvas that records draw calls instead of producing a document
///
/// Used to inspect a layout, e.g. to count pages before exporting.
#[derive(Debug, Default)]
pub struct DisplayList {
    ops: Vec<(usize, DrawOp)>,
    page: usize,
    reject_images: bool,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// A display list whose `image` calls always fail
    pub fn rejecting_images() -> Self {
        Self {
            reject_images: true,
            ..Self::default()
        }
    }

    /// Recorded ops with their 0-based page number
    pub fn ops(&self) -> &[(usize, DrawOp)] {
        &self.ops
    }

    pub fn page_count(&self) -> usize {
        self.page + 1
    }

    /// All drawn text in order
    pub fn texts(&self) -> Vec<&str> {
        self.ops.iter().flat_map(|(_, op)| op.text()).collect()
    }

    fn push(&mut self, op: DrawOp) {
        self.ops.push((self.page, op));
    }
}

impl Canvas for DisplayList {
    fn set_font(&mut self, font: FontSpec) {
        self.push(DrawOp::Font(font));
    }

    fn cell(&mut self, rect: Rect, text: &str, align: Align, border: bool) {
        self.push(DrawOp::Cell {
            rect,
            text: text.to_string(),
            align,
            border,
        });
    }

    fn multi_cell(
        &mut self,
        rect: Rect,
        line_height: f64,
        lines: &[String],
        align: Align,
        border: bool,
    ) {
        self.push(DrawOp::MultiCell {
            rect,
            line_height,
            lines: lines.to_vec(),
            align,
            border,
        });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.push(DrawOp::Line { x1, y1, x2, y2 });
    }

    fn image(&mut self, rect: Rect, bytes: &[u8]) -> Result<(), RenderSkip> {
        if self.reject_images || bytes.is_empty() {
            return Err(RenderSkip::new("image", "unsupported image data"));
        }
        self.push(DrawOp::Image {
            rect,
            len: bytes.len(),
        });
        Ok(())
    }

    fn page_break(&mut self) {
        self.push(DrawOp::PageBreak);
        self.page += 1;
    }
}
