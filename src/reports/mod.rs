//! Rendition report layout
//!
//! Turns a ledger into a [`RenditionReport`] and lays it out on A4 pages:
//! text measurement and wrapping, column widths, report profiles and the
//! page-breaking layout engine shared by the PDF emitter.

pub mod columns;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod profile;
pub mod wrap;

pub use columns::normalize_widths;
pub use layout::{
    Align, Canvas, DisplayList, DrawOp, LayoutEngine, LayoutOutcome, LayoutState, PageGeometry,
    Rect, RenderSkip,
};
pub use metrics::{FontCapability, FontSpec, FontStyle, HelveticaMetrics, TextMeasure};
pub use model::{DetailRow, RenditionReport, ReportOptions, SummaryLine};
pub use profile::{
    ColumnKind, ColumnSpec, Orientation, ReportProfile, RowBreakPolicy, SignatureSpec,
    SummaryVariant,
};
pub use wrap::wrap;
