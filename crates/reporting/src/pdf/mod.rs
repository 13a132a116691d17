//! PDF surface module - the drawing boundary.
//!
//! The report assembler never touches `printpdf` directly; it works
//! against [`PdfSurface`], a small FPDF-flavored cell/cursor API. All
//! free text crosses the Latin-1 coercion step exactly once, here.

mod encoding;
mod surface;

pub use encoding::latin1;
pub use surface::{Align, FontStyle, Ln, PdfSurface};
