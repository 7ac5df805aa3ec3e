//! Annotated series output port trait.

use std::io::Write;

use crate::domain::annotate::AnnotatedBar;
use crate::domain::error::SimchartError;
use crate::domain::indicator::Overlay;

/// Port for writing an annotated series with a chosen set of overlays.
pub trait ReportPort {
    fn write(
        &self,
        bars: &[AnnotatedBar],
        overlays: &[Overlay],
        out: &mut dyn Write,
    ) -> Result<(), SimchartError>;
}
