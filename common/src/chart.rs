use std::path::Path;

use eyre::Result;

use crate::style::Style;

/// A single report chart.
///
/// Each implementation owns one figure per [`Chart::render`] call and writes
/// exactly one file, named [`Chart::filename`], into `out_dir`. The figure is
/// released on every exit path, including save failure.
pub trait Chart {
    /// Short name, for logging.
    fn name(&self) -> &'static str;
    /// Fixed output filename inside the report directory.
    fn filename(&self) -> &'static str;
    /// Renders the chart, overlaying `host_note` in the upper-left corner
    /// when present.
    fn render(&self, style: &Style, host_note: Option<&str>, out_dir: &Path) -> Result<()>;
}
