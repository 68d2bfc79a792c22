use crate::error::AxisResult;
use crate::render::{AxisFrame, AxisRenderer};

/// No-op renderer used by tests and headless layout.
///
/// It still validates frame content so tests can catch corrupted geometry
/// before a real backend is involved.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_path_count: usize,
    pub last_text_count: usize,
    pub last_glyph_run_count: usize,
}

impl AxisRenderer for NullRenderer {
    fn render(&mut self, frame: &AxisFrame) -> AxisResult<()> {
        frame.validate()?;
        self.last_path_count = frame.paths.len();
        self.last_text_count = frame.texts.len();
        self.last_glyph_run_count = frame.glyph_runs.len();
        Ok(())
    }
}
