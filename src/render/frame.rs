use crate::error::AxisResult;
use crate::render::{GlyphRunPrimitive, PathPrimitive, PathRole, TextPrimitive};

/// Backend-agnostic draw list for one axis layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisFrame {
    pub paths: Vec<PathPrimitive>,
    pub texts: Vec<TextPrimitive>,
    pub glyph_runs: Vec<GlyphRunPrimitive>,
}

impl AxisFrame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_path(mut self, path: PathPrimitive) -> Self {
        self.paths.push(path);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_glyph_run(mut self, run: GlyphRunPrimitive) -> Self {
        self.glyph_runs.push(run);
        self
    }

    pub fn paths_with_role(&self, role: PathRole) -> impl Iterator<Item = &PathPrimitive> {
        self.paths.iter().filter(move |path| path.role == role)
    }

    pub fn validate(&self) -> AxisResult<()> {
        for path in &self.paths {
            path.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }
        for run in &self.glyph_runs {
            run.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.texts.is_empty() && self.glyph_runs.is_empty()
    }
}
