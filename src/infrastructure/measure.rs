//! Text measurement without a rendering backend

use crate::application::services::{TextMeasure, TextMetrics};
use crate::config::MeasureSettings;

/// Fixed advance per character, scaled by the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    pub char_width: f64,
}

impl MonospaceMeasure {
    pub fn new(char_width: f64) -> Self {
        Self { char_width }
    }
}

impl From<&MeasureSettings> for MonospaceMeasure {
    fn from(settings: &MeasureSettings) -> Self {
        Self::new(settings.char_width)
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, font_size: f64) -> TextMetrics {
        TextMetrics {
            width: text.chars().count() as f64 * font_size * self.char_width,
        }
    }
}
