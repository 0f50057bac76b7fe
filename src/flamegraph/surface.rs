//! 2D drawing surfaces the flame graph renders onto.

use super::color::Rgba;

/// Axis-aligned rectangle in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Font measurements used for row height and label fitting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub ascent: f64,
    pub descent: f64,
    /// Advance of one character; labels are measured with a fixed advance
    pub char_width: f64,
}

impl FontMetrics {
    /// Typical proportions of a sans-serif font at `font_size` pixels
    pub fn for_size(font_size: f64) -> Self {
        Self {
            ascent: font_size * 0.8,
            descent: font_size * 0.2,
            char_width: font_size * 0.6,
        }
    }

    pub fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }
}

/// Canvas-like drawing target
pub trait Surface {
    /// Size in device pixels
    fn size(&self) -> (f64, f64);

    fn resize(&mut self, width: f64, height: f64);

    /// Erase everything
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    fn stroke_rect(&mut self, rect: Rect, color: Rgba);

    /// Draw `text` with its baseline at (`x`, `y`), clipped to `clip`
    fn fill_text(&mut self, text: &str, x: f64, y: f64, clip: Rect, color: Rgba);

    fn font_metrics(&self) -> FontMetrics;
}

/// A recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect(Rect, Rgba),
    StrokeRect(Rect, Rgba),
    Text { text: String, x: f64, y: f64, clip: Rect, color: Rgba },
}

/// Surface that keeps a log of draw calls instead of pixels.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    metrics: FontMetrics,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64, font_size: f64) -> Self {
        Self {
            width,
            height,
            metrics: FontMetrics::for_size(font_size),
            commands: Vec::new(),
        }
    }

    /// Rectangles filled since the last clear
    pub fn filled_rects(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect(rect, _) => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::StrokeRect(rect, color));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, clip: Rect, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            clip,
            color,
        });
    }

    fn font_metrics(&self) -> FontMetrics {
        self.metrics
    }
}
