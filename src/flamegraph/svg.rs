//! SVG drawing surface.
//!
//! Renders flame graph draw calls as SVG elements so a view can be exported
//! as a standalone file. Labels are wrapped in a nested `<svg>` viewport,
//! which clips them to their box.

use super::color::Rgba;
use super::surface::{FontMetrics, Rect, Surface};

#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    font_size: f64,
    title: Option<String>,
    body: String,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64, font_size: f64) -> Self {
        Self {
            width,
            height,
            font_size,
            title: None,
            body: String::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Complete SVG document of everything drawn since the last clear
    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        svg.push_str(&format!(
            r#"<style>text {{ font: {}px sans-serif; }}</style>"#,
            self.font_size
        ));
        if let Some(title) = &self.title {
            svg.push_str(&format!("<title>{}</title>", escape(title)));
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }
}

impl Surface for SvgSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.body.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.body.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            rect.x, rect.y, rect.width, rect.height, color
        ));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba) {
        self.body.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="{}"/>"#,
            rect.x, rect.y, rect.width, rect.height, color
        ));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, clip: Rect, color: Rgba) {
        self.body.push_str(&format!(
            r#"<svg x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"><text x="{:.2}" y="{:.2}" fill="{}">{}</text></svg>"#,
            clip.x,
            clip.y,
            clip.width,
            clip.height,
            x - clip.x,
            y - clip.y,
            color,
            escape(text)
        ));
    }

    fn font_metrics(&self) -> FontMetrics {
        FontMetrics::for_size(self.font_size)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
