//! Interactive flame graph rendering.
//!
//! This module turns a thread's sample tree into nested boxes:
//! - Layout with viewport culling onto any [`Surface`]
//! - Deterministic per-frame coloring
//! - Hit-testing, hover tooltips, zoom and scroll via [`FlameGraphView`]
//! - SVG export through [`SvgSurface`]

pub mod color;
pub mod hit;
pub mod layout;
pub mod surface;
pub mod svg;
pub mod tooltip;
pub mod view;

// Re-export main types
pub use color::{node_colors, node_hash, Mulberry32, NodeColors, Rgba};
pub use hit::find_node_at;
pub use layout::{draw_graph, row_height, LayoutCache};
pub use surface::{DrawCommand, FontMetrics, Rect, RecordingSurface, Surface};
pub use svg::SvgSurface;
pub use tooltip::{describe, HorizontalAnchor, Tooltip, VerticalAnchor};
pub use view::{ClickAction, FlameGraphView, Modifiers, ViewContext, ViewState};
