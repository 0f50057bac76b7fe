//! Interactive flame graph view.
//!
//! The view owns two surfaces: the graph itself and a transparent overlay
//! for the hover highlight. Pointer and wheel input is coalesced per
//! animation frame: while an update of a kind is pending, further events of
//! that kind are dropped, and [`FlameGraphView::on_animation_frame`] applies
//! whatever is pending in one layout pass.

use super::color::Rgba;
use super::hit::find_node_at;
use super::layout::{draw_graph, LayoutCache};
use super::surface::Surface;
use super::tooltip::Tooltip;
use crate::profile::{NodeId, NodeMeta, SampleTree, ThreadProfiles};
use crate::utils::config::FlameSettings;
use crate::utils::error::ProfileError;
use bitflags::bitflags;
use log::{debug, info};

bitflags! {
    /// Keyboard modifiers held during a pointer event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0x01;
        const ALT = 0x02;
        const CTRL = 0x04;
        const META = 0x08;
    }
}

/// Per-view rendering configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewContext {
    /// Device pixels per CSS pixel
    pub pixel_ratio: f64,
    pub highlight_fill: Rgba,
    pub highlight_stroke: Rgba,
}

impl Default for ViewContext {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            highlight_fill: Rgba::new(255, 255, 255, 0.3),
            highlight_stroke: Rgba::new(0, 0, 0, 0.8),
        }
    }
}

impl ViewContext {
    pub fn from_settings(settings: &FlameSettings) -> Self {
        Self {
            pixel_ratio: settings.pixel_ratio,
            ..Self::default()
        }
    }

    /// Effective pixel ratio; invalid values fall back to 1
    pub fn ratio(&self) -> f64 {
        if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No profile loaded
    Empty,
    /// Showing a thread from its root, unscrolled
    Loaded,
    /// Showing a subtree below the thread root
    Zoomed,
    /// Scrolled down; takes precedence over `Zoomed`
    Scrolled,
}

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    OpenFile(NodeId),
    Zoom(NodeId),
    Reset,
    Ignored,
}

type OpenFileCallback = Box<dyn FnMut(&NodeMeta)>;
type ThreadChangeCallback = Box<dyn FnMut(&str)>;

pub struct FlameGraphView<S: Surface> {
    graph: S,
    overlay: S,
    context: ViewContext,

    profiles: Option<ThreadProfiles>,
    current_thread: Option<String>,
    active_node: Option<NodeId>,
    /// Vertical offset of the active node's row in device pixels, never positive
    scroll_position: f64,
    layout: LayoutCache,

    hovered: Option<NodeId>,
    tooltip: Option<Tooltip>,

    pending_hover: Option<(f64, f64)>,
    pending_scroll: Option<f64>,
    redraw_scheduled: bool,

    on_open_file: Option<OpenFileCallback>,
    on_thread_change: Option<ThreadChangeCallback>,
}

impl<S: Surface> FlameGraphView<S> {
    /// Both surfaces are sized in device pixels.
    pub fn new(graph: S, overlay: S, context: ViewContext) -> Self {
        Self {
            graph,
            overlay,
            context,
            profiles: None,
            current_thread: None,
            active_node: None,
            scroll_position: 0.0,
            layout: LayoutCache::default(),
            hovered: None,
            tooltip: None,
            pending_hover: None,
            pending_scroll: None,
            redraw_scheduled: false,
            on_open_file: None,
            on_thread_change: None,
        }
    }

    pub fn set_on_open_file(&mut self, callback: impl FnMut(&NodeMeta) + 'static) {
        self.on_open_file = Some(Box::new(callback));
    }

    pub fn set_on_thread_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_thread_change = Some(Box::new(callback));
    }

    /// Load new samples and show `thread` (or the default thread) from its root.
    pub fn set_data(
        &mut self,
        profiles: ThreadProfiles,
        thread: Option<&str>,
    ) -> Result<(), ProfileError> {
        let thread = thread.unwrap_or_else(|| profiles.default_thread()).to_string();
        let root = profiles
            .tree(&thread)
            .map(SampleTree::root)
            .ok_or_else(|| ProfileError::UnknownThread(thread.clone()))?;

        info!("Showing thread {}", thread);

        self.profiles = Some(profiles);
        self.current_thread = Some(thread);
        self.active_node = Some(root);
        self.scroll_position = 0.0;
        self.pending_hover = None;
        self.pending_scroll = None;
        self.layout.invalidate();
        self.redraw();
        Ok(())
    }

    /// Switch to another thread of the loaded profile
    pub fn select_thread(&mut self, thread: &str) -> Result<(), ProfileError> {
        let root = self
            .profiles
            .as_ref()
            .and_then(|p| p.tree(thread))
            .map(SampleTree::root)
            .ok_or_else(|| ProfileError::UnknownThread(thread.to_string()))?;

        debug!("Switching to thread {}", thread);

        self.current_thread = Some(thread.to_string());
        self.active_node = Some(root);
        self.scroll_position = 0.0;
        self.layout.invalidate();
        self.redraw();

        if let Some(callback) = self.on_thread_change.as_mut() {
            callback(thread);
        }
        Ok(())
    }

    /// Drop all data and erase both surfaces
    pub fn clear(&mut self) {
        self.profiles = None;
        self.current_thread = None;
        self.active_node = None;
        self.scroll_position = 0.0;
        self.layout.invalidate();
        self.hovered = None;
        self.tooltip = None;
        self.pending_hover = None;
        self.pending_scroll = None;
        self.redraw_scheduled = false;
        self.graph.clear();
        self.overlay.clear();
    }

    /// Back to the current thread's root, unscrolled
    pub fn reset_view(&mut self) {
        let Some(root) = self.current_tree().map(SampleTree::root) else {
            return;
        };
        self.active_node = Some(root);
        self.scroll_position = 0.0;
        self.redraw();
    }

    pub fn zoom_in_on_node(&mut self, node: NodeId) {
        if self.current_tree().and_then(|t| t.get(node)).is_none() {
            return;
        }
        debug!("Zooming in on node {}", node.0);
        self.active_node = Some(node);
        self.scroll_position = 0.0;
        self.redraw();
    }

    /// Lay out and draw the active subtree now
    pub fn redraw(&mut self) {
        self.redraw_scheduled = false;
        self.clear_hover();
        self.graph.clear();

        let tree = match (&self.profiles, &self.current_thread) {
            (Some(profiles), Some(thread)) => profiles.tree(thread),
            _ => None,
        };
        let (Some(tree), Some(active)) = (tree, self.active_node) else {
            self.layout.invalidate();
            return;
        };

        let (width, _) = self.graph.size();
        draw_graph(
            &mut self.graph,
            tree,
            active,
            width,
            0.0,
            self.scroll_position,
            &mut self.layout,
        );
    }

    /// Redraw on the next animation frame
    pub fn request_redraw(&mut self) {
        self.redraw_scheduled = true;
    }

    /// New canvas size in CSS pixels
    pub fn resize(&mut self, width: f64, height: f64) {
        let ratio = self.context.ratio();
        self.graph.resize(width * ratio, height * ratio);
        self.overlay.resize(width * ratio, height * ratio);
        self.request_redraw();
    }

    pub fn on_mouse_move(&mut self, x: f64, y: f64) {
        if self.profiles.is_none() || self.pending_hover.is_some() {
            return;
        }
        self.pending_hover = Some((x, y));
    }

    pub fn on_mouse_leave(&mut self) {
        self.pending_hover = None;
        self.clear_hover();
    }

    /// Modifier-click opens the frame's source, a plain click zooms into it
    /// and a click on empty space resets the view.
    pub fn on_click(&mut self, x: f64, y: f64, modifiers: Modifiers) -> ClickAction {
        if self.profiles.is_none() {
            return ClickAction::Ignored;
        }

        let Some(node) = self.node_at(x, y) else {
            self.reset_view();
            return ClickAction::Reset;
        };

        if modifiers.intersects(Modifiers::CTRL | Modifiers::META) {
            let meta = match (&self.profiles, &self.current_thread) {
                (Some(profiles), Some(thread)) => {
                    profiles.tree(thread).and_then(|t| t.meta(node))
                }
                _ => None,
            };
            if let (Some(callback), Some(meta)) = (self.on_open_file.as_mut(), meta) {
                callback(meta);
            }
            return ClickAction::OpenFile(node);
        }

        self.zoom_in_on_node(node);
        ClickAction::Zoom(node)
    }

    /// Wheel delta in CSS pixels, positive scrolls down
    pub fn on_wheel(&mut self, delta_y: f64) {
        if self.profiles.is_none() || self.pending_scroll.is_some() {
            return;
        }
        if delta_y < 0.0 && self.scroll_position >= 0.0 {
            return;
        }
        if delta_y > 0.0 && !self.layout.can_scroll_down() {
            return;
        }
        self.pending_scroll = Some(delta_y);
    }

    /// Apply pending scroll, redraw and hover updates.
    pub fn on_animation_frame(&mut self) {
        if let Some(delta) = self.pending_scroll.take() {
            let delta = delta * self.context.ratio();
            self.scroll_position = (self.scroll_position - delta).min(0.0);
            self.redraw_scheduled = true;
        }

        if self.redraw_scheduled {
            self.redraw();
        }

        if let Some((x, y)) = self.pending_hover.take() {
            self.update_hover(x, y);
        }
    }

    pub fn state(&self) -> ViewState {
        let Some(tree) = self.current_tree() else {
            return ViewState::Empty;
        };
        if self.scroll_position < 0.0 {
            ViewState::Scrolled
        } else if self.active_node != Some(tree.root()) {
            ViewState::Zoomed
        } else {
            ViewState::Loaded
        }
    }

    pub fn current_thread(&self) -> Option<&str> {
        self.current_thread.as_deref()
    }

    pub fn current_tree(&self) -> Option<&SampleTree> {
        let thread = self.current_thread.as_deref()?;
        self.profiles.as_ref()?.tree(thread)
    }

    pub fn profiles(&self) -> Option<&ThreadProfiles> {
        self.profiles.as_ref()
    }

    pub fn active_node(&self) -> Option<NodeId> {
        self.active_node
    }

    pub fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn layout(&self) -> &LayoutCache {
        &self.layout
    }

    pub fn graph(&self) -> &S {
        &self.graph
    }

    pub fn overlay(&self) -> &S {
        &self.overlay
    }

    /// Hit-test at CSS pixel coordinates
    pub fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
        let tree = self.current_tree()?;
        let active = self.active_node?;
        let ratio = self.context.ratio();
        find_node_at(tree, &self.layout, active, x * ratio, y * ratio)
    }

    fn update_hover(&mut self, x: f64, y: f64) {
        self.clear_hover();

        let Some(node) = self.node_at(x, y) else {
            return;
        };
        let Some(rect) = self.layout.rect(node) else {
            return;
        };

        let Some(tree) = self.current_tree() else {
            return;
        };
        let total = self
            .active_node
            .and_then(|id| tree.meta(id))
            .map_or(0, |m| m.count);
        let Some(meta) = tree.meta(node) else {
            return;
        };

        let ratio = self.context.ratio();
        let (width, height) = self.graph.size();
        let tooltip = Tooltip::for_node(meta, total, x, y, width / ratio, height / ratio);

        self.overlay.fill_rect(rect, self.context.highlight_fill);
        self.overlay.stroke_rect(rect, self.context.highlight_stroke);
        self.hovered = Some(node);
        self.tooltip = Some(tooltip);
    }

    fn clear_hover(&mut self) {
        let had_hover = self.hovered.take().is_some();
        if self.tooltip.take().is_some() || had_hover {
            self.overlay.clear();
        }
    }
}
