//! Flame command implementation.
//!
//! The flame command:
//! 1. Reads the profile JSON
//! 2. Loads the requested thread into a view backed by SVG surfaces
//! 3. Applies zoom and scroll the way a user would
//! 4. Writes the rendered graph

use super::models::FlameArgs;
use super::utils::load_settings;
use crate::flamegraph::{FlameGraphView, SvgSurface, ViewContext, ViewState};
use crate::output::{read_profile, write_svg};
use crate::profile::ThreadProfiles;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the flame command
///
/// **Public** - main entry point called from main.rs
pub fn execute_flame(args: FlameArgs) -> Result<()> {
    let start_time = Instant::now();
    let settings = load_settings(args.config.as_deref())?;

    info!("Step 1/3: Reading profile {}...", args.profile.display());
    let data = read_profile(&args.profile)
        .with_context(|| format!("Failed to read profile {}", args.profile.display()))?;
    let profiles = ThreadProfiles::from_data(data).context("Failed to load profile")?;

    info!("Step 2/3: Rendering flame graph...");
    let context = ViewContext::from_settings(&settings.flame);
    let ratio = context.ratio();
    let width = args.width.unwrap_or(settings.flame.width);
    let height = args.height.unwrap_or(settings.flame.height);
    let font_size = settings.flame.font_size * ratio;

    let title = args
        .title
        .clone()
        .unwrap_or_else(|| args.profile.display().to_string());
    let surface = SvgSurface::new(width * ratio, height * ratio, font_size).with_title(title);
    let mut view = FlameGraphView::new(surface, SvgSurface::new(width * ratio, height * ratio, font_size), context);

    view.set_data(profiles, args.thread.as_deref())
        .context("Failed to select thread")?;
    debug!("Showing thread {:?}", view.current_thread());

    if !args.zoom.is_empty() {
        let node = view
            .current_tree()
            .and_then(|tree| tree.node_at_path(&args.zoom))
            .with_context(|| format!("No node at zoom path {:?}", args.zoom))?;
        view.zoom_in_on_node(node);
    }

    if args.scroll > 0.0 {
        view.on_wheel(args.scroll);
        view.on_animation_frame();
        if view.state() != ViewState::Scrolled {
            warn!("Graph fits the canvas, ignoring --scroll");
        }
    }

    info!("Step 3/3: Writing output...");
    write_svg(&view.graph().to_svg(), &args.output_svg).context("Failed to write flame graph SVG")?;
    info!("✓ Flame graph written to: {}", args.output_svg.display());

    info!("Flame graph completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Validate flame arguments
///
/// **Public** - can be called before execute_flame for early validation
pub fn validate_flame_args(args: &FlameArgs) -> Result<()> {
    if args.profile.as_os_str().is_empty() {
        anyhow::bail!("Profile path cannot be empty");
    }

    for (name, value) in [("width", args.width), ("height", args.height)] {
        if let Some(value) = value {
            if !(value.is_finite() && value > 0.0) {
                anyhow::bail!("Canvas {} must be a positive number", name);
            }
        }
    }

    if !args.scroll.is_finite() || args.scroll < 0.0 {
        anyhow::bail!("Scroll offset must be zero or positive");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PROFILE: &str = r#"{
        "all": {
            "meta": { "func": "main", "file": "main.jl", "line": 1, "count": 10 },
            "children": [
                { "meta": { "func": "solve", "file": "solver.jl", "line": 42, "count": 6, "flags": 2 } }
            ]
        }
    }"#;

    #[test]
    fn test_validate_flame_args() {
        assert!(validate_flame_args(&FlameArgs::default()).is_ok());

        let args = FlameArgs {
            width: Some(0.0),
            ..Default::default()
        };
        assert!(validate_flame_args(&args).is_err());

        let args = FlameArgs {
            scroll: -5.0,
            ..Default::default()
        };
        assert!(validate_flame_args(&args).is_err());
    }

    #[test]
    fn test_execute_flame_writes_svg() {
        let mut profile = tempfile::NamedTempFile::new().unwrap();
        write!(profile, "{}", PROFILE).unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("flame.svg");

        let args = FlameArgs {
            profile: profile.path().to_path_buf(),
            output_svg: output.clone(),
            zoom: vec![0],
            ..Default::default()
        };
        execute_flame(args).unwrap();

        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains(">solve</text>"));
        assert!(!svg.contains(">main</text>"));
    }

    #[test]
    fn test_execute_flame_unknown_thread() {
        let mut profile = tempfile::NamedTempFile::new().unwrap();
        write!(profile, "{}", PROFILE).unwrap();

        let args = FlameArgs {
            profile: profile.path().to_path_buf(),
            thread: Some("thread 7".to_string()),
            ..Default::default()
        };
        assert!(execute_flame(args).is_err());
    }
}
