use crate::output::read_profile;
use crate::profile::ThreadProfiles;
use anyhow::{Context, Result};
use std::path::Path;

/// List the threads of a profile with their sample counts
pub fn list_threads(profile: &Path) -> Result<()> {
    let data = read_profile(profile)
        .with_context(|| format!("Failed to read profile {}", profile.display()))?;
    let profiles = ThreadProfiles::from_data(data).context("Failed to load profile")?;
    let default = profiles.default_thread();

    for name in profiles.thread_names() {
        let Some(tree) = profiles.tree(name) else {
            continue;
        };
        let samples = tree.meta(tree.root()).map_or(0, |m| m.count);
        let marker = if name == default { "*" } else { " " };
        println!(
            "{} {:<20} {:>10} samples {:>8} frames  depth {}",
            marker,
            name,
            samples,
            tree.len(),
            tree.max_depth()
        );
    }

    Ok(())
}
