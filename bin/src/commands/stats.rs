use anyhow::{Context, Result};
use quire_buffer::{Buffer, Config};
use quire_rblist::Sequence;
use std::{
    fmt,
    path::{Path, PathBuf},
};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub len: usize,
    pub lines: usize,
    pub depth: usize,
    pub widest_line: usize,
}

impl Stats {
    pub fn of(buffer: &Buffer) -> Self {
        let widest_line = (0..=buffer.line_count())
            .filter_map(|line| buffer.line_display_width(line))
            .max()
            .unwrap_or(0);

        Self {
            len: buffer.len(),
            lines: buffer.line_count() + 1,
            depth: buffer.text().depth(),
            widest_line,
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "length:      {}", self.len)?;
        writeln!(f, "lines:       {}", self.lines)?;
        writeln!(f, "depth:       {}", self.depth)?;
        write!(f, "widest line: {}", self.widest_line)
    }
}

/// Load `file` into a buffer configured from `config_override` (or the discovered
/// config) and compute its stats.
pub fn load(file: &Path, config_override: Option<&Path>) -> Result<Stats> {
    let discovered = discovered_config();
    let config = Config::load_with_overrides(config_override, discovered.as_deref())?;

    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let buffer = Buffer::with_config(Sequence::from(contents), &config);

    let stats = Stats::of(&buffer);
    info!(file = %file.display(), len = stats.len, depth = stats.depth, "Computed stats");
    Ok(stats)
}

pub fn run(file: &Path, config_override: Option<&Path>) -> Result<()> {
    let stats = load(file, config_override)?;
    println!("{stats}");
    Ok(())
}

/// `<config_dir>/quire/config.toml`, if it exists.
fn discovered_config() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("quire").join("config.toml");
    path.is_file().then_some(path)
}
