//! Argument parsers, logging setup and progress bars used by both binaries.

use indicatif::{ProgressBar, ProgressStyle};
use takehost_io::BitDepth;

/// Parse `--bits` (16, 24 or 32) for clap's `value_parser`.
pub fn parse_bit_depth(s: &str) -> Result<BitDepth, String> {
    s.trim()
        .parse::<u16>()
        .ok()
        .and_then(BitDepth::from_bits)
        .ok_or_else(|| format!("Invalid bit depth: '{s}' (expected 16, 24 or 32)"))
}

/// Install the tracing subscriber on stderr.
///
/// `RUST_LOG` wins; otherwise `default_level` applies, or `debug` when
/// `verbose` is set.
pub fn init_logging(default_level: &str, verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let fallback = if verbose { "debug" } else { default_level };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .init();
}

/// Progress bar in the house style.
pub fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
    {
        bar.set_style(style.progress_chars("##-"));
    }
    bar
}
