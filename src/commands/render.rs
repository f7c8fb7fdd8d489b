//! Command: print the rendered engine configuration file.
use anyhow::Result;

use crate::cli::RenderOpts;
use crate::logging::Logger;
use crate::render;

/// Render the configuration for the given parameters to stdout.
///
/// # Errors
///
/// Returns an error if the parameters file cannot be read or is invalid.
#[allow(clippy::print_stdout)]
pub fn run(opts: &RenderOpts, log: &Logger) -> Result<()> {
    let config = super::plan::load_config(&opts.params)?;
    let rendered = render::render(&config);
    log.debug(&format!("sha256 {}", rendered.checksum()));
    print!("{}", rendered.content);
    Ok(())
}
