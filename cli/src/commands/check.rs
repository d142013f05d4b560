//! Command: validate the configuration tables without changing anything.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::logging::{Log, Logger};

/// Load both tables, detect the distro and run the validation pass.
///
/// Warnings are logged by [`super::CommandSetup::init`].
///
/// # Errors
///
/// Returns an error if setup fails or any validation warning was found.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let count = setup.warnings.len();
    if count > 0 {
        anyhow::bail!("{count} configuration warning(s)");
    }
    log.info("configuration ok");
    Ok(())
}
