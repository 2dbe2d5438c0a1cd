//! `tidemark version` - display version information.

use crate::error::CliResult;
use crate::output;

/// Run the version command
pub async fn run() -> CliResult<()> {
    output::list(&format!("tidemark {}", env!("CARGO_PKG_VERSION")));
    Ok(())
}
