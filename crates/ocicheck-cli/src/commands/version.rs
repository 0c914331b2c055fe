//! Version command implementation.

use anyhow::Result;
use ocicheck::{PathConvention, SUPPORTED_VERSIONS};

/// Executes the version command.
pub fn execute() -> Result<()> {
    println!("ocicheck version {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Runtime-spec versions: {}", SUPPORTED_VERSIONS.join(", "));
    println!(
        "Host path separator:   {}",
        PathConvention::host().separator()
    );
    println!(
        "Platform:              {} / {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );

    Ok(())
}
