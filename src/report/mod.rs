pub mod json;
pub mod junit;
pub mod types;

use anyhow::Result;
use std::path::Path;

pub use types::RunResults;

/// Re-render a saved results file in the requested format
pub fn generate_report(results_path: &Path, format: &str, output: Option<&Path>) -> Result<()> {
    let raw = std::fs::read_to_string(results_path)?;
    let results: RunResults = serde_json::from_str(&raw)?;

    match format {
        "json" => json::generate(&results, output),
        "junit" => junit::generate(&results, output),
        _ => anyhow::bail!("Unknown format: {}", format),
    }
}

/// Write `results.json` for a finished run into the output directory
pub fn write_results(results: &RunResults, output_dir: &Path) -> Result<std::path::PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join("results.json");
    std::fs::write(&path, serde_json::to_string_pretty(results)?)?;
    Ok(path)
}
