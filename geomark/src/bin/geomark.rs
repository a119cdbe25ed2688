//! Runs an export job described in a JSON settings file.
//!
//! ```shell
//! geomark stations.json
//! ```
//!
//! Records that cannot be exported are reported as warnings and do not change the exit code. The process fails only
//! if the export itself fails.

use anyhow::{anyhow, Context, Result};
use geomark::ExportSettings;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let (Some(settings_path), None) = (args.next(), args.next()) else {
        return Err(anyhow!(
            "geomark must be run with one argument - path to the export settings file"
        ));
    };

    let settings = ExportSettings::from_path(&settings_path)?;
    let summary = settings
        .run()
        .with_context(|| format!("export '{}' failed", settings.source_id))?;

    for issue in &summary.issues {
        eprintln!("warning: {issue}");
    }

    println!(
        "{} placemark(s) written, {} record(s) without geometry, {} record(s) with errors",
        summary.placemarks_written,
        summary.skipped,
        summary.issues.len()
    );

    Ok(())
}
