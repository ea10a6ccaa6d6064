//! Show or save the effective configuration.

use std::path::PathBuf;

use levelcam_common::config::AppConfig;

pub fn run(config: &AppConfig, path: Option<PathBuf>, write: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        let saved = match path {
            Some(path) => {
                config.save_to(&path)?;
                path
            }
            None => config.save()?,
        };
        eprintln!("Saved configuration to: {}", saved.display());
    }

    Ok(())
}
