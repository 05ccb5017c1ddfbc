//! Config printing command

use crate::ConfigArgs;
use anyhow::{Context, Result};
use pixelscope_view::ViewerConfig;
use pixelscope_view::config::default_path;

pub fn run(args: ConfigArgs, config: &ViewerConfig) -> Result<()> {
    match args.write {
        Some(path) => {
            config
                .save(&path)
                .with_context(|| format!("Failed to write config: {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => {
            let text = config.to_ron_string().context("Failed to serialize config")?;
            if let Some(path) = default_path() {
                println!("// default location: {}", path.display());
            }
            println!("{text}");
        }
    }
    Ok(())
}
