use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::info;
use wad_archive::WadArchive;

#[derive(Args)]
pub struct ImportArgs {
    /// A WAD file to modify
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A local file whose bytes fill the new lump
    #[arg(short, long, value_name = "SRC")]
    source: PathBuf,

    /// The lump to create, as an absolute archive path
    #[arg(short, long, value_name = "PATH")]
    path: String,
}

impl ImportArgs {
    pub fn handle(&self) -> Result<()> {
        let data = std::fs::read(&self.source)
            .into_diagnostic()
            .context(format!("reading {}", self.source.display()))?;

        let mut wad = WadArchive::load(&self.file)?;

        if wad.is_content(&self.path) || wad.is_directory(&self.path) {
            return Err(miette!("{} already exists", &self.path));
        }

        wad.create_file(&self.path);
        if !wad.is_content(&self.path) {
            return Err(miette!("unable to create {}", &self.path));
        }

        let written = wad.write_at(&self.path, &data, 0).unwrap_or(0);
        if written != data.len() {
            return Err(miette!("unable to fill {}", &self.path));
        }

        info!("imported {} ({written} bytes)", &self.path);
        Ok(())
    }
}
