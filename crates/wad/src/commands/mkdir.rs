use clap::Args;
use miette::{miette, Result};
use std::path::PathBuf;
use tracing::info;
use wad_archive::WadArchive;

#[derive(Args)]
pub struct MkdirArgs {
    /// A WAD file to modify
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// The directory to create, as an absolute archive path
    #[arg(short, long, value_name = "PATH")]
    path: String,
}

impl MkdirArgs {
    pub fn handle(&self) -> Result<()> {
        let mut wad = WadArchive::load(&self.file)?;

        if wad.is_directory(&self.path) || wad.is_content(&self.path) {
            return Err(miette!("{} already exists", &self.path));
        }

        wad.create_directory(&self.path);
        if !wad.is_directory(&self.path) {
            return Err(miette!("unable to create {}", &self.path));
        }

        info!("created {}", &self.path);
        Ok(())
    }
}
