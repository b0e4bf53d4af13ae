use clap::Args;
use miette::Result;
use std::path::PathBuf;
use wad_archive::WadArchive;

#[derive(Args)]
pub struct ListArgs {
    /// An input WAD file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let wad = WadArchive::load(&self.file)?;

        for path in wad.paths() {
            if path != "/" && wad.is_directory(path) {
                println!("{path}/");
            } else {
                println!("{path}");
            }
        }
        Ok(())
    }
}
