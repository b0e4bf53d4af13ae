use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::Write, path::PathBuf};
use tracing::info;
use wad_archive::WadArchive;

#[derive(Args)]
pub struct ExtractArgs {
    /// An input WAD file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let wad = WadArchive::load(&self.file)?;

        for path in wad.paths() {
            if !wad.is_content(path) {
                continue;
            }

            let size = wad.size_of(path).unwrap_or(0) as usize;
            let mut data = vec![0u8; size];
            if size > 0 {
                wad.read_at(path, &mut data, 0);
            }

            let target = self.directory.join(path.trim_start_matches('/'));
            info!("writing {}", target.display());

            if let Some(parent) = target.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let mut out = if !self.overwrite {
                File::create_new(&target)
                    .into_diagnostic()
                    .context(format!("creating {}", target.display()))?
            } else {
                File::create(&target)
                    .into_diagnostic()
                    .context(format!("creating {}", target.display()))?
            };

            out.write_all(&data).into_diagnostic()?;
        }
        Ok(())
    }
}
