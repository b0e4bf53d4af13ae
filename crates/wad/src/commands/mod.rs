pub mod extract;
pub mod import;
pub mod list;
pub mod mkdir;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// List every path in a WAD archive
    List(list::ListArgs),
    /// Extract a WAD archive into a directory
    Extract(extract::ExtractArgs),
    /// Create a directory inside a WAD archive
    Mkdir(mkdir::MkdirArgs),
    /// Import a local file into a WAD archive as a new lump
    Import(import::ImportArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::List(list) => list.handle(),
            Commands::Extract(extract) => extract.handle(),
            Commands::Mkdir(mkdir) => mkdir.handle(),
            Commands::Import(import) => import.handle(),
        }
    }
}
