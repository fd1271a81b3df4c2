use std::path::PathBuf;

use catalog_diff::config::Config;
use clap::Parser;
use color_eyre::{Result, eyre::Context, eyre::eyre};

#[derive(Parser)]
#[command(
    name = "catalog-diff",
    version,
    about = "Report products added or removed per shop group between the two newest catalog captures"
)]
struct Cli {
    #[arg(
        index = 1,
        help = "Directory holding the captures (defaults to CATALOG_DIFF_DIR, then the executable's directory)"
    )]
    dir: Option<PathBuf>,
}

fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().wrap_err("failed to locate the running executable")?;
    exe.parent()
        .map(PathBuf::from)
        .ok_or_else(|| eyre!("executable {} has no parent directory", exe.display()))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let dir = match cli.dir.or_else(|| config.dir.clone()) {
        Some(dir) => dir,
        None => executable_dir()?,
    };

    let stdout = std::io::stdout();
    catalog_diff::run(&dir, &config, &mut stdout.lock())
}
