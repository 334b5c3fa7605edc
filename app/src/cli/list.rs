use std::path::PathBuf;

use girts_driver::{Config, Database};

#[derive(clap::Args)]
pub struct Args {
    /// Directory searched for .gir documents; may be given multiple times
    #[clap(long = "gir-directory", short = 'g', value_name = "DIR")]
    gir_directories: Vec<PathBuf>,
}

pub fn exec(cmd: Args) -> miette::Result<()> {
    let mut config = Config::default();
    if !cmd.gir_directories.is_empty() {
        config.gir_directories = cmd.gir_directories;
    }
    let db = Database::new(config);
    for package_name in db.discover() {
        println!("{package_name}");
    }
    Ok(())
}
