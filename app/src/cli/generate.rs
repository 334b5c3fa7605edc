use std::path::PathBuf;

use girts_driver::{BuildType, Config, Database, Environment};

#[derive(Clone, Copy, clap::ValueEnum)]
enum CliEnvironment {
    Gjs,
    Node,
}

impl From<CliEnvironment> for Environment {
    fn from(environment: CliEnvironment) -> Self {
        match environment {
            CliEnvironment::Gjs => Environment::Gjs,
            CliEnvironment::Node => Environment::Node,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CliBuildType {
    Types,
    Lib,
}

impl From<CliBuildType> for BuildType {
    fn from(build_type: CliBuildType) -> Self {
        match build_type {
            CliBuildType::Types => BuildType::Types,
            CliBuildType::Lib => BuildType::Lib,
        }
    }
}

#[derive(clap::Args)]
pub struct Args {
    /// Packages to generate, e.g. Gtk-3.0; every discovered module when
    /// empty
    #[clap(value_parser, value_name = "MODULES")]
    modules: Vec<String>,

    /// Directory searched for .gir documents; may be given multiple times
    #[clap(long = "gir-directory", short = 'g', value_name = "DIR")]
    gir_directories: Vec<PathBuf>,

    /// Output directory
    #[clap(long, short, default_value = "./types")]
    outdir: PathBuf,

    /// Target environment
    #[clap(long, short, value_enum, default_value = "gjs")]
    environment: CliEnvironment,

    /// Output flavor
    #[clap(long, short, value_enum, default_value = "types")]
    build_type: CliBuildType,

    /// Emit classes with inheritance instead of the interface-plus-constant
    /// decomposition
    #[clap(long, default_value_t = true, action = clap::ArgAction::Set)]
    inheritance: bool,

    /// Directory with per-module `<package>.append.d.ts` override files
    #[clap(long, value_name = "DIR")]
    overrides: Option<PathBuf>,
}

pub fn exec(cmd: Args, verbose: bool) -> miette::Result<()> {
    let mut config = Config {
        environment: cmd.environment.into(),
        build_type: cmd.build_type.into(),
        inheritance: cmd.inheritance,
        outdir: cmd.outdir,
        overrides_dir: cmd.overrides,
        verbose,
        ..Config::default()
    };
    if !cmd.gir_directories.is_empty() {
        config.gir_directories = cmd.gir_directories;
    }

    let mut db = Database::new(config);
    let packages = if cmd.modules.is_empty() { db.discover() } else { cmd.modules };
    if packages.is_empty() {
        return Err(miette::miette!("No GIR modules found"));
    }

    let mut failed = false;
    for package in &packages {
        if let Err(err) = db.load_package(package) {
            failed = true;
            eprintln!("{:?}", miette::Report::new(err));
        }
    }
    db.prepare().map_err(miette::Report::new)?;

    // Dependencies are emitted too, so the generated imports resolve
    for uri in db.loaded_modules().to_vec() {
        match db.write_output(&uri) {
            Ok(package_name) => println!("Generated {package_name}"),
            Err(err) => {
                failed = true;
                eprintln!("{:?}", db.pretty_error(&uri, err));
            }
        }
    }

    if failed {
        return Err(miette::miette!("Some modules failed to generate"));
    }
    Ok(())
}
