use std::path::PathBuf;

use girts_lowering::{BuildType, EmitOptions, Environment};

/// Configuration of a generation run.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub build_type: BuildType,
    /// Emit classes with `extends` instead of the interface-plus-constant
    /// decomposition
    pub inheritance: bool,
    pub outdir: PathBuf,
    pub gir_directories: Vec<PathBuf>,
    /// Directory holding per-module `<package>.append.d.ts` override files
    pub overrides_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Gjs,
            build_type: BuildType::Types,
            inheritance: true,
            outdir: PathBuf::from("./types"),
            gir_directories: vec![PathBuf::from("/usr/share/gir-1.0")],
            overrides_dir: None,
            verbose: false,
        }
    }
}

impl Config {
    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            environment: self.environment,
            build_type: self.build_type,
            inheritance: self.inheritance,
            // node-gtk exposes camel-cased members only
            allow_quotes: self.environment == Environment::Gjs,
        }
    }
}
