use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;
use url::Url;

#[derive(Error, Diagnostic, Debug, Clone)]
#[error(transparent)]
pub enum Error {
    #[diagnostic(transparent)]
    Parser(#[from] girts_parser::ParseError),

    #[diagnostic(transparent)]
    Lowering(#[from] Box<girts_lowering::LoweringError>),

    #[diagnostic(transparent)]
    Driver(#[from] DriverError),
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum DriverError {
    #[error("File not found: {0}")]
    FileNotFound(Url),
    #[error("Dependency not found: {0}")]
    DependencyNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] Arc<std::io::Error>),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Invalid URI: {0}")]
    InvalidUri(Url),
    #[error("Impossible: {0}")]
    Impossible(String),
}
