use miette::Diagnostic;
use thiserror::Error;

pub type LoweringResult<T = ()> = Result<T, Box<LoweringError>>;

#[derive(Error, Diagnostic, Debug, Clone)]
pub enum LoweringError {
    #[error("Module {package_name} has no usable namespace identity")]
    #[diagnostic(code("L-001"))]
    MissingNamespaceIdentity { package_name: String },
}
