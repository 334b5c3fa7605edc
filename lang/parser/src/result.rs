use miette::{Diagnostic, SourceSpan};
use thiserror::Error;
use url::Url;

#[derive(Error, Diagnostic, Debug, Clone)]
pub enum ParseError {
    #[error("Failed to parse GIR document: {message}")]
    #[diagnostic(code("P-001"))]
    Xml { message: String },

    #[error("Document {uri} contains no namespace element")]
    #[diagnostic(code("P-002"))]
    MissingNamespace { uri: Url },

    #[error("Missing required attribute `{attribute}` on <{element}>")]
    #[diagnostic(code("P-003"))]
    MissingAttribute {
        element: String,
        attribute: String,
        #[label("required here")]
        span: SourceSpan,
    },
}
