pub mod cst;
mod read;
mod result;

use url::Url;

pub use result::*;

/// Parse a single GIR document into its concrete syntax tree.
pub fn parse_module(uri: Url, source: &str) -> Result<cst::decls::Module, ParseError> {
    let document = roxmltree::Document::parse(source)
        .map_err(|err| ParseError::Xml { message: err.to_string() })?;
    let namespace = read::read_namespace(&document, &uri)?;
    Ok(cst::decls::Module { uri, namespace })
}
