use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    #[error("malformed metadata document: {0}")]
    Malformed(String),

    #[error("<{tag}> has no text")]
    MissingField { tag: String },
}

pub type Result<T> = std::result::Result<T, Error>;
