use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("cannot navigate to an empty location")]
    Empty,

    #[error("unparseable location '{input}': {source}")]
    Unparseable {
        input: String,
        #[source]
        source: url::ParseError,
    },
}
