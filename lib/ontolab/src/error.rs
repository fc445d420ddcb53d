use ontolab_reason::ReasoningError;
use ontolab_shacl::ShaclError;
use oxigraph::io::RdfSyntaxError;
use oxigraph::sparql::{QueryEvaluationError, SparqlSyntaxError};
use oxigraph::store::StorageError;
use oxrdf::IriParseError;
use sparesults::QueryResultsParseError;
use std::io;
use std::path::{Path, PathBuf};

/// An error raised while loading a graph.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The file is missing or could not be read.
    #[error("Failed to read {}: {source}", describe(path.as_deref()))]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },
    /// The content is not valid in the declared format.
    #[error("Invalid RDF in {}: {source}", describe(path.as_deref()))]
    Syntax {
        path: Option<PathBuf>,
        #[source]
        source: RdfSyntaxError,
    },
    /// The format name or file extension is not a known RDF serialization.
    #[error("Unknown RDF format '{0}'")]
    UnknownFormat(String),
    #[error("Invalid base IRI '{iri}': {source}")]
    InvalidBaseIri {
        iri: String,
        #[source]
        source: IriParseError,
    },
}

fn describe(path: Option<&Path>) -> String {
    path.map_or_else(|| "input".to_owned(), |p| p.display().to_string())
}

/// An error raised by a local SPARQL query.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryError {
    #[error(transparent)]
    Syntax(#[from] SparqlSyntaxError),
    #[error(transparent)]
    Evaluation(#[from] QueryEvaluationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Failed to read query file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An error raised while querying a remote SPARQL endpoint.
///
/// Requests are never retried.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RemoteQueryError {
    #[error("Invalid endpoint URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The endpoint answered with a non-success status.
    #[error("The endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid SPARQL results returned by {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: QueryResultsParseError,
    },
    #[error("{url} returned a boolean where solutions were expected")]
    UnexpectedBoolean { url: String },
    /// The endpoint uses `https` but no TLS backend was compiled in.
    #[error("{url} requires TLS but ontolab was built without a TLS backend")]
    MissingTls { url: String },
}

/// Any error raised by the ontolab harness.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Reasoning(#[from] ReasoningError),
    #[error(transparent)]
    Shacl(#[from] ShaclError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Remote(RemoteQueryError),
    /// A capability that was not compiled into this build.
    #[error("{capability} is not available in this build: {hint}")]
    MissingCapability {
        capability: &'static str,
        hint: &'static str,
    },
}

impl From<RemoteQueryError> for Error {
    fn from(error: RemoteQueryError) -> Self {
        match error {
            RemoteQueryError::MissingTls { .. } => Self::MissingCapability {
                capability: "TLS",
                hint: "rebuild with the `rustls-webpki` or `native-tls` feature to query https endpoints",
            },
            error => Self::Remote(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tls_is_a_missing_capability() {
        let error = Error::from(RemoteQueryError::MissingTls {
            url: "https://query.wikidata.org/sparql".into(),
        });
        assert!(matches!(
            error,
            Error::MissingCapability {
                capability: "TLS",
                ..
            }
        ));
        let error = Error::from(RemoteQueryError::Status {
            status: 500,
            body: String::new(),
        });
        assert!(matches!(error, Error::Remote(RemoteQueryError::Status { status: 500, .. })));
    }

    #[test]
    fn io_errors_name_the_path() {
        let error = ParseError::Io {
            path: Some(PathBuf::from("data/missing.ttl")),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(error.to_string(), "Failed to read data/missing.ttl: not found");
    }
}
