//! Reading serialized ontologies into in-memory graphs.

use crate::error::ParseError;
use oxigraph::io::{RdfFormat, RdfParseError, RdfParser};
use oxrdf::{Graph, Triple};
use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// An RDF serialization an ontology can be loaded from.
///
/// ```
/// use ontolab::GraphFormat;
///
/// assert_eq!("owl".parse::<GraphFormat>()?, GraphFormat::RDF_XML);
/// assert_eq!("text/turtle".parse::<GraphFormat>()?, GraphFormat::TURTLE);
/// # Result::<_, ontolab::ParseError>::Ok(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphFormat(RdfFormat);

impl GraphFormat {
    pub const TURTLE: Self = Self(RdfFormat::Turtle);
    pub const RDF_XML: Self = Self(RdfFormat::RdfXml);
    pub const N_TRIPLES: Self = Self(RdfFormat::NTriples);

    /// Looks up a format by short name, file extension or media type.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Some(Self::TURTLE),
            "xml" | "rdf" | "rdfxml" | "rdf/xml" | "owl" => Some(Self::RDF_XML),
            "nt" | "ntriples" | "n-triples" => Some(Self::N_TRIPLES),
            _ => RdfFormat::from_extension(name)
                .or_else(|| RdfFormat::from_media_type(name))
                .map(Self),
        }
    }

    /// Guesses the format from the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let extension = path.extension().and_then(OsStr::to_str).unwrap_or_default();
        Self::from_name(extension).ok_or_else(|| {
            ParseError::UnknownFormat(if extension.is_empty() {
                path.display().to_string()
            } else {
                extension.to_owned()
            })
        })
    }

    #[inline]
    pub fn rdf_format(self) -> RdfFormat {
        self.0
    }
}

impl From<RdfFormat> for GraphFormat {
    #[inline]
    fn from(format: RdfFormat) -> Self {
        Self(format)
    }
}

impl FromStr for GraphFormat {
    type Err = ParseError;

    fn from_str(name: &str) -> Result<Self, ParseError> {
        Self::from_name(name).ok_or_else(|| ParseError::UnknownFormat(name.to_owned()))
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name())
    }
}

/// Loads the file at `path` into a new graph.
///
/// The format is guessed from the file extension when not given.
/// Loading is all-or-nothing: the first syntax error aborts it.
pub fn load_graph(path: impl AsRef<Path>, format: Option<GraphFormat>) -> Result<Graph, ParseError> {
    let path = path.as_ref();
    let format = match format {
        Some(format) => format,
        None => GraphFormat::from_path(path)?,
    };
    let file = File::open(path).map_err(|source| ParseError::Io {
        path: Some(path.to_owned()),
        source,
    })?;
    let graph = read_graph(BufReader::new(file), format, None, Some(path))?;
    debug!(
        path = %path.display(),
        %format,
        triples = graph.len(),
        "Loaded graph"
    );
    Ok(graph)
}

/// Parses a graph from any reader.
///
/// ```
/// use ontolab::{parse_graph, GraphFormat};
///
/// let graph = parse_graph(
///     "<http://example.com/s> <http://example.com/p> \"o\" .".as_bytes(),
///     GraphFormat::N_TRIPLES,
///     None,
/// )?;
/// assert_eq!(graph.len(), 1);
/// # Result::<_, ontolab::ParseError>::Ok(())
/// ```
pub fn parse_graph(
    reader: impl Read,
    format: GraphFormat,
    base_iri: Option<&str>,
) -> Result<Graph, ParseError> {
    read_graph(reader, format, base_iri, None)
}

fn read_graph(
    reader: impl Read,
    format: GraphFormat,
    base_iri: Option<&str>,
    path: Option<&Path>,
) -> Result<Graph, ParseError> {
    let mut parser = RdfParser::from_format(format.rdf_format()).without_named_graphs();
    if let Some(base_iri) = base_iri {
        parser = parser
            .with_base_iri(base_iri)
            .map_err(|source| ParseError::InvalidBaseIri {
                iri: base_iri.to_owned(),
                source,
            })?;
    }
    let mut graph = Graph::new();
    for quad in parser.for_reader(reader) {
        let quad = quad.map_err(|e| map_parse_error(e, path.map(PathBuf::from)))?;
        graph.insert(&Triple::from(quad));
    }
    Ok(graph)
}

fn map_parse_error(error: RdfParseError, path: Option<PathBuf>) -> ParseError {
    match error {
        RdfParseError::Io(source) => ParseError::Io { path, source },
        RdfParseError::Syntax(source) => ParseError::Syntax { path, source },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names() {
        for (name, format) in [
            ("turtle", GraphFormat::TURTLE),
            ("TTL", GraphFormat::TURTLE),
            ("xml", GraphFormat::RDF_XML),
            ("rdfxml", GraphFormat::RDF_XML),
            ("owl", GraphFormat::RDF_XML),
            ("nt", GraphFormat::N_TRIPLES),
            ("ntriples", GraphFormat::N_TRIPLES),
            ("application/rdf+xml", GraphFormat::RDF_XML),
        ] {
            assert_eq!(GraphFormat::from_name(name), Some(format), "{name}");
        }
        assert!(matches!(
            "docx".parse::<GraphFormat>(),
            Err(ParseError::UnknownFormat(name)) if name == "docx"
        ));
    }

    #[test]
    fn format_from_path() {
        assert_eq!(
            GraphFormat::from_path(Path::new("data/food_safety.rdf")).ok(),
            Some(GraphFormat::RDF_XML)
        );
        assert!(matches!(
            GraphFormat::from_path(Path::new("data/README")),
            Err(ParseError::UnknownFormat(_))
        ));
    }

    #[test]
    fn syntax_errors_abort_loading() {
        let result = parse_graph(
            "@prefix ex: <http://example.com/> .\nex:a ex:b ex:c .\nex:d ex:e".as_bytes(),
            GraphFormat::TURTLE,
            None,
        );
        assert!(matches!(result, Err(ParseError::Syntax { path: None, .. })));
    }

    #[test]
    #[expect(clippy::panic_in_result_fn)]
    fn relative_iris_use_the_base() -> Result<(), ParseError> {
        let graph = parse_graph(
            "<s> <p> <o> .".as_bytes(),
            GraphFormat::TURTLE,
            Some("http://example.com/"),
        )?;
        assert_eq!(
            graph.iter().next().map(|t| t.subject.to_string()),
            Some("<http://example.com/s>".to_owned())
        );
        Ok(())
    }
}
