//! SPARQL evaluation against an in-memory copy of a graph.

use crate::error::QueryError;
use oxigraph::sparql::{QueryResults, SparqlEvaluator};
use oxigraph::store::Store;
use oxrdf::{Graph, GraphName, Term, Variable};
use std::fs;
use std::path::Path;
use tracing::debug;

/// One solution of a `SELECT` query.
///
/// Unbound variables are absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultRow {
    bindings: Vec<(Variable, Term)>,
}

impl ResultRow {
    pub fn new(bindings: impl IntoIterator<Item = (Variable, Term)>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }

    /// The term bound to the variable `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings
            .iter()
            .find(|(variable, _)| variable.as_str() == name)
            .map(|(_, term)| term)
    }

    /// The lexical value of a literal, or the IRI or blank node identifier.
    pub fn value(&self, name: &str) -> Option<&str> {
        Some(match self.get(name)? {
            Term::Literal(literal) => literal.value(),
            Term::NamedNode(node) => node.as_str(),
            Term::BlankNode(node) => node.as_str(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.bindings.iter().map(|(v, t)| (v, t))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// The solutions of a `SELECT` query with the variables it declares.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultTable {
    pub variables: Vec<Variable>,
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The values bound to `name` across all rows, skipping unbound ones.
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.rows.iter().filter_map(move |row| row.value(name))
    }
}

/// The result of a local query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Solutions(ResultTable),
    Boolean(bool),
    Graph(Graph),
}

impl QueryOutcome {
    /// The solutions, if this is the result of a `SELECT` query.
    pub fn into_solutions(self) -> Option<ResultTable> {
        match self {
            Self::Solutions(table) => Some(table),
            Self::Boolean(_) | Self::Graph(_) => None,
        }
    }
}

/// Runs SPARQL queries against a graph.
///
/// The graph is copied into an in-memory store once.
///
/// ```
/// use ontolab::{parse_graph, GraphFormat, LocalQueryRunner};
///
/// let graph = parse_graph(
///     "<http://example.com/s> <http://example.com/p> \"o\" .".as_bytes(),
///     GraphFormat::N_TRIPLES,
///     None,
/// )?;
/// let runner = LocalQueryRunner::new(&graph)?;
/// let table = runner
///     .run("SELECT ?o WHERE { ?s ?p ?o }")?
///     .into_solutions()
///     .unwrap();
/// assert_eq!(table.rows[0].value("o"), Some("o"));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct LocalQueryRunner {
    store: Store,
}

impl LocalQueryRunner {
    pub fn new(graph: &Graph) -> Result<Self, QueryError> {
        let store = Store::new()?;
        store.extend(
            graph
                .iter()
                .map(|t| t.into_owned().in_graph(GraphName::DefaultGraph)),
        )?;
        debug!(triples = graph.len(), "Loaded graph into the query store");
        Ok(Self { store })
    }

    /// Evaluates `query` and collects all of its results.
    pub fn run(&self, query: &str) -> Result<QueryOutcome, QueryError> {
        let results = SparqlEvaluator::new()
            .parse_query(query)?
            .on_store(&self.store)
            .execute()?;
        let outcome = match results {
            QueryResults::Solutions(solutions) => {
                let variables = solutions.variables().to_vec();
                let mut rows = Vec::new();
                for solution in solutions {
                    rows.push(ResultRow::new(
                        solution?
                            .iter()
                            .map(|(variable, term)| (variable.clone(), term.clone())),
                    ));
                }
                QueryOutcome::Solutions(ResultTable { variables, rows })
            }
            QueryResults::Boolean(value) => QueryOutcome::Boolean(value),
            QueryResults::Graph(triples) => {
                let mut graph = Graph::new();
                for triple in triples {
                    graph.insert(&triple?);
                }
                QueryOutcome::Graph(graph)
            }
        };
        debug!(
            results = match &outcome {
                QueryOutcome::Solutions(table) => table.len(),
                QueryOutcome::Boolean(_) => 1,
                QueryOutcome::Graph(graph) => graph.len(),
            },
            "Evaluated query"
        );
        Ok(outcome)
    }

    /// Reads the query in `path` whole and runs it unmodified.
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<QueryOutcome, QueryError> {
        let path = path.as_ref();
        let query = fs::read_to_string(path).map_err(|source| QueryError::Io {
            path: path.to_owned(),
            source,
        })?;
        debug!(path = %path.display(), "Running query file");
        self.run(&query)
    }
}
