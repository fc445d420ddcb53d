//! Pluggable reasoning and validation engines.
//!
//! The tutorial commands only talk to these traits so another closure or
//! SHACL implementation can be swapped in without touching them.

use crate::error::Error;
use ontolab_reason::{ClosureReasoner, ClosureStats};
use ontolab_shacl::{ShaclError, ShaclValidator, ShapesGraph, ValidationOptions, ValidationReport};
use oxrdf::Graph;
use tracing::info;

/// A monotonic inference step: the output always contains the input.
pub trait Reasoner {
    /// Adds every derivable triple to `graph`.
    fn expand(&self, graph: &mut Graph) -> Result<ClosureStats, Error>;

    /// Returns the closure of `graph` without modifying it.
    fn closure(&self, graph: &Graph) -> Result<Graph, Error> {
        let mut closure = graph.iter().collect::<Graph>();
        self.expand(&mut closure)?;
        Ok(closure)
    }
}

impl Reasoner for ClosureReasoner {
    fn expand(&self, graph: &mut Graph) -> Result<ClosureStats, Error> {
        Ok(Self::expand(self, graph)?)
    }

    fn closure(&self, graph: &Graph) -> Result<Graph, Error> {
        Ok(Self::closure(self, graph)?)
    }
}

/// The outcome of checking a data graph against a shapes graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conformance {
    pub conforms: bool,
    /// One line per result: `focus node: message`.
    pub violations: Vec<String>,
    /// Full human-readable report.
    pub text: String,
}

impl From<&ValidationReport> for Conformance {
    fn from(report: &ValidationReport) -> Self {
        Self {
            conforms: report.conforms(),
            violations: report
                .results()
                .iter()
                .map(|result| format!("{}: {}", result.focus_node, result.message))
                .collect(),
            text: report.to_string(),
        }
    }
}

/// Validates a data graph against the shapes in another graph.
pub trait ShapeValidator {
    fn validate(&self, data: &Graph, shapes: &Graph) -> Result<Conformance, Error>;
}

/// [`ShapeValidator`] backed by the SHACL Core implementation of `ontolab-shacl`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaclEngine {
    options: ValidationOptions,
}

impl ShaclEngine {
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> ValidationOptions {
        self.options
    }

    /// Validates and keeps the full structured report.
    pub fn report(&self, data: &Graph, shapes: &Graph) -> Result<ValidationReport, Error> {
        let shapes = ShapesGraph::from_graph(shapes).map_err(ShaclError::from)?;
        let report = ShaclValidator::new(shapes)
            .with_options(self.options)
            .validate(data)?;
        info!(
            conforms = report.conforms(),
            results = report.results().len(),
            "SHACL validation finished"
        );
        Ok(report)
    }
}

impl ShapeValidator for ShaclEngine {
    fn validate(&self, data: &Graph, shapes: &Graph) -> Result<Conformance, Error> {
        Ok(Conformance::from(&self.report(data, shapes)?))
    }
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use ontolab_reason::ReasoningProfile;
    use oxrdf::vocab::{rdf, rdfs};
    use oxrdf::{NamedNode, TripleRef};

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    #[test]
    fn trait_closure_leaves_input_untouched() -> Result<(), Error> {
        let mut graph = Graph::new();
        graph.insert(TripleRef::new(&ex("Apple"), rdfs::SUB_CLASS_OF, &ex("Fruit")));
        graph.insert(TripleRef::new(&ex("gala"), rdf::TYPE, &ex("Apple")));
        let reasoner: &dyn Reasoner = &ClosureReasoner::new(ReasoningProfile::Rdfs);
        let closure = reasoner.closure(&graph)?;
        assert_eq!(graph.len(), 2);
        assert!(closure.contains(TripleRef::new(&ex("gala"), rdf::TYPE, &ex("Fruit"))));
        Ok(())
    }

    #[test]
    fn empty_shapes_conform() -> Result<(), Error> {
        let conformance = ShaclEngine::default().validate(&Graph::new(), &Graph::new())?;
        assert!(conformance.conforms);
        assert!(conformance.violations.is_empty());
        assert_eq!(conformance.text, "Validation Report\nConforms: True\n");
        Ok(())
    }
}
