//! SHACL validation reports.

use crate::constraint::ConstraintComponent;
use crate::model::ShapeId;
use crate::path::PropertyPath;
use crate::vocab as sh;
use oxrdf::vocab::rdf;
use oxrdf::{BlankNode, Graph, Literal, NamedNodeRef, Term, Triple};
use std::fmt;

/// Severity level of a validation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Violation,
    Warning,
    Info,
}

impl Severity {
    pub fn iri(self) -> NamedNodeRef<'static> {
        match self {
            Self::Violation => sh::VIOLATION,
            Self::Warning => sh::WARNING,
            Self::Info => sh::INFO,
        }
    }

    pub fn from_iri(iri: NamedNodeRef<'_>) -> Option<Self> {
        match iri {
            sh::VIOLATION => Some(Self::Violation),
            sh::WARNING => Some(Self::Warning),
            sh::INFO => Some(Self::Info),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Violation => "Violation",
            Self::Warning => "Warning",
            Self::Info => "Info",
        })
    }
}

/// A single validation result.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// The focus node that was validated.
    pub focus_node: Term,
    /// The path of the property shape the result comes from.
    pub path: Option<PropertyPath>,
    /// The value node that caused the result, absent for cardinality results.
    pub value: Option<Term>,
    pub source_shape: ShapeId,
    pub component: ConstraintComponent,
    pub message: String,
    pub severity: Severity,
}

impl ValidationResult {
    /// The source shape as printed in the text report.
    ///
    /// Anonymous property shapes are shown through their path since blank node ids are meaningless.
    pub fn source_shape_label(&self) -> String {
        match (&self.source_shape, &self.path) {
            (ShapeId::Blank(_), Some(path)) => format!("[ sh:path {path} ]"),
            (shape, _) => shape.to_string(),
        }
    }
}

/// Outcome of validating a data graph against a shapes graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub(crate) fn new(results: Vec<ValidationResult>) -> Self {
        Self { results }
    }

    /// True iff validation produced no result, whatever its severity.
    pub fn conforms(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    /// Number of results with [`Severity::Violation`].
    pub fn violation_count(&self) -> usize {
        self.count(Severity::Violation)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity == severity)
            .count()
    }

    /// Serializes the report with the SHACL validation report vocabulary.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        let report = BlankNode::default();
        graph.insert(&Triple::new(report.clone(), rdf::TYPE, sh::VALIDATION_REPORT));
        graph.insert(&Triple::new(
            report.clone(),
            sh::CONFORMS,
            Literal::from(self.conforms()),
        ));
        for result in &self.results {
            let node = BlankNode::default();
            graph.insert(&Triple::new(report.clone(), sh::RESULT, node.clone()));
            graph.insert(&Triple::new(node.clone(), rdf::TYPE, sh::VALIDATION_RESULT));
            graph.insert(&Triple::new(
                node.clone(),
                sh::FOCUS_NODE,
                result.focus_node.clone(),
            ));
            if let Some(path) = &result.path {
                let path = write_path(&mut graph, path);
                graph.insert(&Triple::new(node.clone(), sh::RESULT_PATH, path));
            }
            if let Some(value) = &result.value {
                graph.insert(&Triple::new(node.clone(), sh::VALUE, value.clone()));
            }
            graph.insert(&Triple::new(
                node.clone(),
                sh::SOURCE_SHAPE,
                result.source_shape.to_term(),
            ));
            graph.insert(&Triple::new(
                node.clone(),
                sh::SOURCE_CONSTRAINT_COMPONENT,
                result.component.iri(),
            ));
            graph.insert(&Triple::new(
                node.clone(),
                sh::RESULT_MESSAGE,
                Literal::new_simple_literal(&result.message),
            ));
            graph.insert(&Triple::new(node, sh::RESULT_SEVERITY, result.severity.iri()));
        }
        graph
    }
}

/// Writes the path expression as SHACL path triples and returns its root node.
fn write_path(graph: &mut Graph, path: &PropertyPath) -> Term {
    fn wrap(predicate: NamedNodeRef<'_>, inner: &PropertyPath, graph: &mut Graph) -> Term {
        let node = BlankNode::default();
        let inner = write_path(graph, inner);
        graph.insert(&Triple::new(node.clone(), predicate, inner));
        node.into()
    }

    match path {
        PropertyPath::Predicate(p) => p.clone().into(),
        PropertyPath::Inverse(inner) => wrap(sh::INVERSE_PATH, inner, graph),
        PropertyPath::ZeroOrMore(inner) => wrap(sh::ZERO_OR_MORE_PATH, inner, graph),
        PropertyPath::OneOrMore(inner) => wrap(sh::ONE_OR_MORE_PATH, inner, graph),
        PropertyPath::ZeroOrOne(inner) => wrap(sh::ZERO_OR_ONE_PATH, inner, graph),
        PropertyPath::Sequence(members) => write_list(graph, members),
        PropertyPath::Alternative(members) => {
            let node = BlankNode::default();
            let list = write_list(graph, members);
            graph.insert(&Triple::new(node.clone(), sh::ALTERNATIVE_PATH, list));
            node.into()
        }
    }
}

fn write_list(graph: &mut Graph, members: &[PropertyPath]) -> Term {
    let mut rest = Term::from(rdf::NIL.into_owned());
    for member in members.iter().rev() {
        let cell = BlankNode::default();
        let first = write_path(graph, member);
        graph.insert(&Triple::new(cell.clone(), rdf::FIRST, first));
        graph.insert(&Triple::new(cell.clone(), rdf::REST, rest));
        rest = cell.into();
    }
    rest
}

impl fmt::Display for ValidationReport {
    /// Renders the report in the layout of the common Python SHACL tooling.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Report")?;
        writeln!(
            f,
            "Conforms: {}",
            if self.conforms() { "True" } else { "False" }
        )?;
        if self.conforms() {
            return Ok(());
        }
        writeln!(f, "Results ({}):", self.results.len())?;
        for result in &self.results {
            writeln!(
                f,
                "Constraint Violation in {} ({}):",
                result.component.local_name(),
                result.component.iri().as_str()
            )?;
            writeln!(f, "\tSeverity: sh:{}", result.severity)?;
            writeln!(f, "\tSource Shape: {}", result.source_shape_label())?;
            writeln!(f, "\tFocus Node: {}", result.focus_node)?;
            if let Some(value) = &result.value {
                writeln!(f, "\tValue Node: {value}")?;
            }
            if let Some(path) = &result.path {
                writeln!(f, "\tResult Path: {path}")?;
            }
            writeln!(f, "\tMessage: {}", result.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::NamedNode;

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    fn min_count_result(severity: Severity) -> ValidationResult {
        ValidationResult {
            focus_node: ex("bob").into(),
            path: Some(PropertyPath::Predicate(ex("name"))),
            value: None,
            source_shape: ShapeId::Blank(BlankNode::new_unchecked("s1")),
            component: ConstraintComponent::MinCount,
            message: "Less than 1 values".into(),
            severity,
        }
    }

    #[test]
    fn empty_report_conforms() {
        let report = ValidationReport::default();
        assert!(report.conforms());
        assert_eq!(report.to_string(), "Validation Report\nConforms: True\n");
    }

    #[test]
    fn warnings_break_conformance() {
        let report = ValidationReport::new(vec![min_count_result(Severity::Warning)]);
        assert!(!report.conforms());
        assert_eq!(report.violation_count(), 0);
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn text_layout() {
        let report = ValidationReport::new(vec![min_count_result(Severity::Violation)]);
        assert_eq!(
            report.to_string(),
            "Validation Report\n\
             Conforms: False\n\
             Results (1):\n\
             Constraint Violation in MinCountConstraintComponent (http://www.w3.org/ns/shacl#MinCountConstraintComponent):\n\
             \tSeverity: sh:Violation\n\
             \tSource Shape: [ sh:path <http://example.org/name> ]\n\
             \tFocus Node: <http://example.org/bob>\n\
             \tResult Path: <http://example.org/name>\n\
             \tMessage: Less than 1 values\n"
        );
    }

    #[test]
    fn report_graph() {
        let mut result = min_count_result(Severity::Violation);
        result.path = Some(PropertyPath::Inverse(Box::new(PropertyPath::Predicate(ex(
            "knows",
        )))));
        let graph = ValidationReport::new(vec![result]).to_graph();
        assert_eq!(
            graph
                .triples_for_predicate(sh::CONFORMS)
                .map(|t| t.object.into_owned())
                .collect::<Vec<_>>(),
            vec![Term::from(Literal::from(false))]
        );
        assert_eq!(graph.triples_for_predicate(sh::INVERSE_PATH).count(), 1);
        assert_eq!(graph.triples_for_predicate(sh::RESULT_SEVERITY).count(), 1);
    }
}
