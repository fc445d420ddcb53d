//! SHACL Core validation.

use crate::constraint::{Constraint, ConstraintComponent};
use crate::error::{ShaclError, ShaclValidationError};
use crate::graph::is_instance_of;
use crate::model::{Shape, ShapeId, ShapesGraph};
use crate::report::{ValidationReport, ValidationResult};
use ontolab_reason::{ClosureReasoner, ReasoningProfile, compare_literals, is_well_formed};
use oxrdf::{Graph, Literal, Term, TermRef};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Maximum nesting of `sh:node`, `sh:not` and `sh:property` during validation.
pub const MAX_RECURSION_DEPTH: usize = 32;

/// Inference applied to a copy of the data graph before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Inference {
    #[default]
    None,
    Rdfs,
    OwlRl,
}

impl Inference {
    fn profile(self) -> Option<ReasoningProfile> {
        match self {
            Self::None => None,
            Self::Rdfs => Some(ReasoningProfile::Rdfs),
            Self::OwlRl => Some(ReasoningProfile::OwlRl),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    pub inference: Inference,
    /// Keeps only the first result in report order.
    pub abort_on_first: bool,
}

/// Validates data graphs against a parsed [`ShapesGraph`].
#[derive(Debug, Clone)]
pub struct ShaclValidator {
    shapes: ShapesGraph,
    options: ValidationOptions,
}

impl ShaclValidator {
    pub fn new(shapes: ShapesGraph) -> Self {
        Self {
            shapes,
            options: ValidationOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn shapes(&self) -> &ShapesGraph {
        &self.shapes
    }

    pub fn options(&self) -> ValidationOptions {
        self.options
    }

    /// Validates `data`, which is left untouched even when inference is enabled.
    pub fn validate(&self, data: &Graph) -> Result<ValidationReport, ShaclError> {
        let expanded;
        let data = match self.options.inference.profile() {
            Some(profile) => {
                expanded = ClosureReasoner::new(profile).closure(data)?;
                &expanded
            }
            None => data,
        };

        let mut results = Vec::new();
        for shape in self.shapes.iter() {
            if shape.is_deactivated() {
                continue;
            }
            let focus_nodes = shape.focus_nodes(data);
            debug!(shape = %shape.id(), focus_nodes = focus_nodes.len(), "validating shape");
            for focus in &focus_nodes {
                self.validate_shape(data, shape, focus, 0, &mut results)?;
            }
        }

        // Blank node ids change from one parse to the next so they are not part of the key
        results.sort_by_cached_key(|r| {
            (
                r.focus_node.to_string(),
                r.path.as_ref().map(ToString::to_string),
                r.component,
                r.value.as_ref().map(ToString::to_string),
                r.message.clone(),
                r.source_shape_label(),
            )
        });
        results.dedup();
        if self.options.abort_on_first {
            results.truncate(1);
        }
        let report = ValidationReport::new(results);
        info!(
            conforms = report.conforms(),
            results = report.results().len(),
            "SHACL validation done"
        );
        Ok(report)
    }

    fn validate_shape(
        &self,
        data: &Graph,
        shape: &Shape,
        focus: &Term,
        depth: usize,
        results: &mut Vec<ValidationResult>,
    ) -> Result<(), ShaclError> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(ShaclValidationError::MaxRecursionDepth { depth }.into());
        }
        if shape.is_deactivated() {
            return Ok(());
        }
        let values = match shape.path() {
            Some(path) => path.evaluate(data, focus.as_ref()),
            None => vec![focus.clone()],
        };
        for constraint in shape.constraints() {
            self.check(data, shape, focus, &values, constraint, depth, results)?;
        }
        for property in shape.property_shapes() {
            if let Some(property) = self.shapes.get(property) {
                self.validate_shape(data, property, focus, depth + 1, results)?;
            }
        }
        Ok(())
    }

    /// Whether `node` produces no result against the shape `id`.
    fn conforms(
        &self,
        data: &Graph,
        node: &Term,
        id: &ShapeId,
        depth: usize,
    ) -> Result<bool, ShaclError> {
        let Some(shape) = self.shapes.get(id) else {
            return Ok(true);
        };
        let mut results = Vec::new();
        self.validate_shape(data, shape, node, depth + 1, &mut results)?;
        Ok(results.is_empty())
    }

    #[expect(clippy::too_many_arguments)]
    fn check(
        &self,
        data: &Graph,
        shape: &Shape,
        focus: &Term,
        values: &[Term],
        constraint: &Constraint,
        depth: usize,
        results: &mut Vec<ValidationResult>,
    ) -> Result<(), ShaclError> {
        let mut report = |value: Option<&Term>, message: String| {
            results.push(ValidationResult {
                focus_node: focus.clone(),
                path: shape.path().cloned(),
                value: value.cloned(),
                source_shape: shape.id().clone(),
                component: constraint.component(),
                message: shape.message().map_or(message, ToOwned::to_owned),
                severity: shape.severity(),
            });
        };
        let on = || match shape.path() {
            Some(path) => format!("{focus}->{path}"),
            None => focus.to_string(),
        };

        match constraint {
            Constraint::Class(class) => {
                for value in values {
                    if !is_instance_of(data, value.as_ref(), class.as_ref()) {
                        report(Some(value), format!("Value does not have class {class}"));
                    }
                }
            }
            Constraint::Datatype(datatype) => {
                for value in values {
                    let matches = match value {
                        Term::Literal(l) => {
                            l.datatype() == datatype.as_ref() && is_well_formed(l.as_ref())
                        }
                        _ => false,
                    };
                    if !matches {
                        report(
                            Some(value),
                            format!("Value is not Literal with datatype {datatype}"),
                        );
                    }
                }
            }
            Constraint::NodeKind(kind) => {
                for value in values {
                    if !kind.matches(value.as_ref()) {
                        report(
                            Some(value),
                            format!("Value is not of Node Kind {}", kind.iri()),
                        );
                    }
                }
            }
            Constraint::MinCount(min) => {
                if values.len() < *min {
                    report(None, format!("Less than {min} values on {}", on()));
                }
            }
            Constraint::MaxCount(max) => {
                if values.len() > *max {
                    report(None, format!("More than {max} values on {}", on()));
                }
            }
            Constraint::MinExclusive(bound) => {
                check_range(values, bound, &[Ordering::Greater], ">", &mut report);
            }
            Constraint::MinInclusive(bound) => {
                check_range(
                    values,
                    bound,
                    &[Ordering::Greater, Ordering::Equal],
                    ">=",
                    &mut report,
                );
            }
            Constraint::MaxExclusive(bound) => {
                check_range(values, bound, &[Ordering::Less], "<", &mut report);
            }
            Constraint::MaxInclusive(bound) => {
                check_range(
                    values,
                    bound,
                    &[Ordering::Less, Ordering::Equal],
                    "<=",
                    &mut report,
                );
            }
            Constraint::MinLength(min) => {
                for value in values {
                    if !lexical_form(value).is_some_and(|s| s.chars().count() >= *min) {
                        report(Some(value), format!("String length not >= {min}"));
                    }
                }
            }
            Constraint::MaxLength(max) => {
                for value in values {
                    if !lexical_form(value).is_some_and(|s| s.chars().count() <= *max) {
                        report(Some(value), format!("String length not <= {max}"));
                    }
                }
            }
            Constraint::Pattern(pattern) => {
                for value in values {
                    if !lexical_form(value).is_some_and(|s| pattern.is_match(s)) {
                        report(
                            Some(value),
                            format!("Value does not match pattern \"{}\"", pattern.as_str()),
                        );
                    }
                }
            }
            Constraint::In(allowed) => {
                for value in values {
                    if !allowed.contains(value) {
                        let list = allowed
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(", ");
                        report(Some(value), format!("Value {value} not in list [{list}]"));
                    }
                }
            }
            Constraint::HasValue(expected) => {
                if !values.contains(expected) {
                    report(None, format!("Missing expected value {expected}"));
                }
            }
            Constraint::Node(id) => {
                for value in values {
                    if !self.conforms(data, value, id, depth)? {
                        report(
                            Some(value),
                            format!("Value does not conform to Shape {id}"),
                        );
                    }
                }
            }
            Constraint::Not(id) => {
                for value in values {
                    if self.conforms(data, value, id, depth)? {
                        report(Some(value), format!("Value conforms to Shape {id}"));
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_range(
    values: &[Term],
    bound: &Literal,
    accepted: &[Ordering],
    operator: &str,
    report: &mut impl FnMut(Option<&Term>, String),
) {
    for value in values {
        let in_range = match value {
            Term::Literal(literal) => compare_literals(literal.as_ref(), bound.as_ref())
                .is_some_and(|ordering| accepted.contains(&ordering)),
            _ => false,
        };
        if !in_range {
            report(Some(value), format!("Value is not {operator} {bound}"));
        }
    }
}

/// The string a length or pattern constraint is checked against; blank nodes have none.
fn lexical_form(term: &Term) -> Option<&str> {
    match term.as_ref() {
        TermRef::NamedNode(node) => Some(node.as_str()),
        TermRef::Literal(literal) => Some(literal.value()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;
    use crate::vocab as sh;
    use oxrdf::vocab::{rdf, xsd};
    use oxrdf::{BlankNode, NamedNode, TripleRef};

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    /// `ex:PersonShape` targets `ex:Person` and requires one `xsd:string` name.
    fn person_shapes() -> Result<ShapesGraph, ShaclError> {
        let mut graph = Graph::new();
        let property = BlankNode::new_unchecked("name");
        let one = Literal::from(1);
        graph.insert(TripleRef::new(&ex("PersonShape"), rdf::TYPE, sh::NODE_SHAPE));
        graph.insert(TripleRef::new(&ex("PersonShape"), sh::TARGET_CLASS, &ex("Person")));
        graph.insert(TripleRef::new(&ex("PersonShape"), sh::PROPERTY, &property));
        graph.insert(TripleRef::new(&property, sh::PATH, &ex("name")));
        graph.insert(TripleRef::new(&property, sh::MIN_COUNT, &one));
        graph.insert(TripleRef::new(&property, sh::MAX_COUNT, &one));
        graph.insert(TripleRef::new(&property, sh::DATATYPE, xsd::STRING));
        Ok(ShapesGraph::from_graph(&graph)?)
    }

    #[test]
    fn empty_shapes_conform() -> Result<(), ShaclError> {
        let report = ShaclValidator::new(ShapesGraph::default()).validate(&Graph::new())?;
        assert!(report.conforms());
        Ok(())
    }

    #[test]
    fn min_count() -> Result<(), ShaclError> {
        let mut data = Graph::new();
        data.insert(TripleRef::new(&ex("alice"), rdf::TYPE, &ex("Person")));
        let report = ShaclValidator::new(person_shapes()?).validate(&data)?;
        assert!(!report.conforms());
        assert_eq!(report.violation_count(), 1);
        let result = &report.results()[0];
        assert_eq!(result.component, ConstraintComponent::MinCount);
        assert_eq!(result.focus_node, Term::from(ex("alice")));
        assert_eq!(result.value, None);
        assert_eq!(result.severity, Severity::Violation);
        assert_eq!(
            result.message,
            "Less than 1 values on <http://example.org/alice>-><http://example.org/name>"
        );
        Ok(())
    }

    #[test]
    fn datatype_and_max_count() -> Result<(), ShaclError> {
        let mut data = Graph::new();
        let name = Literal::new_simple_literal("Bob");
        let age = Literal::from(42);
        data.insert(TripleRef::new(&ex("bob"), rdf::TYPE, &ex("Person")));
        data.insert(TripleRef::new(&ex("bob"), &ex("name"), &name));
        data.insert(TripleRef::new(&ex("bob"), &ex("name"), &age));
        let report = ShaclValidator::new(person_shapes()?).validate(&data)?;
        let components = report
            .results()
            .iter()
            .map(|r| r.component)
            .collect::<Vec<_>>();
        assert_eq!(
            components,
            [ConstraintComponent::Datatype, ConstraintComponent::MaxCount]
        );
        assert_eq!(report.results()[0].value, Some(Term::from(age)));
        Ok(())
    }

    #[test]
    fn ill_formed_literal_fails_datatype() -> Result<(), ShaclError> {
        let mut graph = Graph::new();
        let shape = ex("AgeShape");
        graph.insert(TripleRef::new(&shape, sh::TARGET_NODE, &ex("carol")));
        graph.insert(TripleRef::new(&shape, sh::PATH, &ex("age")));
        graph.insert(TripleRef::new(&shape, sh::DATATYPE, xsd::INTEGER));
        let validator = ShaclValidator::new(ShapesGraph::from_graph(&graph)?);

        let mut data = Graph::new();
        let well_formed = Literal::new_typed_literal("42", xsd::INTEGER);
        data.insert(TripleRef::new(&ex("carol"), &ex("age"), &well_formed));
        assert!(validator.validate(&data)?.conforms());

        let ill_formed = Literal::new_typed_literal("abc", xsd::INTEGER);
        data.insert(TripleRef::new(&ex("carol"), &ex("age"), &ill_formed));
        let report = validator.validate(&data)?;
        assert_eq!(report.results().len(), 1);
        assert_eq!(report.results()[0].component, ConstraintComponent::Datatype);
        assert_eq!(report.results()[0].value, Some(Term::from(ill_formed)));
        Ok(())
    }

    #[test]
    fn decimal_bounds_are_exact() -> Result<(), ShaclError> {
        let mut graph = Graph::new();
        let shape = ex("PriceShape");
        let bound = Literal::new_typed_literal("1000", xsd::DECIMAL);
        graph.insert(TripleRef::new(&shape, sh::TARGET_SUBJECTS_OF, &ex("price")));
        graph.insert(TripleRef::new(&shape, sh::PATH, &ex("price")));
        graph.insert(TripleRef::new(&shape, sh::MAX_EXCLUSIVE, &bound));
        let validator = ShaclValidator::new(ShapesGraph::from_graph(&graph)?);

        let mut data = Graph::new();
        let price = Literal::new_typed_literal("999.99999999999999999", xsd::DECIMAL);
        data.insert(TripleRef::new(&ex("laptop"), &ex("price"), &price));
        assert!(validator.validate(&data)?.conforms());
        Ok(())
    }

    #[test]
    fn abort_on_first() -> Result<(), ShaclError> {
        let mut data = Graph::new();
        data.insert(TripleRef::new(&ex("a"), rdf::TYPE, &ex("Person")));
        data.insert(TripleRef::new(&ex("b"), rdf::TYPE, &ex("Person")));
        let validator = ShaclValidator::new(person_shapes()?);
        assert_eq!(validator.validate(&data)?.results().len(), 2);
        let validator = validator.with_options(ValidationOptions {
            abort_on_first: true,
            ..ValidationOptions::default()
        });
        assert_eq!(validator.validate(&data)?.results().len(), 1);
        Ok(())
    }
}
