//! SHACL shapes and their parsing from an RDF graph.
//!
//! Node shapes and property shapes share one [`Shape`] type: a property shape is a shape with a
//! path.

use crate::constraint::{Constraint, NodeKind, Pattern};
use crate::error::ShaclParseError;
use crate::graph::{as_node, has_type, instances_of, object, read_list, sorted_objects};
use crate::path::PropertyPath;
use crate::report::Severity;
use crate::vocab as sh;
use oxrdf::vocab::{rdf, rdfs, xsd};
use oxrdf::{
    BlankNode, Graph, Literal, NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef,
    Term, TermRef,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use tracing::debug;

/// Identifier of a shape: its IRI or blank node in the shapes graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeId {
    Named(NamedNode),
    Blank(BlankNode),
}

impl ShapeId {
    pub fn as_node(&self) -> NamedOrBlankNodeRef<'_> {
        match self {
            Self::Named(n) => n.as_ref().into(),
            Self::Blank(b) => b.as_ref().into(),
        }
    }

    pub fn to_term(&self) -> Term {
        match self {
            Self::Named(n) => n.clone().into(),
            Self::Blank(b) => b.clone().into(),
        }
    }
}

impl From<NamedOrBlankNodeRef<'_>> for ShapeId {
    fn from(node: NamedOrBlankNodeRef<'_>) -> Self {
        match node.into_owned() {
            NamedOrBlankNode::NamedNode(n) => Self::Named(n),
            NamedOrBlankNode::BlankNode(b) => Self::Blank(b),
        }
    }
}

impl From<NamedNode> for ShapeId {
    fn from(node: NamedNode) -> Self {
        Self::Named(node)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::Blank(b) => write!(f, "{b}"),
        }
    }
}

/// A target declaration selecting focus nodes in the data graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// `sh:targetClass`: instances of the class and of its subclasses.
    Class(NamedNode),
    /// `sh:targetNode`
    Node(Term),
    /// `sh:targetSubjectsOf`
    SubjectsOf(NamedNode),
    /// `sh:targetObjectsOf`
    ObjectsOf(NamedNode),
    /// The shape is itself a class, so its instances are targeted.
    Implicit(NamedNode),
}

impl Target {
    pub fn focus_nodes(&self, data: &Graph) -> Vec<Term> {
        match self {
            Self::Class(class) | Self::Implicit(class) => instances_of(data, class.as_ref()),
            Self::Node(node) => vec![node.clone()],
            Self::SubjectsOf(predicate) => data
                .triples_for_predicate(predicate)
                .map(|t| t.subject.into_owned().into())
                .collect(),
            Self::ObjectsOf(predicate) => data
                .triples_for_predicate(predicate)
                .map(|t| t.object.into_owned())
                .collect(),
        }
    }
}

/// A node shape, or a property shape when it has a path.
#[derive(Debug, Clone)]
pub struct Shape {
    id: ShapeId,
    path: Option<PropertyPath>,
    targets: Vec<Target>,
    constraints: Vec<Constraint>,
    property_shapes: Vec<ShapeId>,
    severity: Severity,
    deactivated: bool,
    name: Option<String>,
    message: Option<String>,
}

impl Shape {
    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    /// The value node path, `None` for node shapes.
    pub fn path(&self) -> Option<&PropertyPath> {
        self.path.as_ref()
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Shapes linked with `sh:property`.
    pub fn property_shapes(&self) -> &[ShapeId] {
        &self.property_shapes
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_deactivated(&self) -> bool {
        self.deactivated
    }

    /// `sh:name`
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// `sh:message`, used instead of the generated messages.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Focus nodes selected by all targets, without duplicates.
    pub fn focus_nodes(&self, data: &Graph) -> Vec<Term> {
        let mut seen = FxHashSet::default();
        let mut nodes = Vec::new();
        for target in &self.targets {
            for node in target.focus_nodes(data) {
                if seen.insert(node.clone()) {
                    nodes.push(node);
                }
            }
        }
        nodes
    }
}

/// All the shapes of a shapes graph.
#[derive(Debug, Clone, Default)]
pub struct ShapesGraph {
    shapes: FxHashMap<ShapeId, Shape>,
    order: Vec<ShapeId>,
}

impl ShapesGraph {
    /// Parses every shape of the graph.
    ///
    /// Shapes are the instances of `sh:NodeShape` and `sh:PropertyShape`, the subjects of target
    /// declarations, and the shapes reachable from them through `sh:property`, `sh:node` and
    /// `sh:not`.
    pub fn from_graph(graph: &Graph) -> Result<Self, ShaclParseError> {
        let mut pending = Vec::new();
        for class in [sh::NODE_SHAPE, sh::PROPERTY_SHAPE] {
            pending.extend(graph.subjects_for_predicate_object(rdf::TYPE, class));
        }
        for predicate in [
            sh::TARGET_CLASS,
            sh::TARGET_NODE,
            sh::TARGET_SUBJECTS_OF,
            sh::TARGET_OBJECTS_OF,
        ] {
            pending.extend(graph.triples_for_predicate(predicate).map(|t| t.subject));
        }
        pending.sort_by_cached_key(ToString::to_string);
        pending.reverse();

        let mut shapes = FxHashMap::default();
        let mut order = Vec::new();
        while let Some(node) = pending.pop() {
            let id = ShapeId::from(node);
            if shapes.contains_key(&id) {
                continue;
            }
            let (shape, referenced) = parse_shape(graph, node)?;
            for reference in referenced.into_iter().rev() {
                pending.push(reference);
            }
            order.push(id.clone());
            shapes.insert(id, shape);
        }
        order.sort_by_cached_key(ToString::to_string);
        debug!(shapes = order.len(), "parsed shapes graph");
        Ok(Self { shapes, order })
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Iterates the shapes in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.order.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn parse_shape<'a>(
    graph: &'a Graph,
    node: NamedOrBlankNodeRef<'a>,
) -> Result<(Shape, Vec<NamedOrBlankNodeRef<'a>>), ShaclParseError> {
    let mut referenced = Vec::new();
    let path = object(graph, node, sh::PATH)
        .map(|path| PropertyPath::parse(graph, path, node))
        .transpose()?;

    let mut targets = Vec::new();
    for class in sorted_objects(graph, node, sh::TARGET_CLASS) {
        targets.push(Target::Class(named(node, sh::TARGET_CLASS, class)?));
    }
    for focus in sorted_objects(graph, node, sh::TARGET_NODE) {
        targets.push(Target::Node(focus.into_owned()));
    }
    for predicate in sorted_objects(graph, node, sh::TARGET_SUBJECTS_OF) {
        targets.push(Target::SubjectsOf(named(node, sh::TARGET_SUBJECTS_OF, predicate)?));
    }
    for predicate in sorted_objects(graph, node, sh::TARGET_OBJECTS_OF) {
        targets.push(Target::ObjectsOf(named(node, sh::TARGET_OBJECTS_OF, predicate)?));
    }
    if let NamedOrBlankNodeRef::NamedNode(class) = node {
        if has_type(graph, node, rdfs::CLASS) {
            targets.push(Target::Implicit(class.into_owned()));
        }
    }

    let mut constraints = Vec::new();
    for class in sorted_objects(graph, node, sh::CLASS) {
        constraints.push(Constraint::Class(named(node, sh::CLASS, class)?));
    }
    for datatype in sorted_objects(graph, node, sh::DATATYPE) {
        constraints.push(Constraint::Datatype(named(node, sh::DATATYPE, datatype)?));
    }
    for kind in sorted_objects(graph, node, sh::NODE_KIND) {
        let kind = named(node, sh::NODE_KIND, kind)?;
        let Some(kind) = NodeKind::from_iri(kind.as_ref()) else {
            return Err(ShaclParseError::invalid_property_value(
                node.into_owned(),
                sh::NODE_KIND,
                "a SHACL node kind",
                kind,
            ));
        };
        constraints.push(Constraint::NodeKind(kind));
    }
    let counts: [(NamedNodeRef<'_>, fn(usize) -> Constraint); 4] = [
        (sh::MIN_COUNT, Constraint::MinCount),
        (sh::MAX_COUNT, Constraint::MaxCount),
        (sh::MIN_LENGTH, Constraint::MinLength),
        (sh::MAX_LENGTH, Constraint::MaxLength),
    ];
    for (parameter, build) in counts {
        for value in sorted_objects(graph, node, parameter) {
            constraints.push(build(non_negative_integer(node, parameter, value)?));
        }
    }
    let ranges: [(NamedNodeRef<'_>, fn(Literal) -> Constraint); 4] = [
        (sh::MIN_EXCLUSIVE, Constraint::MinExclusive),
        (sh::MIN_INCLUSIVE, Constraint::MinInclusive),
        (sh::MAX_EXCLUSIVE, Constraint::MaxExclusive),
        (sh::MAX_INCLUSIVE, Constraint::MaxInclusive),
    ];
    for (parameter, build) in ranges {
        for value in sorted_objects(graph, node, parameter) {
            constraints.push(build(literal(node, parameter, value)?));
        }
    }
    let flags = object(graph, node, sh::FLAGS)
        .map(|flags| literal(node, sh::FLAGS, flags))
        .transpose()?;
    for pattern in sorted_objects(graph, node, sh::PATTERN) {
        let pattern = literal(node, sh::PATTERN, pattern)?;
        constraints.push(Constraint::Pattern(Pattern::new(
            pattern.value(),
            flags.as_ref().map(Literal::value),
        )?));
    }
    for list in sorted_objects(graph, node, sh::IN) {
        let members = read_list(graph, list, node)?;
        constraints.push(Constraint::In(
            members.into_iter().map(TermRef::into_owned).collect(),
        ));
    }
    for value in sorted_objects(graph, node, sh::HAS_VALUE) {
        constraints.push(Constraint::HasValue(value.into_owned()));
    }
    let shape_constraints: [(NamedNodeRef<'_>, fn(ShapeId) -> Constraint); 2] =
        [(sh::NODE, Constraint::Node), (sh::NOT, Constraint::Not)];
    for (parameter, build) in shape_constraints {
        for shape in sorted_objects(graph, node, parameter) {
            let shape = shape_reference(node, parameter, shape)?;
            referenced.push(shape);
            constraints.push(build(shape.into()));
        }
    }

    let mut property_shapes = Vec::new();
    for shape in sorted_objects(graph, node, sh::PROPERTY) {
        let shape = shape_reference(node, sh::PROPERTY, shape)?;
        referenced.push(shape);
        property_shapes.push(shape.into());
    }

    let severity = match object(graph, node, sh::SEVERITY) {
        Some(severity) => {
            let iri = named(node, sh::SEVERITY, severity)?;
            Severity::from_iri(iri.as_ref()).ok_or_else(|| {
                ShaclParseError::invalid_property_value(
                    node.into_owned(),
                    sh::SEVERITY,
                    "sh:Violation, sh:Warning or sh:Info",
                    iri,
                )
            })?
        }
        None => Severity::default(),
    };
    let deactivated = match object(graph, node, sh::DEACTIVATED) {
        Some(value) => {
            let value = literal(node, sh::DEACTIVATED, value)?;
            if value.datatype() != xsd::BOOLEAN {
                return Err(ShaclParseError::invalid_property_value(
                    node.into_owned(),
                    sh::DEACTIVATED,
                    "a boolean",
                    value,
                ));
            }
            matches!(value.value(), "true" | "1")
        }
        None => false,
    };
    let name = object(graph, node, sh::NAME)
        .map(|name| literal(node, sh::NAME, name).map(|l| l.value().to_owned()))
        .transpose()?;
    let message = object(graph, node, sh::MESSAGE)
        .map(|message| literal(node, sh::MESSAGE, message).map(|l| l.value().to_owned()))
        .transpose()?;

    if path.is_none() && has_type(graph, node, sh::PROPERTY_SHAPE) {
        return Err(ShaclParseError::invalid_shape(
            node.into_owned(),
            "a property shape must have exactly one sh:path",
        ));
    }

    Ok((
        Shape {
            id: node.into(),
            path,
            targets,
            constraints,
            property_shapes,
            severity,
            deactivated,
            name,
            message,
        },
        referenced,
    ))
}

fn named(
    shape: NamedOrBlankNodeRef<'_>,
    parameter: NamedNodeRef<'_>,
    value: TermRef<'_>,
) -> Result<NamedNode, ShaclParseError> {
    match value {
        TermRef::NamedNode(node) => Ok(node.into_owned()),
        _ => Err(ShaclParseError::invalid_property_value(
            shape.into_owned(),
            parameter.into_owned(),
            "an IRI",
            value.into_owned(),
        )),
    }
}

fn literal(
    shape: NamedOrBlankNodeRef<'_>,
    parameter: NamedNodeRef<'_>,
    value: TermRef<'_>,
) -> Result<Literal, ShaclParseError> {
    match value {
        TermRef::Literal(literal) => Ok(literal.into_owned()),
        _ => Err(ShaclParseError::invalid_property_value(
            shape.into_owned(),
            parameter.into_owned(),
            "a literal",
            value.into_owned(),
        )),
    }
}

fn non_negative_integer(
    shape: NamedOrBlankNodeRef<'_>,
    parameter: NamedNodeRef<'_>,
    value: TermRef<'_>,
) -> Result<usize, ShaclParseError> {
    if let TermRef::Literal(literal) = value {
        if let Ok(count) = literal.value().parse() {
            return Ok(count);
        }
    }
    Err(ShaclParseError::invalid_property_value(
        shape.into_owned(),
        parameter.into_owned(),
        "a non-negative integer",
        value.into_owned(),
    ))
}

fn shape_reference<'a>(
    shape: NamedOrBlankNodeRef<'_>,
    parameter: NamedNodeRef<'_>,
    value: TermRef<'a>,
) -> Result<NamedOrBlankNodeRef<'a>, ShaclParseError> {
    as_node(value).ok_or_else(|| {
        ShaclParseError::invalid_property_value(
            shape.into_owned(),
            parameter.into_owned(),
            "an IRI or a blank node",
            value.into_owned(),
        )
    })
}
