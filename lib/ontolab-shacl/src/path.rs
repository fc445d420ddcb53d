//! SHACL property paths.

use crate::error::ShaclParseError;
use crate::graph::{as_node, object, read_list};
use crate::vocab as sh;
use oxrdf::{Graph, NamedNode, NamedOrBlankNodeRef, Term, TermRef};
use rustc_hash::FxHashSet;
use std::fmt;

/// Nesting limit of path expressions, protecting against cyclic path definitions.
const MAX_PATH_DEPTH: usize = 64;

/// A [SHACL property path](https://www.w3.org/TR/shacl/#property-paths).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyPath {
    Predicate(NamedNode),
    Sequence(Vec<PropertyPath>),
    Alternative(Vec<PropertyPath>),
    Inverse(Box<PropertyPath>),
    ZeroOrMore(Box<PropertyPath>),
    OneOrMore(Box<PropertyPath>),
    ZeroOrOne(Box<PropertyPath>),
}

impl PropertyPath {
    /// Parses the path expression rooted at `term`.
    ///
    /// `shape` is only used in error messages.
    pub fn parse(
        graph: &Graph,
        term: TermRef<'_>,
        shape: NamedOrBlankNodeRef<'_>,
    ) -> Result<Self, ShaclParseError> {
        Self::parse_at_depth(graph, term, shape, 0)
    }

    fn parse_at_depth(
        graph: &Graph,
        term: TermRef<'_>,
        shape: NamedOrBlankNodeRef<'_>,
        depth: usize,
    ) -> Result<Self, ShaclParseError> {
        if depth > MAX_PATH_DEPTH {
            return Err(ShaclParseError::invalid_property_path(
                shape.into_owned(),
                "the path expression is nested too deeply",
            ));
        }
        let node = match term {
            TermRef::NamedNode(predicate) => return Ok(Self::Predicate(predicate.into_owned())),
            TermRef::BlankNode(node) => NamedOrBlankNodeRef::from(node),
            _ => {
                return Err(ShaclParseError::invalid_property_path(
                    shape.into_owned(),
                    format!("{term} is not an IRI or a blank node"),
                ));
            }
        };
        let parse_inner = |inner| Self::parse_at_depth(graph, inner, shape, depth + 1);

        if let Some(list) = object(graph, node, sh::ALTERNATIVE_PATH) {
            return Ok(Self::Alternative(
                read_list(graph, list, shape)?
                    .into_iter()
                    .map(parse_inner)
                    .collect::<Result<_, _>>()?,
            ));
        }
        if let Some(inner) = object(graph, node, sh::INVERSE_PATH) {
            return Ok(Self::Inverse(Box::new(parse_inner(inner)?)));
        }
        if let Some(inner) = object(graph, node, sh::ZERO_OR_MORE_PATH) {
            return Ok(Self::ZeroOrMore(Box::new(parse_inner(inner)?)));
        }
        if let Some(inner) = object(graph, node, sh::ONE_OR_MORE_PATH) {
            return Ok(Self::OneOrMore(Box::new(parse_inner(inner)?)));
        }
        if let Some(inner) = object(graph, node, sh::ZERO_OR_ONE_PATH) {
            return Ok(Self::ZeroOrOne(Box::new(parse_inner(inner)?)));
        }
        if object(graph, node, oxrdf::vocab::rdf::FIRST).is_some() {
            let members = read_list(graph, term, shape)?;
            if members.len() < 2 {
                return Err(ShaclParseError::invalid_property_path(
                    shape.into_owned(),
                    "a sequence path needs at least two members",
                ));
            }
            return Ok(Self::Sequence(
                members
                    .into_iter()
                    .map(parse_inner)
                    .collect::<Result<_, _>>()?,
            ));
        }
        Err(ShaclParseError::invalid_property_path(
            shape.into_owned(),
            format!("{node} is not a path expression"),
        ))
    }

    /// Returns the value nodes reached from `focus`, without duplicates, in discovery order.
    pub fn evaluate(&self, graph: &Graph, focus: TermRef<'_>) -> Vec<Term> {
        let mut values = Vec::new();
        let mut seen = FxHashSet::default();
        for value in self.step(graph, focus.into_owned(), Direction::Forward) {
            if seen.insert(value.clone()) {
                values.push(value);
            }
        }
        values
    }

    /// Returns the predicate if this is a simple predicate path.
    pub fn as_predicate(&self) -> Option<&NamedNode> {
        if let Self::Predicate(predicate) = self {
            Some(predicate)
        } else {
            None
        }
    }

    fn step(&self, graph: &Graph, node: Term, direction: Direction) -> Vec<Term> {
        match self {
            Self::Predicate(predicate) => match direction {
                Direction::Forward => match as_node(node.as_ref()) {
                    Some(subject) => graph
                        .objects_for_subject_predicate(subject, predicate)
                        .map(TermRef::into_owned)
                        .collect(),
                    None => Vec::new(),
                },
                Direction::Backward => graph
                    .subjects_for_predicate_object(predicate, &node)
                    .map(|s| s.into_owned().into())
                    .collect(),
            },
            Self::Inverse(inner) => inner.step(graph, node, direction.reverse()),
            Self::Sequence(members) => {
                let mut current = vec![node];
                let ordered: Box<dyn Iterator<Item = &Self>> = match direction {
                    Direction::Forward => Box::new(members.iter()),
                    Direction::Backward => Box::new(members.iter().rev()),
                };
                for member in ordered {
                    let mut next = Vec::new();
                    let mut seen = FxHashSet::default();
                    for node in current {
                        for value in member.step(graph, node, direction) {
                            if seen.insert(value.clone()) {
                                next.push(value);
                            }
                        }
                    }
                    current = next;
                }
                current
            }
            Self::Alternative(members) => members
                .iter()
                .flat_map(|member| member.step(graph, node.clone(), direction))
                .collect(),
            Self::ZeroOrOne(inner) => {
                let mut values = inner.step(graph, node.clone(), direction);
                values.insert(0, node);
                values
            }
            Self::ZeroOrMore(inner) => inner.transitive(graph, node, direction, true),
            Self::OneOrMore(inner) => inner.transitive(graph, node, direction, false),
        }
    }

    /// Breadth-first closure of repeated steps.
    fn transitive(
        &self,
        graph: &Graph,
        start: Term,
        direction: Direction,
        include_start: bool,
    ) -> Vec<Term> {
        let mut reached = Vec::new();
        let mut seen = FxHashSet::default();
        if include_start {
            seen.insert(start.clone());
            reached.push(start.clone());
        }
        let mut frontier = vec![start];
        while let Some(node) = frontier.pop() {
            for value in self.step(graph, node, direction) {
                if seen.insert(value.clone()) {
                    reached.push(value.clone());
                    frontier.push(value);
                }
            }
        }
        reached
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn reverse(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, paths: &[PropertyPath], sep: &str) -> fmt::Result {
            f.write_str("(")?;
            for (i, path) in paths.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                write!(f, "{path}")?;
            }
            f.write_str(")")
        }

        match self {
            Self::Predicate(p) => write!(f, "{p}"),
            Self::Sequence(paths) => join(f, paths, " / "),
            Self::Alternative(paths) => join(f, paths, " | "),
            Self::Inverse(p) => write!(f, "^{p}"),
            Self::ZeroOrMore(p) => write!(f, "{p}*"),
            Self::OneOrMore(p) => write!(f, "{p}+"),
            Self::ZeroOrOne(p) => write!(f, "{p}?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, TripleRef};

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    /// a -knows-> b -knows-> c, d -likes-> a
    fn social() -> Graph {
        let mut graph = Graph::new();
        graph.insert(TripleRef::new(&ex("a"), &ex("knows"), &ex("b")));
        graph.insert(TripleRef::new(&ex("b"), &ex("knows"), &ex("c")));
        graph.insert(TripleRef::new(&ex("d"), &ex("likes"), &ex("a")));
        graph
    }

    fn terms(names: &[&str]) -> Vec<Term> {
        names.iter().map(|n| ex(n).into()).collect()
    }

    #[test]
    fn predicate_and_inverse() {
        let graph = social();
        let knows = PropertyPath::Predicate(ex("knows"));
        assert_eq!(knows.evaluate(&graph, ex("a").as_ref().into()), terms(&["b"]));
        let known_by = PropertyPath::Inverse(Box::new(knows));
        assert_eq!(known_by.evaluate(&graph, ex("b").as_ref().into()), terms(&["a"]));
    }

    #[test]
    fn closures() {
        let graph = social();
        let knows = PropertyPath::Predicate(ex("knows"));
        let star = PropertyPath::ZeroOrMore(Box::new(knows.clone()));
        assert_eq!(
            star.evaluate(&graph, ex("a").as_ref().into()),
            terms(&["a", "b", "c"])
        );
        let plus = PropertyPath::OneOrMore(Box::new(knows.clone()));
        assert_eq!(plus.evaluate(&graph, ex("a").as_ref().into()), terms(&["b", "c"]));
        let optional = PropertyPath::ZeroOrOne(Box::new(knows));
        assert_eq!(
            optional.evaluate(&graph, ex("b").as_ref().into()),
            terms(&["b", "c"])
        );
    }

    #[test]
    fn inverse_of_sequence() {
        let graph = social();
        let path = PropertyPath::Inverse(Box::new(PropertyPath::Sequence(vec![
            PropertyPath::Predicate(ex("likes")),
            PropertyPath::Predicate(ex("knows")),
        ])));
        assert_eq!(path.evaluate(&graph, ex("b").as_ref().into()), terms(&["d"]));
    }

    #[test]
    fn parse_alternative() -> Result<(), ShaclParseError> {
        let mut graph = Graph::new();
        let path = BlankNode::new_unchecked("path");
        let l1 = BlankNode::new_unchecked("l1");
        let l2 = BlankNode::new_unchecked("l2");
        graph.insert(TripleRef::new(&path, sh::ALTERNATIVE_PATH, &l1));
        graph.insert(TripleRef::new(&l1, oxrdf::vocab::rdf::FIRST, &ex("knows")));
        graph.insert(TripleRef::new(&l1, oxrdf::vocab::rdf::REST, &l2));
        graph.insert(TripleRef::new(&l2, oxrdf::vocab::rdf::FIRST, &ex("likes")));
        graph.insert(TripleRef::new(
            &l2,
            oxrdf::vocab::rdf::REST,
            oxrdf::vocab::rdf::NIL,
        ));
        let shape = ex("Shape");
        let parsed = PropertyPath::parse(&graph, path.as_ref().into(), shape.as_ref().into())?;
        assert_eq!(
            parsed,
            PropertyPath::Alternative(vec![
                PropertyPath::Predicate(ex("knows")),
                PropertyPath::Predicate(ex("likes")),
            ])
        );
        assert_eq!(
            parsed.to_string(),
            "(<http://example.org/knows> | <http://example.org/likes>)"
        );
        Ok(())
    }

    #[test]
    fn literal_is_not_a_path() {
        let graph = Graph::new();
        let shape = ex("Shape");
        let literal = oxrdf::Literal::new_simple_literal("name");
        assert!(
            PropertyPath::parse(&graph, literal.as_ref().into(), shape.as_ref().into()).is_err()
        );
    }
}
