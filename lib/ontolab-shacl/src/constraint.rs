//! SHACL Core constraint components.

use crate::error::ShaclParseError;
use crate::model::ShapeId;
use crate::vocab as sh;
use oxrdf::{Literal, NamedNode, NamedNodeRef, Term, TermRef};
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Kinds of RDF terms accepted by `sh:nodeKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Iri,
    BlankNode,
    Literal,
    BlankNodeOrIri,
    BlankNodeOrLiteral,
    IriOrLiteral,
}

impl NodeKind {
    pub fn from_iri(iri: NamedNodeRef<'_>) -> Option<Self> {
        Some(match iri {
            sh::IRI => Self::Iri,
            sh::BLANK_NODE => Self::BlankNode,
            sh::LITERAL => Self::Literal,
            sh::BLANK_NODE_OR_IRI => Self::BlankNodeOrIri,
            sh::BLANK_NODE_OR_LITERAL => Self::BlankNodeOrLiteral,
            sh::IRI_OR_LITERAL => Self::IriOrLiteral,
            _ => return None,
        })
    }

    pub fn iri(self) -> NamedNodeRef<'static> {
        match self {
            Self::Iri => sh::IRI,
            Self::BlankNode => sh::BLANK_NODE,
            Self::Literal => sh::LITERAL,
            Self::BlankNodeOrIri => sh::BLANK_NODE_OR_IRI,
            Self::BlankNodeOrLiteral => sh::BLANK_NODE_OR_LITERAL,
            Self::IriOrLiteral => sh::IRI_OR_LITERAL,
        }
    }

    pub fn matches(self, term: TermRef<'_>) -> bool {
        let (iri, blank, literal) = (
            term.is_named_node(),
            term.is_blank_node(),
            term.is_literal(),
        );
        match self {
            Self::Iri => iri,
            Self::BlankNode => blank,
            Self::Literal => literal,
            Self::BlankNodeOrIri => blank || iri,
            Self::BlankNodeOrLiteral => blank || literal,
            Self::IriOrLiteral => iri || literal,
        }
    }
}

/// A compiled `sh:pattern` with its optional `sh:flags`.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    flags: Option<String>,
    regex: Regex,
}

impl Pattern {
    /// Compiles the pattern, honoring the `i`, `m`, `s` and `x` flags.
    pub fn new(source: &str, flags: Option<&str>) -> Result<Self, ShaclParseError> {
        let mut builder = RegexBuilder::new(source);
        for flag in flags.unwrap_or_default().chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                _ => {
                    return Err(ShaclParseError::InvalidRegex {
                        pattern: source.to_owned(),
                        message: format!("unsupported flag '{flag}'"),
                    });
                }
            };
        }
        let regex = builder.build().map_err(|e| ShaclParseError::InvalidRegex {
            pattern: source.to_owned(),
            message: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_owned(),
            flags: flags.map(ToOwned::to_owned),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> Option<&str> {
        self.flags.as_deref()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

/// A SHACL Core constraint attached to a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// sh:class: every value is an instance of the class or of one of its subclasses.
    Class(NamedNode),
    /// sh:datatype
    Datatype(NamedNode),
    /// sh:nodeKind
    NodeKind(NodeKind),
    /// sh:minCount
    MinCount(usize),
    /// sh:maxCount
    MaxCount(usize),
    MinExclusive(Literal),
    MinInclusive(Literal),
    MaxExclusive(Literal),
    MaxInclusive(Literal),
    MinLength(usize),
    MaxLength(usize),
    Pattern(Pattern),
    /// sh:in: every value is one of the listed terms.
    In(Vec<Term>),
    /// sh:hasValue: at least one value equals the term.
    HasValue(Term),
    /// sh:node: every value conforms to the shape.
    Node(ShapeId),
    /// sh:not: no value conforms to the shape.
    Not(ShapeId),
}

impl Constraint {
    pub fn component(&self) -> ConstraintComponent {
        match self {
            Self::Class(_) => ConstraintComponent::Class,
            Self::Datatype(_) => ConstraintComponent::Datatype,
            Self::NodeKind(_) => ConstraintComponent::NodeKind,
            Self::MinCount(_) => ConstraintComponent::MinCount,
            Self::MaxCount(_) => ConstraintComponent::MaxCount,
            Self::MinExclusive(_) => ConstraintComponent::MinExclusive,
            Self::MinInclusive(_) => ConstraintComponent::MinInclusive,
            Self::MaxExclusive(_) => ConstraintComponent::MaxExclusive,
            Self::MaxInclusive(_) => ConstraintComponent::MaxInclusive,
            Self::MinLength(_) => ConstraintComponent::MinLength,
            Self::MaxLength(_) => ConstraintComponent::MaxLength,
            Self::Pattern(_) => ConstraintComponent::Pattern,
            Self::In(_) => ConstraintComponent::In,
            Self::HasValue(_) => ConstraintComponent::HasValue,
            Self::Node(_) => ConstraintComponent::Node,
            Self::Not(_) => ConstraintComponent::Not,
        }
    }
}

/// The SHACL constraint component a result originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintComponent {
    Class,
    Datatype,
    NodeKind,
    MinCount,
    MaxCount,
    MinExclusive,
    MinInclusive,
    MaxExclusive,
    MaxInclusive,
    MinLength,
    MaxLength,
    Pattern,
    In,
    HasValue,
    Node,
    Not,
}

impl ConstraintComponent {
    pub fn iri(self) -> NamedNodeRef<'static> {
        match self {
            Self::Class => sh::CLASS_CONSTRAINT_COMPONENT,
            Self::Datatype => sh::DATATYPE_CONSTRAINT_COMPONENT,
            Self::NodeKind => sh::NODE_KIND_CONSTRAINT_COMPONENT,
            Self::MinCount => sh::MIN_COUNT_CONSTRAINT_COMPONENT,
            Self::MaxCount => sh::MAX_COUNT_CONSTRAINT_COMPONENT,
            Self::MinExclusive => sh::MIN_EXCLUSIVE_CONSTRAINT_COMPONENT,
            Self::MinInclusive => sh::MIN_INCLUSIVE_CONSTRAINT_COMPONENT,
            Self::MaxExclusive => sh::MAX_EXCLUSIVE_CONSTRAINT_COMPONENT,
            Self::MaxInclusive => sh::MAX_INCLUSIVE_CONSTRAINT_COMPONENT,
            Self::MinLength => sh::MIN_LENGTH_CONSTRAINT_COMPONENT,
            Self::MaxLength => sh::MAX_LENGTH_CONSTRAINT_COMPONENT,
            Self::Pattern => sh::PATTERN_CONSTRAINT_COMPONENT,
            Self::In => sh::IN_CONSTRAINT_COMPONENT,
            Self::HasValue => sh::HAS_VALUE_CONSTRAINT_COMPONENT,
            Self::Node => sh::NODE_CONSTRAINT_COMPONENT,
            Self::Not => sh::NOT_CONSTRAINT_COMPONENT,
        }
    }

    /// The local name, e.g. `MinCountConstraintComponent`.
    pub fn local_name(self) -> &'static str {
        let iri = self.iri().as_str();
        iri.strip_prefix(sh::NAMESPACE).unwrap_or(iri)
    }
}

impl fmt::Display for ConstraintComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sh:{}", self.local_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::BlankNode;

    #[test]
    fn node_kinds() {
        let iri = NamedNode::new_unchecked("http://example.org/a");
        let blank = BlankNode::default();
        let literal = Literal::new_simple_literal("a");
        assert!(NodeKind::Iri.matches(iri.as_ref().into()));
        assert!(!NodeKind::Iri.matches(literal.as_ref().into()));
        assert!(NodeKind::BlankNodeOrIri.matches(blank.as_ref().into()));
        assert!(NodeKind::IriOrLiteral.matches(literal.as_ref().into()));
        assert!(!NodeKind::BlankNodeOrLiteral.matches(iri.as_ref().into()));
        assert_eq!(NodeKind::from_iri(sh::LITERAL), Some(NodeKind::Literal));
    }

    #[test]
    fn pattern_flags() -> Result<(), ShaclParseError> {
        let pattern = Pattern::new("^alice$", Some("i"))?;
        assert!(pattern.is_match("Alice"));
        assert!(!Pattern::new("^alice$", None)?.is_match("Alice"));
        assert!(Pattern::new("^a", Some("q")).is_err());
        assert!(Pattern::new("(", None).is_err());
        Ok(())
    }

    #[test]
    fn component_names() {
        assert_eq!(
            ConstraintComponent::MinCount.local_name(),
            "MinCountConstraintComponent"
        );
        assert_eq!(ConstraintComponent::Class.to_string(), "sh:ClassConstraintComponent");
    }
}
