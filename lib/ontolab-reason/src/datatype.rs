//! Datatype restrictions (`owl:onDatatype` + `owl:withRestrictions`) and literal ordering.

use crate::graph::{as_named_node, as_node, read_list};
use crate::vocab::{facet, owl};
use oxrdf::vocab::{rdfs, xsd};
use oxrdf::{Graph, Literal, LiteralRef, NamedNode, NamedNodeRef, TermRef};
use oxsdatatypes::{
    Boolean, Date, DateTime, Decimal, Double, Duration, Float, GYear, GYearMonth, Integer, Time,
};
use std::cmp::Ordering;

/// A constraining facet of a datatype restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    MinInclusive,
    MinExclusive,
    MaxInclusive,
    MaxExclusive,
}

impl Facet {
    pub fn from_iri(iri: NamedNodeRef<'_>) -> Option<Self> {
        match iri {
            facet::MIN_INCLUSIVE => Some(Self::MinInclusive),
            facet::MIN_EXCLUSIVE => Some(Self::MinExclusive),
            facet::MAX_INCLUSIVE => Some(Self::MaxInclusive),
            facet::MAX_EXCLUSIVE => Some(Self::MaxExclusive),
            _ => None,
        }
    }

    /// Checks `value` against the facet bound.
    ///
    /// Incomparable values never satisfy a facet.
    pub fn accepts(self, value: LiteralRef<'_>, bound: LiteralRef<'_>) -> bool {
        let Some(ordering) = compare_literals(value, bound) else {
            return false;
        };
        match self {
            Self::MinInclusive => ordering != Ordering::Less,
            Self::MinExclusive => ordering == Ordering::Greater,
            Self::MaxInclusive => ordering != Ordering::Greater,
            Self::MaxExclusive => ordering == Ordering::Less,
        }
    }
}

/// A data range usable as the filler of `owl:someValuesFrom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRange {
    /// `None` means any literal (`rdfs:Literal`).
    datatype: Option<NamedNode>,
    facets: Vec<(Facet, Literal)>,
}

impl DataRange {
    /// Reads the data range described by `node`.
    ///
    /// Named XSD datatypes and `rdfs:Literal` are data ranges on their own.
    /// Other nodes are data ranges only if they carry `owl:onDatatype`.
    /// Unknown facets make the whole restriction unusable and `None` is returned.
    pub fn from_graph(graph: &Graph, node: TermRef<'_>) -> Option<Self> {
        if let Some(iri) = as_named_node(node) {
            if iri == rdfs::LITERAL {
                return Some(Self {
                    datatype: None,
                    facets: Vec::new(),
                });
            }
            if iri.as_str().starts_with(XSD_NAMESPACE) {
                return Some(Self {
                    datatype: Some(iri.into_owned()),
                    facets: Vec::new(),
                });
            }
        }
        let subject = as_node(node)?;
        let base = graph.object_for_subject_predicate(subject, owl::ON_DATATYPE)?;
        let mut range = Self::from_graph(graph, base)?;
        if let Some(list) = graph.object_for_subject_predicate(subject, owl::WITH_RESTRICTIONS) {
            for restriction in read_list(graph, list)? {
                let restriction = as_node(restriction)?;
                let mut found = false;
                for triple in graph.triples_for_subject(restriction) {
                    let TermRef::Literal(bound) = triple.object else {
                        continue;
                    };
                    let facet = Facet::from_iri(triple.predicate)?;
                    range.facets.push((facet, bound.into_owned()));
                    found = true;
                }
                if !found {
                    return None;
                }
            }
        }
        Some(range)
    }

    pub fn datatype(&self) -> Option<NamedNodeRef<'_>> {
        self.datatype.as_ref().map(NamedNode::as_ref)
    }

    pub fn facets(&self) -> impl Iterator<Item = (Facet, LiteralRef<'_>)> {
        self.facets
            .iter()
            .map(|(facet, bound)| (*facet, bound.as_ref()))
    }

    /// Checks if the literal belongs to the range.
    pub fn contains(&self, value: LiteralRef<'_>) -> bool {
        if let Some(datatype) = &self.datatype {
            let actual = value.datatype();
            // xsd:integer and its derived types are in the value space of xsd:decimal
            let derived = integer_subtype(actual)
                && matches!(datatype.as_ref(), xsd::INTEGER | xsd::DECIMAL);
            if (actual != datatype.as_ref() && !derived) || !is_well_formed(value) {
                return false;
            }
        }
        self.facets
            .iter()
            .all(|(facet, bound)| facet.accepts(value, bound.as_ref()))
    }
}

const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// The value of a literal whose datatype has a known XSD value space.
#[derive(Debug, Clone, Copy)]
enum XsdValue {
    Boolean(Boolean),
    Integer(Integer),
    Decimal(Decimal),
    Float(Float),
    Double(Double),
    DateTime(DateTime),
    Date(Date),
    Time(Time),
    GYear(GYear),
    GYearMonth(GYearMonth),
    Duration(Duration),
}

impl XsdValue {
    /// Parses the literal lexical form.
    ///
    /// Returns `None` if the datatype has no known value space
    /// and `Some(Err(()))` if the lexical form is not in it.
    fn parse(literal: LiteralRef<'_>) -> Option<Result<Self, ()>> {
        let value = literal.value();
        Some(match literal.datatype() {
            xsd::BOOLEAN => value.parse().map(Self::Boolean).map_err(drop),
            xsd::DECIMAL => value.parse().map(Self::Decimal).map_err(drop),
            xsd::FLOAT => value.parse().map(Self::Float).map_err(drop),
            xsd::DOUBLE => value.parse().map(Self::Double).map_err(drop),
            xsd::DATE_TIME | xsd::DATE_TIME_STAMP => {
                value.parse().map(Self::DateTime).map_err(drop)
            }
            xsd::DATE => value.parse().map(Self::Date).map_err(drop),
            xsd::TIME => value.parse().map(Self::Time).map_err(drop),
            xsd::G_YEAR => value.parse().map(Self::GYear).map_err(drop),
            xsd::G_YEAR_MONTH => value.parse().map(Self::GYearMonth).map_err(drop),
            xsd::DURATION => value.parse().map(Self::Duration).map_err(drop),
            // u64 values above i64::MAX do not fit in Integer
            xsd::UNSIGNED_LONG => value
                .parse::<u64>()
                .map(|value| Self::Decimal(value.into()))
                .map_err(drop),
            datatype if integer_subtype(datatype) => match value.parse::<Integer>() {
                Ok(integer) if in_integer_range(datatype, value, integer) => {
                    Ok(Self::Integer(integer))
                }
                _ => Err(()),
            },
            _ => return None,
        })
    }

    fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Decimal(b)) => Decimal::from(*a).partial_cmp(b),
            (Self::Integer(a), Self::Float(b)) => Float::from(*a).partial_cmp(b),
            (Self::Integer(a), Self::Double(b)) => Double::from(*a).partial_cmp(b),
            (Self::Decimal(a), Self::Integer(b)) => a.partial_cmp(&Decimal::from(*b)),
            (Self::Decimal(a), Self::Decimal(b)) => a.partial_cmp(b),
            (Self::Decimal(a), Self::Float(b)) => Float::from(*a).partial_cmp(b),
            (Self::Decimal(a), Self::Double(b)) => Double::from(*a).partial_cmp(b),
            (Self::Float(a), Self::Integer(b)) => a.partial_cmp(&Float::from(*b)),
            (Self::Float(a), Self::Decimal(b)) => a.partial_cmp(&Float::from(*b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Float(a), Self::Double(b)) => Double::from(*a).partial_cmp(b),
            (Self::Double(a), Self::Integer(b)) => a.partial_cmp(&Double::from(*b)),
            (Self::Double(a), Self::Decimal(b)) => a.partial_cmp(&Double::from(*b)),
            (Self::Double(a), Self::Float(b)) => a.partial_cmp(&Double::from(*b)),
            (Self::Double(a), Self::Double(b)) => a.partial_cmp(b),
            (Self::DateTime(a), Self::DateTime(b)) => a.partial_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.partial_cmp(b),
            (Self::Time(a), Self::Time(b)) => a.partial_cmp(b),
            (Self::GYear(a), Self::GYear(b)) => a.partial_cmp(b),
            (Self::GYearMonth(a), Self::GYearMonth(b)) => a.partial_cmp(b),
            (Self::Duration(a), Self::Duration(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Checks that the lexical form of the literal belongs to its datatype.
///
/// Literals with a datatype without known value space are always well-formed.
pub fn is_well_formed(literal: LiteralRef<'_>) -> bool {
    !matches!(XsdValue::parse(literal), Some(Err(())))
}

/// Compares two literals.
///
/// Literals with an XSD datatype compare by value, numeric ones whatever their exact numeric datatype.
/// Ill-formed literals are not comparable.
/// Other literals are comparable only when they share a datatype and a language and then compare lexically.
pub fn compare_literals(a: LiteralRef<'_>, b: LiteralRef<'_>) -> Option<Ordering> {
    match (XsdValue::parse(a), XsdValue::parse(b)) {
        (Some(a), Some(b)) => a.ok()?.compare(&b.ok()?),
        (None, None) if a.datatype() == b.datatype() && a.language() == b.language() => {
            Some(a.value().cmp(b.value()))
        }
        _ => None,
    }
}

fn in_integer_range(datatype: NamedNodeRef<'_>, value: &str, integer: Integer) -> bool {
    let zero = Integer::from(0);
    match datatype {
        xsd::BYTE => value.parse::<i8>().is_ok(),
        xsd::SHORT => value.parse::<i16>().is_ok(),
        xsd::INT => value.parse::<i32>().is_ok(),
        xsd::UNSIGNED_BYTE => value.parse::<u8>().is_ok(),
        xsd::UNSIGNED_SHORT => value.parse::<u16>().is_ok(),
        xsd::UNSIGNED_INT => value.parse::<u32>().is_ok(),
        xsd::NON_NEGATIVE_INTEGER => integer >= zero,
        xsd::POSITIVE_INTEGER => integer > zero,
        xsd::NON_POSITIVE_INTEGER => integer <= zero,
        xsd::NEGATIVE_INTEGER => integer < zero,
        _ => true,
    }
}

fn integer_subtype(datatype: NamedNodeRef<'_>) -> bool {
    matches!(
        datatype,
        xsd::INTEGER
            | xsd::INT
            | xsd::LONG
            | xsd::SHORT
            | xsd::BYTE
            | xsd::NON_NEGATIVE_INTEGER
            | xsd::POSITIVE_INTEGER
            | xsd::NEGATIVE_INTEGER
            | xsd::NON_POSITIVE_INTEGER
            | xsd::UNSIGNED_INT
            | xsd::UNSIGNED_LONG
            | xsd::UNSIGNED_SHORT
            | xsd::UNSIGNED_BYTE
    )
}
