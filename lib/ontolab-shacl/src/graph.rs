use crate::error::ShaclParseError;
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{Graph, NamedNodeRef, NamedOrBlankNodeRef, Term, TermRef, TripleRef};
use rustc_hash::FxHashSet;

pub fn as_node(term: TermRef<'_>) -> Option<NamedOrBlankNodeRef<'_>> {
    match term {
        TermRef::NamedNode(node) => Some(node.into()),
        TermRef::BlankNode(node) => Some(node.into()),
        _ => None,
    }
}

pub fn object<'a>(
    graph: &'a Graph,
    subject: NamedOrBlankNodeRef<'_>,
    predicate: NamedNodeRef<'_>,
) -> Option<TermRef<'a>> {
    graph.object_for_subject_predicate(subject, predicate)
}

pub fn has_type(
    graph: &Graph,
    node: NamedOrBlankNodeRef<'_>,
    class: NamedNodeRef<'_>,
) -> bool {
    graph.contains(TripleRef::new(node, rdf::TYPE, class))
}

/// Objects sorted by their N-Triples serialization so shapes are parsed in a stable order.
pub fn sorted_objects<'a>(
    graph: &'a Graph,
    subject: NamedOrBlankNodeRef<'_>,
    predicate: NamedNodeRef<'_>,
) -> Vec<TermRef<'a>> {
    let mut objects = graph
        .objects_for_subject_predicate(subject, predicate)
        .collect::<Vec<_>>();
    objects.sort_by_cached_key(ToString::to_string);
    objects
}

/// Reads the members of the RDF collection starting at `head`.
pub fn read_list<'a>(
    graph: &'a Graph,
    head: TermRef<'_>,
    shape: NamedOrBlankNodeRef<'_>,
) -> Result<Vec<TermRef<'a>>, ShaclParseError> {
    let mut items = Vec::new();
    let mut visited = FxHashSet::default();
    let mut current = head.into_owned();
    while current.as_ref() != TermRef::from(rdf::NIL) {
        let Some(node) = as_node(current.as_ref()) else {
            return Err(ShaclParseError::invalid_rdf_list(
                shape.into_owned(),
                format!("{current} is not a list node"),
            ));
        };
        if !visited.insert(node.into_owned()) {
            return Err(ShaclParseError::invalid_rdf_list(
                shape.into_owned(),
                "the list is cyclic",
            ));
        }
        let Some(first) = object(graph, node, rdf::FIRST) else {
            return Err(ShaclParseError::invalid_rdf_list(
                shape.into_owned(),
                format!("{node} has no rdf:first"),
            ));
        };
        items.push(first);
        let Some(rest) = object(graph, node, rdf::REST) else {
            return Err(ShaclParseError::invalid_rdf_list(
                shape.into_owned(),
                format!("{node} has no rdf:rest"),
            ));
        };
        current = rest.into_owned();
    }
    Ok(items)
}

/// Instances of `class` or of any of its `rdfs:subClassOf` descendants, sorted.
pub fn instances_of(graph: &Graph, class: NamedNodeRef<'_>) -> Vec<Term> {
    let mut classes = vec![NamedOrBlankNodeRef::from(class)];
    let mut seen = [NamedOrBlankNodeRef::from(class)]
        .into_iter()
        .collect::<FxHashSet<_>>();
    let mut instances = FxHashSet::default();
    while let Some(current) = classes.pop() {
        instances.extend(
            graph
                .subjects_for_predicate_object(rdf::TYPE, current)
                .map(|s| Term::from(s.into_owned())),
        );
        for sub in graph.subjects_for_predicate_object(rdfs::SUB_CLASS_OF, current) {
            if seen.insert(sub) {
                classes.push(sub);
            }
        }
    }
    let mut instances = instances.into_iter().collect::<Vec<_>>();
    instances.sort_by_cached_key(ToString::to_string);
    instances
}

/// Whether `term` has an `rdf:type` that is `class` or one of its subclasses.
pub fn is_instance_of(graph: &Graph, term: TermRef<'_>, class: NamedNodeRef<'_>) -> bool {
    let Some(node) = as_node(term) else {
        return false;
    };
    let mut pending = graph
        .objects_for_subject_predicate(node, rdf::TYPE)
        .collect::<Vec<_>>();
    let mut seen = FxHashSet::default();
    while let Some(current) = pending.pop() {
        if current == TermRef::from(class) {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        if let Some(current) = as_node(current) {
            pending.extend(graph.objects_for_subject_predicate(current, rdfs::SUB_CLASS_OF));
        }
    }
    false
}
