//! Small lookups over [`Graph`] shared by the rules.

use oxrdf::vocab::rdf;
use oxrdf::{Graph, NamedNodeRef, NamedOrBlankNodeRef, TermRef};
use rustc_hash::FxHashSet;

/// Returns the term as a node usable in subject position.
pub fn as_node(term: TermRef<'_>) -> Option<NamedOrBlankNodeRef<'_>> {
    match term {
        TermRef::NamedNode(node) => Some(node.into()),
        TermRef::BlankNode(node) => Some(node.into()),
        _ => None,
    }
}

pub fn as_named_node(term: TermRef<'_>) -> Option<NamedNodeRef<'_>> {
    if let TermRef::NamedNode(node) = term {
        Some(node)
    } else {
        None
    }
}

/// Reads the members of an RDF collection.
///
/// Returns `None` on malformed lists (missing `rdf:first`, branching or cycles).
pub fn read_list<'a>(graph: &'a Graph, head: TermRef<'a>) -> Option<Vec<TermRef<'a>>> {
    let mut items = Vec::new();
    let mut visited = FxHashSet::default();
    let mut current = head;
    loop {
        if current == TermRef::from(rdf::NIL) {
            return Some(items);
        }
        let node = as_node(current)?;
        if !visited.insert(node) {
            return None;
        }
        let mut firsts = graph.objects_for_subject_predicate(node, rdf::FIRST);
        let first = firsts.next()?;
        if firsts.next().is_some() {
            return None;
        }
        items.push(first);
        current = graph.object_for_subject_predicate(node, rdf::REST)?;
    }
}

#[cfg(test)]
#[expect(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, Literal, TripleRef};

    #[test]
    fn reads_well_formed_list() -> Result<(), Box<dyn std::error::Error>> {
        let mut graph = Graph::new();
        let head = BlankNode::new("l1")?;
        let tail = BlankNode::new("l2")?;
        let a = Literal::from(1);
        let b = Literal::from(2);
        graph.insert(TripleRef::new(&head, rdf::FIRST, &a));
        graph.insert(TripleRef::new(&head, rdf::REST, &tail));
        graph.insert(TripleRef::new(&tail, rdf::FIRST, &b));
        graph.insert(TripleRef::new(&tail, rdf::REST, rdf::NIL));

        let items = read_list(&graph, head.as_ref().into()).ok_or("list expected")?;
        assert_eq!(items, vec![a.as_ref().into(), b.as_ref().into()]);
        Ok(())
    }

    #[test]
    fn rejects_cyclic_list() -> Result<(), Box<dyn std::error::Error>> {
        let mut graph = Graph::new();
        let head = BlankNode::new("l1")?;
        graph.insert(TripleRef::new(&head, rdf::FIRST, rdf::NIL));
        graph.insert(TripleRef::new(&head, rdf::REST, &head));
        assert!(read_list(&graph, head.as_ref().into()).is_none());
        Ok(())
    }
}
