//! Entailment rules, named after the [OWL 2 RL/RDF rule tables](https://www.w3.org/TR/owl2-profiles/#Reasoning_in_OWL_2_RL_and_RDF_Graphs_using_Rules).
//!
//! Every rule reads the current graph and reports the triples it entails to a [`Derivations`]
//! collector. Rules never mint new nodes so the naive fixpoint always terminates.

use crate::datatype::DataRange;
use crate::graph::{as_named_node, as_node, read_list};
use crate::vocab::owl;
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{Graph, NamedNodeRef, NamedOrBlankNodeRef, TermRef, Triple, TripleRef};
use rustc_hash::FxHashSet;

/// An entailment rule.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&mut Derivations<'_>),
}

/// Collects the triples entailed by one round of rule applications.
pub struct Derivations<'g> {
    graph: &'g Graph,
    new: FxHashSet<Triple>,
}

impl<'g> Derivations<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            new: FxHashSet::default(),
        }
    }

    fn infer(
        &mut self,
        subject: impl Into<NamedOrBlankNodeRef<'g>>,
        predicate: NamedNodeRef<'g>,
        object: impl Into<TermRef<'g>>,
    ) {
        let triple = TripleRef::new(subject, predicate, object);
        if !self.graph.contains(triple) {
            self.new.insert(triple.into_owned());
        }
    }

    pub fn len(&self) -> usize {
        self.new.len()
    }

    pub fn into_triples(self) -> FxHashSet<Triple> {
        self.new
    }
}

pub const RDFS_RULES: &[Rule] = &[
    Rule {
        name: "prp-dom",
        apply: prp_dom,
    },
    Rule {
        name: "prp-rng",
        apply: prp_rng,
    },
    Rule {
        name: "prp-spo1",
        apply: prp_spo1,
    },
    Rule {
        name: "cax-sco",
        apply: cax_sco,
    },
    Rule {
        name: "scm-sco",
        apply: scm_sco,
    },
    Rule {
        name: "scm-spo",
        apply: scm_spo,
    },
];

pub const OWL_RL_RULES: &[Rule] = &[
    Rule {
        name: "cax-eqc",
        apply: cax_eqc,
    },
    Rule {
        name: "scm-eqc1",
        apply: scm_eqc1,
    },
    Rule {
        name: "prp-eqp",
        apply: prp_eqp,
    },
    Rule {
        name: "prp-symp",
        apply: prp_symp,
    },
    Rule {
        name: "prp-trp",
        apply: prp_trp,
    },
    Rule {
        name: "prp-inv",
        apply: prp_inv,
    },
    Rule {
        name: "cls-int1",
        apply: cls_int1,
    },
    Rule {
        name: "cls-int2",
        apply: cls_int2,
    },
    Rule {
        name: "cls-uni",
        apply: cls_uni,
    },
    Rule {
        name: "cls-svf",
        apply: cls_svf,
    },
    Rule {
        name: "cls-hv1",
        apply: cls_hv1,
    },
    Rule {
        name: "cls-hv2",
        apply: cls_hv2,
    },
    Rule {
        name: "cls-avf",
        apply: cls_avf,
    },
    Rule {
        name: "eq-sym",
        apply: eq_sym,
    },
    Rule {
        name: "eq-trans",
        apply: eq_trans,
    },
    Rule {
        name: "eq-rep",
        apply: eq_rep,
    },
];

/// Pairs `(a, b)` of `a predicate b` with both sides named or blank nodes.
fn node_pairs<'g>(
    graph: &'g Graph,
    predicate: NamedNodeRef<'_>,
) -> impl Iterator<Item = (NamedOrBlankNodeRef<'g>, NamedOrBlankNodeRef<'g>)> + 'g {
    graph
        .triples_for_predicate(predicate)
        .filter_map(|t| Some((t.subject, as_node(t.object)?)))
}

/// Pairs `(p, q)` of `p predicate q` where both sides are IRIs usable as predicates.
fn property_pairs<'g>(
    graph: &'g Graph,
    predicate: NamedNodeRef<'_>,
) -> impl Iterator<Item = (NamedNodeRef<'g>, NamedNodeRef<'g>)> + 'g {
    graph.triples_for_predicate(predicate).filter_map(|t| {
        let NamedOrBlankNodeRef::NamedNode(p) = t.subject else {
            return None;
        };
        Some((p, as_named_node(t.object)?))
    })
}

fn instances<'g>(
    graph: &'g Graph,
    class: impl Into<TermRef<'g>>,
) -> impl Iterator<Item = NamedOrBlankNodeRef<'g>> + 'g {
    graph.subjects_for_predicate_object(rdf::TYPE, class)
}

fn has_type(graph: &Graph, node: NamedOrBlankNodeRef<'_>, class: TermRef<'_>) -> bool {
    graph.contains(TripleRef::new(node, rdf::TYPE, class))
}

fn prp_dom(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (p, c) in property_domain_or_range(graph, rdfs::DOMAIN) {
        for t in graph.triples_for_predicate(p) {
            d.infer(t.subject, rdf::TYPE, c);
        }
    }
}

fn prp_rng(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (p, c) in property_domain_or_range(graph, rdfs::RANGE) {
        for t in graph.triples_for_predicate(p) {
            if let Some(object) = as_node(t.object) {
                d.infer(object, rdf::TYPE, c);
            }
        }
    }
}

fn property_domain_or_range<'g>(
    graph: &'g Graph,
    predicate: NamedNodeRef<'_>,
) -> impl Iterator<Item = (NamedNodeRef<'g>, NamedOrBlankNodeRef<'g>)> + 'g {
    graph.triples_for_predicate(predicate).filter_map(|t| {
        let NamedOrBlankNodeRef::NamedNode(p) = t.subject else {
            return None;
        };
        Some((p, as_node(t.object)?))
    })
}

fn prp_spo1(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (p1, p2) in property_pairs(graph, rdfs::SUB_PROPERTY_OF) {
        for t in graph.triples_for_predicate(p1) {
            d.infer(t.subject, p2, t.object);
        }
    }
}

fn cax_sco(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (c1, c2) in node_pairs(graph, rdfs::SUB_CLASS_OF) {
        for x in instances(graph, c1) {
            d.infer(x, rdf::TYPE, c2);
        }
    }
}

fn scm_sco(d: &mut Derivations<'_>) {
    transitive_closure(d, rdfs::SUB_CLASS_OF);
}

fn scm_spo(d: &mut Derivations<'_>) {
    transitive_closure(d, rdfs::SUB_PROPERTY_OF);
}

/// `a p b`, `b p c` ⇒ `a p c`
fn transitive_closure(d: &mut Derivations<'_>, predicate: NamedNodeRef<'_>) {
    let graph = d.graph;
    for t in graph.triples_for_predicate(predicate) {
        let Some(middle) = as_node(t.object) else {
            continue;
        };
        for end in graph.objects_for_subject_predicate(middle, predicate) {
            d.infer(t.subject, t.predicate, end);
        }
    }
}

/// Both directions of `cax-eqc1` and `cax-eqc2`.
fn cax_eqc(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (c1, c2) in node_pairs(graph, owl::EQUIVALENT_CLASS) {
        for x in instances(graph, c1) {
            d.infer(x, rdf::TYPE, c2);
        }
        for x in instances(graph, c2) {
            d.infer(x, rdf::TYPE, c1);
        }
    }
}

fn scm_eqc1(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (c1, c2) in node_pairs(graph, owl::EQUIVALENT_CLASS) {
        d.infer(c1, rdfs::SUB_CLASS_OF, c2);
        d.infer(c2, rdfs::SUB_CLASS_OF, c1);
    }
}

/// Both directions of `prp-eqp1` and `prp-eqp2`.
fn prp_eqp(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (p1, p2) in property_pairs(graph, owl::EQUIVALENT_PROPERTY) {
        for t in graph.triples_for_predicate(p1) {
            d.infer(t.subject, p2, t.object);
        }
        for t in graph.triples_for_predicate(p2) {
            d.infer(t.subject, p1, t.object);
        }
    }
}

fn prp_symp(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for p in instances(graph, owl::SYMMETRIC_PROPERTY) {
        let NamedOrBlankNodeRef::NamedNode(p) = p else {
            continue;
        };
        for t in graph.triples_for_predicate(p) {
            if let Some(object) = as_node(t.object) {
                d.infer(object, p, t.subject);
            }
        }
    }
}

fn prp_trp(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for p in instances(graph, owl::TRANSITIVE_PROPERTY) {
        if let NamedOrBlankNodeRef::NamedNode(p) = p {
            transitive_closure(d, p);
        }
    }
}

/// Both directions of `prp-inv1` and `prp-inv2`.
fn prp_inv(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (p1, p2) in property_pairs(graph, owl::INVERSE_OF) {
        for t in graph.triples_for_predicate(p1) {
            if let Some(object) = as_node(t.object) {
                d.infer(object, p2, t.subject);
            }
        }
        for t in graph.triples_for_predicate(p2) {
            if let Some(object) = as_node(t.object) {
                d.infer(object, p1, t.subject);
            }
        }
    }
}

/// Class expressions `c owl:{list_predicate} (c1 … cn)` with a well-formed list.
fn class_lists<'g>(
    graph: &'g Graph,
    list_predicate: NamedNodeRef<'_>,
) -> impl Iterator<Item = (NamedOrBlankNodeRef<'g>, Vec<TermRef<'g>>)> + 'g {
    graph
        .triples_for_predicate(list_predicate)
        .filter_map(move |t| Some((t.subject, read_list(graph, t.object)?)))
}

fn cls_int1(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (c, members) in class_lists(graph, owl::INTERSECTION_OF) {
        let Some((first, rest)) = members.split_first() else {
            continue;
        };
        for y in instances(graph, *first) {
            if rest.iter().all(|ci| has_type(graph, y, *ci)) {
                d.infer(y, rdf::TYPE, c);
            }
        }
    }
}

fn cls_int2(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (c, members) in class_lists(graph, owl::INTERSECTION_OF) {
        for y in instances(graph, c) {
            for ci in &members {
                d.infer(y, rdf::TYPE, *ci);
            }
        }
    }
}

fn cls_uni(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (c, members) in class_lists(graph, owl::UNION_OF) {
        for ci in members {
            for y in instances(graph, ci) {
                d.infer(y, rdf::TYPE, c);
            }
        }
    }
}

/// Restrictions `x owl:onProperty p` with `x {predicate} y`.
fn restrictions<'g>(
    graph: &'g Graph,
    predicate: NamedNodeRef<'_>,
) -> impl Iterator<Item = (NamedOrBlankNodeRef<'g>, NamedNodeRef<'g>, TermRef<'g>)> + 'g {
    graph.triples_for_predicate(predicate).filter_map(move |t| {
        let p = as_named_node(graph.object_for_subject_predicate(t.subject, owl::ON_PROPERTY)?)?;
        Some((t.subject, p, t.object))
    })
}

/// `cls-svf1`, `cls-svf2` and their extension to data ranges.
///
/// A filler that is an XSD datatype, `rdfs:Literal` or a datatype restriction matches
/// literal values. Any other filler is a class and matches typed nodes.
fn cls_svf(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (x, p, y) in restrictions(graph, owl::SOME_VALUES_FROM) {
        if y == TermRef::from(owl::THING) {
            for t in graph.triples_for_predicate(p) {
                d.infer(t.subject, rdf::TYPE, x);
            }
        } else if let Some(range) = DataRange::from_graph(graph, y) {
            for t in graph.triples_for_predicate(p) {
                if let TermRef::Literal(value) = t.object {
                    if range.contains(value) {
                        d.infer(t.subject, rdf::TYPE, x);
                    }
                }
            }
        } else {
            for t in graph.triples_for_predicate(p) {
                if let Some(v) = as_node(t.object) {
                    if has_type(graph, v, y) {
                        d.infer(t.subject, rdf::TYPE, x);
                    }
                }
            }
        }
    }
}

fn cls_hv1(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (x, p, y) in restrictions(graph, owl::HAS_VALUE) {
        for u in instances(graph, x) {
            d.infer(u, p, y);
        }
    }
}

fn cls_hv2(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (x, p, y) in restrictions(graph, owl::HAS_VALUE) {
        for u in graph.subjects_for_predicate_object(p, y) {
            d.infer(u, rdf::TYPE, x);
        }
    }
}

fn cls_avf(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (x, p, y) in restrictions(graph, owl::ALL_VALUES_FROM) {
        for u in instances(graph, x) {
            for v in graph.objects_for_subject_predicate(u, p) {
                if let Some(v) = as_node(v) {
                    d.infer(v, rdf::TYPE, y);
                }
            }
        }
    }
}

fn eq_sym(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (x, y) in node_pairs(graph, owl::SAME_AS) {
        d.infer(y, owl::SAME_AS, x);
    }
}

fn eq_trans(d: &mut Derivations<'_>) {
    transitive_closure(d, owl::SAME_AS);
}

/// `eq-rep-s` and `eq-rep-o`. Predicates are never rewritten.
fn eq_rep(d: &mut Derivations<'_>) {
    let graph = d.graph;
    for (s1, s2) in node_pairs(graph, owl::SAME_AS) {
        if s1 == s2 {
            continue;
        }
        for t in graph.triples_for_subject(s1) {
            d.infer(s2, t.predicate, t.object);
        }
        for t in graph.triples_for_object(s1) {
            d.infer(t.subject, t.predicate, s2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::NamedNode;

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    fn round(graph: &Graph, rule: fn(&mut Derivations<'_>)) -> FxHashSet<Triple> {
        let mut d = Derivations::new(graph);
        rule(&mut d);
        d.into_triples()
    }

    #[test]
    fn derivations_skip_known_triples() {
        let mut graph = Graph::new();
        graph.insert(TripleRef::new(&ex("a"), rdfs::SUB_CLASS_OF, &ex("b")));
        graph.insert(TripleRef::new(&ex("b"), rdfs::SUB_CLASS_OF, &ex("c")));
        graph.insert(TripleRef::new(&ex("a"), rdfs::SUB_CLASS_OF, &ex("c")));
        assert!(round(&graph, scm_sco).is_empty());
    }

    #[test]
    fn symmetric_property() {
        let mut graph = Graph::new();
        let knows = ex("knows");
        graph.insert(TripleRef::new(&knows, rdf::TYPE, owl::SYMMETRIC_PROPERTY));
        graph.insert(TripleRef::new(&ex("alice"), &knows, &ex("bob")));
        let new = round(&graph, prp_symp);
        assert_eq!(new.len(), 1);
        assert!(new.contains(&Triple::new(ex("bob"), knows, ex("alice"))));
    }

    #[test]
    fn has_value_both_directions() {
        let mut graph = Graph::new();
        let restriction = ex("Red");
        let color = ex("color");
        graph.insert(TripleRef::new(&restriction, owl::ON_PROPERTY, &color));
        graph.insert(TripleRef::new(&restriction, owl::HAS_VALUE, &ex("red")));
        graph.insert(TripleRef::new(&ex("apple"), &color, &ex("red")));
        graph.insert(TripleRef::new(&ex("cherry"), rdf::TYPE, &restriction));

        let typed = round(&graph, cls_hv2);
        assert_eq!(typed.len(), 1);
        assert!(typed.contains(&Triple::new(ex("apple"), rdf::TYPE, restriction.clone())));

        let valued = round(&graph, cls_hv1);
        assert_eq!(valued.len(), 1);
        assert!(valued.contains(&Triple::new(ex("cherry"), color, ex("red"))));
    }

    #[test]
    fn rule_names_are_unique() {
        let mut names = FxHashSet::default();
        for rule in RDFS_RULES.iter().chain(OWL_RL_RULES) {
            assert!(names.insert(rule.name), "duplicate rule {}", rule.name);
        }
    }
}
