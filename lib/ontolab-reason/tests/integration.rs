#![cfg(test)]
#![expect(clippy::panic_in_result_fn)]

use ontolab_reason::vocab::owl;
use ontolab_reason::{ClosureReasoner, Inconsistency, ReasoningProfile};
use oxigraph::io::{RdfFormat, RdfParser};
use oxrdf::vocab::rdf;
use oxrdf::{Graph, NamedNodeRef, Triple, TripleRef};
use std::error::Error;

const EX: &str = "http://example.org/computers#";

const COMPUTERS: &str = r#"
@prefix : <http://example.org/computers#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

:Computer a owl:Class .
:Laptop rdfs:subClassOf :Computer .
:DedicatedGPU a owl:Class .
:hasPrice a owl:DatatypeProperty ; rdfs:domain :Computer .
:hasRAM a owl:DatatypeProperty .
:hasGPU a owl:ObjectProperty ; rdfs:range :GPU .

:AffordableComputer owl:equivalentClass [
    owl:intersectionOf ( :Computer [
        a owl:Restriction ;
        owl:onProperty :hasPrice ;
        owl:someValuesFrom [
            a rdfs:Datatype ;
            owl:onDatatype xsd:decimal ;
            owl:withRestrictions ( [ xsd:maxExclusive "1000"^^xsd:decimal ] )
        ]
    ] )
] .

:GamingComputer owl:equivalentClass [
    owl:intersectionOf (
        :Computer
        [ a owl:Restriction ; owl:onProperty :hasRAM ; owl:someValuesFrom [
            a rdfs:Datatype ;
            owl:onDatatype xsd:integer ;
            owl:withRestrictions ( [ xsd:minInclusive 16 ] )
        ] ]
        [ a owl:Restriction ; owl:onProperty :hasGPU ; owl:someValuesFrom :DedicatedGPU ]
    )
] .

:rtx a :DedicatedGPU .
:igpu a :GPU .

:budget a :Laptop ; :hasPrice "499.99"^^xsd:decimal ; :hasRAM 8 ; :hasGPU :igpu .
:cheapGamer a :Laptop ; :hasPrice "999.99"^^xsd:decimal ; :hasRAM 16 ; :hasGPU :rtx .
:boundary a :Laptop ; :hasPrice "1000.00"^^xsd:decimal ; :hasRAM 32 ; :hasGPU :rtx .
:lowRam a :Laptop ; :hasPrice "1500"^^xsd:decimal ; :hasRAM 15 ; :hasGPU :rtx .
"#;

fn parse(turtle: &str) -> Result<Graph, Box<dyn Error>> {
    let mut graph = Graph::new();
    for quad in RdfParser::from_format(RdfFormat::Turtle).for_slice(turtle.as_bytes()) {
        graph.insert(&Triple::from(quad?));
    }
    Ok(graph)
}

fn ex(name: &str) -> String {
    format!("{EX}{name}")
}

fn instances_of(graph: &Graph, class: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let class = ex(class);
    let mut instances = graph
        .subjects_for_predicate_object(rdf::TYPE, NamedNodeRef::new(&class)?)
        .map(|s| s.to_string())
        .collect::<Vec<_>>();
    instances.sort();
    Ok(instances)
}

#[test]
fn datatype_restrictions_classify_computers() -> Result<(), Box<dyn Error>> {
    let graph = parse(COMPUTERS)?;
    let closure = ClosureReasoner::new(ReasoningProfile::OwlRl).closure(&graph)?;

    assert_eq!(
        instances_of(&closure, "AffordableComputer")?,
        vec![format!("<{}>", ex("budget")), format!("<{}>", ex("cheapGamer"))]
    );
    assert_eq!(
        instances_of(&closure, "GamingComputer")?,
        vec![format!("<{}>", ex("boundary")), format!("<{}>", ex("cheapGamer"))]
    );
    Ok(())
}

#[test]
fn rdfs_domain_and_range() -> Result<(), Box<dyn Error>> {
    let graph = parse(COMPUTERS)?;
    let closure = ClosureReasoner::new(ReasoningProfile::Rdfs).closure(&graph)?;
    assert!(closure.contains(TripleRef::new(
        NamedNodeRef::new(&ex("rtx"))?,
        rdf::TYPE,
        NamedNodeRef::new(&ex("GPU"))?
    )));
    assert_eq!(instances_of(&closure, "Computer")?.len(), 4);
    assert!(instances_of(&closure, "AffordableComputer")?.is_empty());
    Ok(())
}

#[test]
fn closure_contains_input() -> Result<(), Box<dyn Error>> {
    let graph = parse(COMPUTERS)?;
    for profile in [ReasoningProfile::Rdfs, ReasoningProfile::OwlRl] {
        let closure = ClosureReasoner::new(profile).closure(&graph)?;
        for triple in &graph {
            assert!(closure.contains(triple), "{triple} lost by {profile}");
        }
        assert!(closure.len() > graph.len());
    }
    Ok(())
}

#[test]
fn closure_is_idempotent() -> Result<(), Box<dyn Error>> {
    let reasoner = ClosureReasoner::new(ReasoningProfile::OwlRl);
    let mut closure = reasoner.closure(&parse(COMPUTERS)?)?;
    let before = closure.len();
    let stats = reasoner.expand(&mut closure)?;
    assert_eq!(stats.inferred_triples, 0);
    assert_eq!(stats.iterations, 1);
    assert_eq!(closure.len(), before);
    Ok(())
}

#[test]
fn same_as_propagates_statements() -> Result<(), Box<dyn Error>> {
    let graph = parse(
        r"
        @prefix : <http://example.org/computers#> .
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        :tp owl:sameAs :thinkpad .
        :thinkpad :hasRAM 32 .
        :shop :sells :tp .
        ",
    )?;
    let closure = ClosureReasoner::new(ReasoningProfile::OwlRl).closure(&graph)?;
    let (tp, thinkpad, sells, shop) = (ex("tp"), ex("thinkpad"), ex("sells"), ex("shop"));
    let tp = NamedNodeRef::new(&tp)?;
    let thinkpad = NamedNodeRef::new(&thinkpad)?;
    let sells = NamedNodeRef::new(&sells)?;
    let shop = NamedNodeRef::new(&shop)?;
    assert!(closure.contains(TripleRef::new(thinkpad, owl::SAME_AS, tp)));
    assert!(closure.contains(TripleRef::new(shop, sells, thinkpad)));
    assert_eq!(
        closure
            .objects_for_subject_predicate(tp, NamedNodeRef::new(&ex("hasRAM"))?)
            .count(),
        1
    );
    Ok(())
}

#[test]
fn owl_nothing_is_reported() -> Result<(), Box<dyn Error>> {
    let graph = parse(
        r"
        @prefix : <http://example.org/computers#> .
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        :Impossible rdfs:subClassOf owl:Nothing .
        :x a :Impossible .
        ",
    )?;
    let reasoner = ClosureReasoner::new(ReasoningProfile::OwlRl);
    let closure = reasoner.closure(&graph)?;
    assert_eq!(
        reasoner.inconsistencies(&closure),
        vec![Inconsistency::Nothing {
            individual: NamedNodeRef::new(&ex("x"))?.into_owned().into()
        }]
    );
    Ok(())
}
