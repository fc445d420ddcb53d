#![cfg(test)]
#![expect(clippy::panic_in_result_fn)]

use ontolab::{
    ClosureReasoner, Error, GraphFormat, Inference, LocalQueryRunner, ParseError, QueryOutcome,
    Reasoner, ReasoningProfile, RemoteEndpoint, RemoteQueryError, ResultTable, ShaclEngine,
    ShapeValidator, ValidationOptions, load_graph,
};
use ontolab_shacl::ConstraintComponent;
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{Graph, NamedNode, NamedNodeRef, Term, TermRef, TripleRef};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const FOOD: &str = "http://example.org/food#";
const COMPUTERS: &str = "http://example.org/computers#";
const DIET: &str = "http://example.org/diet#";

fn data(name: &str) -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "..", "..", "data", name]
        .iter()
        .collect()
}

fn iri(namespace: &str, name: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("{namespace}{name}"))
}

fn instances(graph: &Graph, class: NamedNodeRef<'_>) -> Vec<String> {
    let mut instances = graph
        .subjects_for_predicate_object(rdf::TYPE, class)
        .map(|s| s.to_string())
        .collect::<Vec<_>>();
    instances.sort();
    instances
}

fn solutions(outcome: QueryOutcome) -> ResultTable {
    match outcome {
        QueryOutcome::Solutions(table) => table,
        QueryOutcome::Boolean(_) | QueryOutcome::Graph(_) => panic!("expected solutions"),
    }
}

fn unsafe_food(file: &str) -> Result<Vec<String>, Error> {
    let mut graph = load_graph(data(file), None)?;
    let before = graph.len();
    let stats = Reasoner::expand(&ClosureReasoner::new(ReasoningProfile::OwlRl), &mut graph)?;
    assert_eq!(stats.input_triples, before);
    assert!(stats.output_triples > before);
    Ok(instances(&graph, iri(FOOD, "UnsafeFood").as_ref()))
}

#[test]
fn missing_file_is_an_io_error() {
    let path = data("does_not_exist.ttl");
    match load_graph(&path, None) {
        Err(ParseError::Io { path: Some(p), .. }) => assert_eq!(p, path),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn malformed_file_is_a_syntax_error() {
    // The RDF/XML document is not Turtle.
    assert!(matches!(
        load_graph(data("food_safety.rdf"), Some(GraphFormat::TURTLE)),
        Err(ParseError::Syntax { path: Some(_), .. })
    ));
}

#[test]
fn poisonous_and_smelly_food_is_unsafe() -> Result<(), Error> {
    let expected = vec![
        format!("<{FOOD}meat1>"),
        format!("<{FOOD}mushroom1>"),
    ];
    assert_eq!(unsafe_food("food_safety.ttl")?, expected);
    assert_eq!(unsafe_food("food_safety.rdf")?, expected);
    Ok(())
}

#[test]
fn food_closure_is_a_fixpoint() -> Result<(), Error> {
    let graph = load_graph(data("food_safety.ttl"), None)?;
    let reasoner = ClosureReasoner::new(ReasoningProfile::OwlRl);
    let closure = Reasoner::closure(&reasoner, &graph)?;
    assert!(graph.iter().all(|t| closure.contains(t)));
    let again = Reasoner::closure(&reasoner, &closure)?;
    assert_eq!(again.len(), closure.len());
    Ok(())
}

#[test]
fn computers_are_classified_by_price_ram_and_gpu() -> Result<(), Error> {
    let mut graph = load_graph(data("computers.ttl"), None)?;
    let affordable = iri(COMPUTERS, "AffordableComputer");
    let gaming = iri(COMPUTERS, "GamingComputer");
    assert!(instances(&graph, affordable.as_ref()).is_empty());

    let semantic_before = solutions(LocalQueryRunner::new(&graph)?.run_file(data("query.sparql"))?);
    assert!(semantic_before.is_empty());

    Reasoner::expand(&ClosureReasoner::new(ReasoningProfile::OwlRl), &mut graph)?;
    let laptops = |names: &[&str]| {
        names
            .iter()
            .map(|n| format!("<{COMPUTERS}{n}>"))
            .collect::<Vec<_>>()
    };
    assert_eq!(
        instances(&graph, affordable.as_ref()),
        laptops(&["laptop1", "laptop2", "laptop3", "laptop6"])
    );
    assert_eq!(
        instances(&graph, gaming.as_ref()),
        laptops(&["laptop2", "laptop3", "laptop4"])
    );

    let runner = LocalQueryRunner::new(&graph)?;
    let semantic = solutions(runner.run_file(data("query.sparql"))?);
    let manual = solutions(runner.run_file(data("query_manual.sparql"))?);
    assert_eq!(semantic, manual);
    assert_eq!(
        semantic.column("model").collect::<Vec<_>>(),
        ["TUF Gaming F15", "Nitro 5"]
    );
    Ok(())
}

#[test]
fn diet_queries() -> Result<(), Error> {
    let graph = load_graph(data("diet.ttl"), None)?;
    let runner = LocalQueryRunner::new(&graph)?;
    let foods = |file: &str| -> Result<Vec<String>, Error> {
        Ok(solutions(runner.run_file(data(file))?)
            .column("foodName")
            .map(str::to_owned)
            .collect())
    };
    assert_eq!(
        foods("query_alice.sparql")?,
        [
            "Fruit Salad",
            "Garden Salad",
            "Margherita Pizza",
            "Peanut Noodles",
            "Vegetable Stir Fry"
        ]
    );
    assert_eq!(foods("query_bob.sparql")?.len(), 6);
    assert_eq!(
        foods("query_safe_for_all.sparql")?,
        ["Fruit Salad", "Garden Salad", "Vegetable Stir Fry"]
    );

    let why_not = solutions(runner.run_file(data("query_why_not.sparql"))?);
    assert_eq!(why_not.len(), 1);
    assert_eq!(why_not.rows[0].value("ingredient"), Some("Beef"));
    assert_eq!(why_not.rows[0].value("restriction"), Some("Vegetarian"));

    let matrix = solutions(runner.run_file(data("query_compatibility_matrix.sparql"))?);
    assert_eq!(matrix.len(), 21);
    assert_eq!(matrix.column("compatible").filter(|c| *c == "no").count(), 5);
    Ok(())
}

fn diet_options() -> ValidationOptions {
    ValidationOptions {
        inference: Inference::Rdfs,
        abort_on_first: false,
    }
}

#[test]
fn diet_data_conforms_to_its_shapes() -> Result<(), Error> {
    let data_graph = load_graph(data("diet.ttl"), None)?;
    let shapes = load_graph(data("shacl_shapes.ttl"), None)?;
    let conformance = ShaclEngine::new(diet_options()).validate(&data_graph, &shapes)?;
    assert!(conformance.conforms, "{}", conformance.text);
    assert!(conformance.violations.is_empty());
    Ok(())
}

#[test]
fn removing_a_name_is_reported() -> Result<(), Error> {
    let mut data_graph = load_graph(data("diet.ttl"), None)?;
    let alice = iri(DIET, "alice");
    let has_name = iri(DIET, "hasName");
    let name = data_graph
        .object_for_subject_predicate(&alice, &has_name)
        .map(TermRef::into_owned);
    let Some(name) = name else {
        panic!("alice has no name");
    };
    data_graph.remove(TripleRef::new(&alice, &has_name, &name));
    let shapes = load_graph(data("shacl_shapes.ttl"), None)?;

    let report = ShaclEngine::new(diet_options()).report(&data_graph, &shapes)?;
    assert!(!report.conforms());
    assert_eq!(report.violation_count(), 1);
    let result = &report.results()[0];
    assert_eq!(result.focus_node, Term::from(alice));
    assert_eq!(result.component, ConstraintComponent::MinCount);
    assert_eq!(result.message, "Every person needs exactly one name");
    Ok(())
}

#[test]
fn data_graph_can_hold_its_own_shapes() -> Result<(), Error> {
    let graph = load_graph(data("food_safety_shacl.ttl"), None)?;
    let report = ShaclEngine::new(diet_options()).report(&graph, &graph)?;
    let components = report
        .results()
        .iter()
        .map(|r| (r.focus_node.to_string(), r.component))
        .collect::<Vec<_>>();
    assert_eq!(
        components,
        [
            (format!("<{FOOD}bread1>"), ConstraintComponent::MinCount),
            (format!("<{FOOD}meat1>"), ConstraintComponent::Datatype),
        ]
    );
    // Validation must not leak inferred triples into the input.
    assert!(!graph.contains(TripleRef::new(
        &iri(FOOD, "meat1"),
        rdf::TYPE,
        &iri(FOOD, "Food")
    )));
    assert!(graph.contains(TripleRef::new(
        &iri(FOOD, "Meat"),
        rdfs::SUB_CLASS_OF,
        &iri(FOOD, "Food")
    )));
    Ok(())
}

/// Answers a single HTTP request with `response` and returns the request head.
fn serve_once(response: String) -> std::io::Result<(String, JoinHandle<String>)> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let address = listener.local_addr()?;
    let handle = thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return String::new();
        };
        let mut head = String::new();
        if let Ok(read) = stream.try_clone() {
            let mut reader = BufReader::new(read);
            let mut line = String::new();
            loop {
                line.clear();
                match reader.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) if line == "\r\n" => break,
                    Ok(_) => head.push_str(&line),
                }
            }
        }
        stream.write_all(response.as_bytes()).ok();
        stream.flush().ok();
        head
    });
    Ok((format!("http://{address}/repositories/food"), handle))
}

fn http_response(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

#[test]
fn remote_server_error_is_a_status_error() -> std::io::Result<()> {
    let (url, handle) = serve_once(http_response(
        "500 Internal Server Error",
        "text/plain",
        "repo offline",
    ))?;
    let result = RemoteEndpoint::new(url)
        .with_timeout(Duration::from_secs(10))
        .select("SELECT ?person WHERE { ?person ?p ?o }");
    match result {
        Err(RemoteQueryError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "repo offline");
        }
        other => panic!("unexpected result {other:?}"),
    }
    handle.join().ok();
    Ok(())
}

#[test]
fn remote_results_are_decoded_into_rows() -> std::io::Result<()> {
    let body = r#"{"head":{"vars":["person","age"]},"results":{"bindings":[
        {"person":{"type":"uri","value":"http://www.semanticweb.org/smcho/ontologies/2026/0/food-ontology#Alice"}},
        {"person":{"type":"uri","value":"http://www.semanticweb.org/smcho/ontologies/2026/0/food-ontology#Bob"},
         "age":{"type":"literal","value":"42","datatype":"http://www.w3.org/2001/XMLSchema#integer"}}
    ]}}"#;
    let (url, handle) = serve_once(http_response(
        "200 OK",
        "application/sparql-results+json",
        body,
    ))?;
    let table = RemoteEndpoint::new(url)
        .select("SELECT ?person WHERE { ?person ?p ?o }")
        .map_err(std::io::Error::other)?;
    assert_eq!(table.variables.len(), 2);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[0].get("age"), None);
    assert_eq!(table.rows[1].value("age"), Some("42"));
    assert_eq!(
        table.column("person").collect::<Vec<_>>(),
        [
            "http://www.semanticweb.org/smcho/ontologies/2026/0/food-ontology#Alice",
            "http://www.semanticweb.org/smcho/ontologies/2026/0/food-ontology#Bob"
        ]
    );

    let head = handle.join().unwrap_or_default().to_ascii_lowercase();
    assert!(head.starts_with("get /repositories/food?query=select"), "{head}");
    assert!(head.contains("accept: application/sparql-results+json"), "{head}");
    assert!(head.contains("user-agent: ontolab/"), "{head}");
    Ok(())
}

#[test]
fn unreachable_endpoint_is_a_transport_error() -> std::io::Result<()> {
    // Bind then drop a listener to get a local port nobody listens on.
    let address = TcpListener::bind("127.0.0.1:0")?.local_addr()?;
    let result = RemoteEndpoint::new(format!("http://{address}/sparql"))
        .with_timeout(Duration::from_secs(5))
        .select("ASK {}");
    assert!(matches!(result, Err(RemoteQueryError::Transport { .. })));
    Ok(())
}
