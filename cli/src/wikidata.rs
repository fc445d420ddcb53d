//! Wikidata lessons around entity Q42 (Douglas Adams).

use ontolab::report::banner;
use ontolab::{RemoteEndpoint, ResultRow, ResultTable};
use std::time::Duration;

const ENDPOINT: &str = "https://query.wikidata.org/sparql";
/// Wikidata rejects requests without a descriptive user agent.
const USER_AGENT: &str = concat!("Educational Example/1.0 (ontolab/", env!("CARGO_PKG_VERSION"), ")");
const WIDTH: usize = 70;

const SIMPLE: &str = "PREFIX wd: <http://www.wikidata.org/entity/>
PREFIX wdt: <http://www.wikidata.org/prop/direct/>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
SELECT ?name ?birthDate ?occupation WHERE {
    wd:Q42 rdfs:label ?name ;
        wdt:P569 ?birthDate ;
        wdt:P106 ?occupationEntity .
    ?occupationEntity rdfs:label ?occupation .
    FILTER(LANG(?name) = \"en\")
    FILTER(LANG(?occupation) = \"en\")
}
LIMIT 5";

const BASIC_INFO: &str = "PREFIX wd: <http://www.wikidata.org/entity/>
PREFIX wdt: <http://www.wikidata.org/prop/direct/>
PREFIX wikibase: <http://wikiba.se/ontology#>
PREFIX bd: <http://www.bigdata.com/rdf#>
SELECT ?property ?propertyLabel ?value ?valueLabel WHERE {
    wd:Q42 ?property ?value .
    FILTER(?property IN (wdt:P31, wdt:P106, wdt:P569, wdt:P27))
    SERVICE wikibase:label { bd:serviceParam wikibase:language \"en\" . }
}";

const OCCUPATIONS: &str = "PREFIX wd: <http://www.wikidata.org/entity/>
PREFIX wdt: <http://www.wikidata.org/prop/direct/>
PREFIX wikibase: <http://wikiba.se/ontology#>
PREFIX bd: <http://www.bigdata.com/rdf#>
SELECT ?occupation ?occupationLabel WHERE {
    wd:Q42 wdt:P106 ?occupation .
    SERVICE wikibase:label { bd:serviceParam wikibase:language \"en\" . }
}
ORDER BY ?occupationLabel";

const BIRTH_DETAILS: &str = "PREFIX wd: <http://www.wikidata.org/entity/>
PREFIX wdt: <http://www.wikidata.org/prop/direct/>
PREFIX wikibase: <http://wikiba.se/ontology#>
PREFIX bd: <http://www.bigdata.com/rdf#>
SELECT ?birthDate ?birthPlace ?birthPlaceLabel WHERE {
    wd:Q42 wdt:P569 ?birthDate .
    OPTIONAL { wd:Q42 wdt:P19 ?birthPlace . }
    SERVICE wikibase:label { bd:serviceParam wikibase:language \"en\" . }
}";

const NOTABLE_WORKS: &str = "PREFIX wd: <http://www.wikidata.org/entity/>
PREFIX wdt: <http://www.wikidata.org/prop/direct/>
PREFIX wikibase: <http://wikiba.se/ontology#>
PREFIX bd: <http://www.bigdata.com/rdf#>
SELECT ?work ?workLabel ?publicationDate WHERE {
    ?work wdt:P50 wd:Q42 .
    OPTIONAL { ?work wdt:P577 ?publicationDate . }
    SERVICE wikibase:label { bd:serviceParam wikibase:language \"en\" . }
}
ORDER BY ?publicationDate
LIMIT 10";

/// A lesson step: a title, a query and how to print each row.
struct Lesson {
    title: &'static str,
    query: &'static str,
    print_row: fn(&ResultRow),
}

const LESSONS: [Lesson; 4] = [
    Lesson {
        title: "Douglas Adams Basic Information",
        query: BASIC_INFO,
        print_row: print_property,
    },
    Lesson {
        title: "Douglas Adams Occupations",
        query: OCCUPATIONS,
        print_row: print_occupation,
    },
    Lesson {
        title: "Birth Details",
        query: BIRTH_DETAILS,
        print_row: print_birth,
    },
    Lesson {
        title: "Notable Works",
        query: NOTABLE_WORKS,
        print_row: print_work,
    },
];

fn print_property(row: &ResultRow) {
    let value = row
        .value("valueLabel")
        .or_else(|| row.value("value"))
        .unwrap_or("N/A");
    println!("{}: {value}", row.value("propertyLabel").unwrap_or("N/A"));
}

fn print_occupation(row: &ResultRow) {
    println!("- {}", row.value("occupationLabel").unwrap_or("N/A"));
}

fn print_birth(row: &ResultRow) {
    println!("Born: {}", row.value("birthDate").unwrap_or("N/A"));
    println!("Place: {}", row.value("birthPlaceLabel").unwrap_or("N/A"));
}

fn print_work(row: &ResultRow) {
    // Only the year of the publication date
    let year = row
        .value("publicationDate")
        .map_or("N/A", |date| date.get(..4).unwrap_or(date));
    println!("- {} ({year})", row.value("workLabel").unwrap_or("N/A"));
}

pub fn run(simple: bool) {
    let endpoint = RemoteEndpoint::new(ENDPOINT)
        .with_timeout(Duration::from_secs(30))
        .with_user_agent(USER_AGENT);
    if simple {
        run_simple(&endpoint);
    } else {
        run_full(&endpoint);
    }
}

fn run_simple(endpoint: &RemoteEndpoint) {
    println!(
        "{}\n",
        banner(
            "SIMPLE WIKIDATA TUTORIAL\nLearning semantic web concepts with Douglas Adams",
            WIDTH
        )
    );
    understand_uris();
    understand_triples();

    match query(endpoint, SIMPLE) {
        Ok(table) => {
            println!("=== Simple Query Results ===\n");
            for row in &table.rows {
                let birth = row.value("birthDate").unwrap_or_default();
                println!("Name: {}", row.value("name").unwrap_or_default());
                println!("Birth Date: {}", birth.get(..10).unwrap_or(birth));
                println!("Occupation: {}", row.value("occupation").unwrap_or_default());
                println!();
            }
        }
        Err(error) => {
            println!("Query Error: {error}");
            println!("\nCheck your network connection and that ontolab was built with TLS support.\n");
        }
    }

    println!("{}", "=".repeat(WIDTH));
    println!("Next Steps:");
    println!("1. Try running: ontolab wikidata");
    println!("2. Visit: https://www.wikidata.org/wiki/Q42");
    println!("3. Explore: https://query.wikidata.org/");
    println!("{}", "=".repeat(WIDTH));
}

fn run_full(endpoint: &RemoteEndpoint) {
    println!(
        "{}",
        banner(
            "WIKIDATA EXAMPLE: Douglas Adams\nModeling: 'Douglas Adams was an English writer, born in 1952'",
            WIDTH
        )
    );

    for (i, lesson) in LESSONS.iter().enumerate() {
        let separator = if i == 0 { "" } else { "\n" };
        println!("{separator}=== {} ===\n", lesson.title);
        match query(endpoint, lesson.query) {
            Ok(table) => table.rows.iter().for_each(lesson.print_row),
            Err(error) => {
                println!("Error: {error}");
                println!("Note: the query needs network access to {ENDPOINT}");
            }
        }
    }
    rdf_triples();

    println!("\n{}", "=".repeat(WIDTH));
    println!("Key Takeaways:");
    println!("1. Wikidata uses URIs to identify entities (Q42 for Douglas Adams)");
    println!("2. Properties connect entities to values (P106 for occupation)");
    println!("3. Everything is represented as RDF triples (subject-predicate-object)");
    println!("4. SPARQL queries allow flexible data retrieval");
    println!("5. Entities can have multiple values for the same property");
    println!("{}", "=".repeat(WIDTH));
}

fn query(endpoint: &RemoteEndpoint, query: &str) -> Result<ResultTable, ontolab::Error> {
    endpoint.select(query).map_err(ontolab::Error::from)
}

fn understand_uris() {
    println!("=== Understanding Wikidata URIs ===\n");
    println!("Full URI format:");
    println!("  http://www.wikidata.org/entity/Q42");
    println!("  └─ This is the full web address for Douglas Adams\n");
    println!("Shorthand in SPARQL:");
    println!("  wd:Q42");
    println!("  └─ Much easier to type and read!\n");
    println!("Common prefixes:");
    println!("  wd:     Entities (people, places, things)");
    println!("  wdt:    Properties (relationships)");
    println!("  rdfs:   RDF Schema (labels, descriptions)\n");
    println!("Examples:");
    println!("  wd:Q42       = Douglas Adams (entity)");
    println!("  wdt:P569     = date of birth (property)");
    println!("  wdt:P106     = occupation (property)");
    println!("  wd:Q36180    = writer (entity)\n");
}

fn understand_triples() {
    println!("=== Understanding RDF Triples ===\n");
    println!("Triple Structure:");
    println!("  Subject   - Who/what we're talking about");
    println!("  Predicate - The relationship or property");
    println!("  Object    - The value or another entity\n");
    println!("Sentence: 'Douglas Adams was an English writer, born in 1952'\n");
    println!("Broken into triples:\n");
    for (i, (predicate, object, wikidata)) in [
        ("is a", "human", "wd:Q42 → wdt:P31 → wd:Q5"),
        ("has occupation", "writer", "wd:Q42 → wdt:P106 → wd:Q36180"),
        ("date of birth", "1952-03-11", "wd:Q42 → wdt:P569 → '1952-03-11'"),
        ("country", "United Kingdom", "wd:Q42 → wdt:P27 → wd:Q145"),
    ]
    .into_iter()
    .enumerate()
    {
        println!("Triple {}:", i + 1);
        println!("  Subject:   Douglas Adams");
        println!("  Predicate: {predicate}");
        println!("  Object:    {object}");
        println!("  Wikidata:  {wikidata}\n");
    }
}

fn rdf_triples() {
    println!("\n=== RDF Triple Representation ===\n");
    println!("The sentence 'Douglas Adams was an English writer, born in 1952'");
    println!("is represented as multiple subject-predicate-object triples:\n");
    println!("{:<15} {:<15} {:<30}", "Subject", "Predicate", "Object");
    println!("{}", "-".repeat(60));
    for (subject, predicate, object) in [
        ("wd:Q42", "rdfs:label", "\"Douglas Adams\"@en"),
        ("wd:Q42", "wdt:P31", "wd:Q5"),
        ("wd:Q42", "wdt:P106", "wd:Q36180"),
        ("wd:Q42", "wdt:P27", "wd:Q145"),
        ("wd:Q42", "wdt:P569", "\"1952-03-11\"^^xsd:date"),
    ] {
        println!("{subject:<15} {predicate:<15} {object:<30}");
    }
    println!("\nWhere:");
    println!("  wd:Q42 = Douglas Adams");
    println!("  wdt:P31 = instance of");
    println!("  wdt:P106 = occupation");
    println!("  wdt:P27 = country of citizenship");
    println!("  wdt:P569 = date of birth");
    println!("  wd:Q5 = human");
    println!("  wd:Q36180 = writer");
    println!("  wd:Q145 = United Kingdom");
}
