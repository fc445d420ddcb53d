//! Computer catalog: defined classes against hand-written filters.

use crate::{pause, read_query, select};
use ontolab::report::{banner, local_name, section};
use ontolab::{
    ClosureReasoner, GraphFormat, LocalQueryRunner, Reasoner, ReasoningProfile, ResultTable,
    load_graph,
};
use std::path::Path;

const WIDTH: usize = 70;
const STEPS_WIDTH: usize = 80;

const AFFORDABLE: &str = "PREFIX : <http://example.org/computers#>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
SELECT ?computer WHERE {
    ?computer rdf:type :AffordableComputer .
}
ORDER BY ?computer";

const GAMING: &str = "PREFIX : <http://example.org/computers#>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
SELECT ?computer WHERE {
    ?computer rdf:type :GamingComputer .
}
ORDER BY ?computer";

const EXPLICIT_DATA: &str = "PREFIX : <http://example.org/computers#>
SELECT ?computer ?brand ?model ?price ?ram ?gpu WHERE {
    ?computer a :Laptop ;
        :hasBrand ?brand ;
        :hasModel ?model ;
        :hasPrice ?price ;
        :hasRAM ?ram ;
        :hasGPU ?gpu .
}
ORDER BY ?price";

const AFFORDABLE_GAMING: &str = "PREFIX : <http://example.org/computers#>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
SELECT ?brand ?model ?price ?ram WHERE {
    ?computer rdf:type :AffordableComputer ;
        rdf:type :GamingComputer ;
        :hasBrand ?brand ;
        :hasModel ?model ;
        :hasPrice ?price ;
        :hasRAM ?ram .
}
ORDER BY ?price";

/// Compares the semantic query with the manual `FILTER` query.
pub fn run(data_dir: &Path) -> anyhow::Result<()> {
    println!("\n{}", banner("Ontology Reasoning Demo: Find Affordable Gaming Computers", WIDTH));

    println!("\n1. Loading ontology...");
    let mut graph = load_graph(data_dir.join("computers.ttl"), Some(GraphFormat::TURTLE))?;
    println!("   ✓ Loaded {} triples", graph.len());

    println!("\n2. Applying OWL reasoning...");
    println!("   This infers which computers are AffordableComputer and GamingComputer");
    println!("   based on the OWL class definitions...");
    Reasoner::expand(&ClosureReasoner::new(ReasoningProfile::OwlRl), &mut graph)?;
    println!("   ✓ After reasoning: {} triples (inferred new facts!)", graph.len());

    let runner = LocalQueryRunner::new(&graph)?;
    let semantic = run_query(
        &runner,
        &data_dir.join("query.sparql"),
        "METHOD 1: Semantic Query (using defined classes)",
    )?;
    let manual = run_query(
        &runner,
        &data_dir.join("query_manual.sparql"),
        "METHOD 2: Manual Filter (traditional approach)",
    )?;

    println!("\n{}", banner("Summary", WIDTH));
    if semantic == manual {
        println!("\nBoth methods found {semantic} computers.");
    } else {
        println!("\nThe semantic query found {semantic} computers, the manual filter {manual}.");
    }
    println!("\nKey Difference:");
    println!("  • Method 1: Uses semantic classes (AffordableComputer, GamingComputer)");
    println!("              The ontology KNOWS what these mean!");
    println!("  • Method 2: Uses manual FILTER clauses");
    println!("              Must specify the rules in every query");
    println!("\nAdvantage of Ontology:");
    println!("  → Change definition once in ontology, all queries benefit");
    println!("  → More maintainable and semantically clear");
    println!("  → Can reason about concepts, not just filter data\n");
    Ok(())
}

fn run_query(runner: &LocalQueryRunner, path: &Path, title: &str) -> anyhow::Result<usize> {
    println!("\n{}", banner(title, WIDTH));
    let query = read_query(path)?;

    println!("\n{}", section("Query:", WIDTH));
    for line in query.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            println!("  {line}");
        }
    }

    println!("\n{}", section("Results:", WIDTH));
    let table = select(runner, &query)?;
    if table.is_empty() {
        println!("  No results found.");
    }
    for (i, row) in table.rows.iter().enumerate() {
        println!(
            "\n  {}. {} {}",
            i + 1,
            row.value("brand").unwrap_or_default(),
            row.value("model").unwrap_or_default()
        );
        println!("     Price: ${}", row.value("price").unwrap_or_default());
        println!("     RAM:   {}GB", row.value("ram").unwrap_or_default());
    }
    println!("\n  Total: {} computer(s) found", table.len());
    Ok(table.len())
}

/// Shows the catalog before and after classification.
pub fn run_steps(data_dir: &Path, wait_for_enter: bool) -> anyhow::Result<()> {
    println!("\n{}", banner("Step-by-Step Ontology Reasoning Demo", STEPS_WIDTH));

    println!("\n{}", section("Step 1: Load the ontology", STEPS_WIDTH));
    let mut graph = load_graph(data_dir.join("computers.ttl"), Some(GraphFormat::TURTLE))?;
    println!("Loaded {} triples", graph.len());
    println!("\nThe ontology defines:");
    println!("  • AffordableComputer = Computer with price < 1000");
    println!("  • GamingComputer = Computer with RAM ≥ 16 AND DedicatedGPU");

    println!("\n{}", section("Step 2: Check computers BEFORE reasoning", STEPS_WIDTH));
    let runner = LocalQueryRunner::new(&graph)?;
    let affordable = select(&runner, AFFORDABLE)?.len();
    let gaming = select(&runner, GAMING)?.len();
    println!("AffordableComputers found: {affordable}");
    println!("GamingComputers found: {gaming}");
    if affordable == 0 && gaming == 0 {
        println!("\n✗ No computers classified yet! The data exists but reasoning hasn't happened.");
    }

    println!("\n{}", section("What we DO have (explicit data):", STEPS_WIDTH));
    for (i, row) in select(&runner, EXPLICIT_DATA)?.rows.iter().enumerate() {
        println!(
            "\n{}. {} {}",
            i + 1,
            row.value("brand").unwrap_or_default(),
            row.value("model").unwrap_or_default()
        );
        println!(
            "   Price: ${}, RAM: {}GB",
            row.value("price").unwrap_or_default(),
            row.value("ram").unwrap_or_default()
        );
        println!("   GPU: {}", local_name(row.value("gpu").unwrap_or_default()));
    }

    println!("\n{}", banner("Step 3: Apply OWL Reasoning", STEPS_WIDTH));
    println!("\nThe reasoner will:");
    println!("  1. Read the OWL class definitions");
    println!("  2. Check each computer's properties");
    println!("  3. Infer which computers match the definitions");
    println!("  4. Add new type assertions (triples)");
    if wait_for_enter {
        pause("\nPress Enter to apply reasoning...")?;
    }
    let stats = Reasoner::expand(&ClosureReasoner::new(ReasoningProfile::OwlRl), &mut graph)?;
    println!("\n✓ Reasoning complete! Graph now has {} triples", graph.len());
    println!("  Added {} inferred triples", stats.inferred_triples);

    println!("\n{}", banner("Step 4: Check computers AFTER reasoning", STEPS_WIDTH));
    let runner = LocalQueryRunner::new(&graph)?;
    print_classified(&select(&runner, AFFORDABLE)?, "AffordableComputers");
    print_classified(&select(&runner, GAMING)?, "GamingComputers");

    println!("\n{}", banner("Step 5: Query for Affordable Gaming Computers", STEPS_WIDTH));
    let results = select(&runner, AFFORDABLE_GAMING)?;
    println!("\nFinal Results: {} computer(s)", results.len());
    println!("{}", "-".repeat(STEPS_WIDTH));
    for (i, row) in results.rows.iter().enumerate() {
        println!(
            "\n{}. {} {}",
            i + 1,
            row.value("brand").unwrap_or_default(),
            row.value("model").unwrap_or_default()
        );
        println!("   Price: ${}", row.value("price").unwrap_or_default());
        println!("   RAM: {}GB", row.value("ram").unwrap_or_default());
        println!("   ✓ Affordable (< $1000) AND Gaming (≥16GB + Dedicated GPU)");
    }

    println!("\n{}", banner("Summary: The Power of Ontology Reasoning", STEPS_WIDTH));
    println!("\nWithout reasoning:");
    println!("  ✗ Computers are just data points");
    println!("  ✗ Must manually filter in every query");
    println!("\nWith reasoning:");
    println!("  ✓ Computers are automatically classified");
    println!("  ✓ Query using semantic concepts");
    println!("  ✓ Change definition once, all queries benefit\n");
    Ok(())
}

fn print_classified(table: &ResultTable, class: &str) {
    println!("\n{class} found: {}", table.len());
    for computer in table.column("computer") {
        println!("  • {}", local_name(computer));
    }
}
