use crate::cli::{Args, Command, InferenceArg, LogFormat, ProfileArg};
use anyhow::{Context, bail};
use clap::Parser;
use ontolab::report::{closure_summary, conformance, render_table};
use ontolab::{
    ClosureReasoner, GraphFormat, Inference, LocalQueryRunner, QueryOutcome, Reasoner,
    ReasoningProfile, RemoteEndpoint, ResultTable, ShaclEngine, ValidationOptions,
    ValidationReport, load_graph,
};
use oxigraph::io::RdfSerializer;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write, stdin, stdout};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod computers;
mod diet;
mod food;
mod wikidata;

const DEFAULT_REMOTE_QUERY: &str = "PREFIX food: <http://www.semanticweb.org/smcho/ontologies/2026/0/food-ontology#>

SELECT ?person WHERE {
    ?person food:eats food:Apple .
}";

pub fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_format);
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if let Some(ontolab::Error::MissingCapability { capability, hint }) =
                error.downcast_ref::<ontolab::Error>()
            {
                eprintln!("{capability} support is not compiled into this ontolab binary.");
                eprintln!("Hint: {hint}");
            } else {
                eprintln!("Error: {error:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    match format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let data_dir = args.data_dir;
    match args.command {
        Command::Food => food::run(&data_dir),
        Command::Computers => computers::run(&data_dir),
        Command::ComputersSteps { pause } => computers::run_steps(&data_dir, pause),
        Command::Diet => diet::run(&data_dir),
        Command::DietValidate => diet::validate(&data_dir),
        Command::Validate {
            data,
            shapes,
            inference,
            abort_on_first,
            json,
        } => {
            let data_graph = load_graph(&data, None)?;
            let shapes_graph = match shapes {
                Some(shapes) => load_graph(&shapes, None)?,
                None => data_graph.clone(),
            };
            let engine = ShaclEngine::new(ValidationOptions {
                inference: match inference {
                    InferenceArg::None => Inference::None,
                    InferenceArg::Rdfs => Inference::Rdfs,
                    InferenceArg::Owlrl => Inference::OwlRl,
                },
                abort_on_first,
            });
            let report = engine
                .report(&data_graph, &shapes_graph)
                .with_context(|| format!("Failed to validate {}", data.display()))?;
            if json {
                let mut out = stdout().lock();
                serde_json::to_writer_pretty(&mut out, &JsonReport::from(&report))?;
                writeln!(out)?;
            } else {
                println!("{}", conformance(&report));
            }
            Ok(())
        }
        Command::Reason {
            file,
            format,
            profile,
            output,
        } => {
            let format = format.as_deref().map(str::parse::<GraphFormat>).transpose()?;
            let mut graph = load_graph(&file, format)?;
            let reasoner = ClosureReasoner::new(match profile {
                ProfileArg::Rdfs => ReasoningProfile::Rdfs,
                ProfileArg::Owlrl => ReasoningProfile::OwlRl,
            });
            let stats = Reasoner::expand(&reasoner, &mut graph)?;
            println!("Profile: {}", reasoner.profile());
            println!("{}", closure_summary(&stats));
            if let Some(output) = output {
                let format = GraphFormat::from_path(&output)?;
                let mut writer = RdfSerializer::from_format(format.rdf_format())
                    .for_writer(BufWriter::new(File::create(&output).with_context(|| {
                        format!("Failed to create {}", output.display())
                    })?));
                for triple in &graph {
                    writer.serialize_triple(triple)?;
                }
                close_file_writer(writer.finish()?)?;
                println!("Closure written to {}", output.display());
            }
            Ok(())
        }
        Command::Query {
            file,
            query,
            query_file,
            reason,
        } => {
            let mut graph = load_graph(&file, None)?;
            if reason {
                let stats = Reasoner::expand(
                    &ClosureReasoner::new(ReasoningProfile::OwlRl),
                    &mut graph,
                )?;
                println!("{}\n", closure_summary(&stats));
            }
            let query = query_text(query, query_file.as_deref())?;
            match LocalQueryRunner::new(&graph)?.run(&query)? {
                QueryOutcome::Solutions(table) => {
                    println!("{}", render_table(&table));
                    println!("\n{} result(s)", table.len());
                }
                QueryOutcome::Boolean(value) => println!("{value}"),
                QueryOutcome::Graph(triples) => {
                    for triple in &triples {
                        println!("{triple} .");
                    }
                }
            }
            Ok(())
        }
        Command::RemoteQuery {
            endpoint,
            query,
            query_file,
            timeout,
        } => {
            let query = match (query, query_file) {
                (None, None) => DEFAULT_REMOTE_QUERY.to_owned(),
                (query, query_file) => query_text(query, query_file.as_deref())?,
            };
            let table = RemoteEndpoint::new(endpoint)
                .with_timeout(Duration::from_secs(timeout))
                .select(&query)
                .map_err(ontolab::Error::from)?;
            for row in &table.rows {
                for (variable, _) in row.iter() {
                    if let Some(value) = row.value(variable.as_str()) {
                        println!("{value}");
                    }
                }
            }
            Ok(())
        }
        Command::Wikidata { simple } => {
            wikidata::run(simple);
            Ok(())
        }
    }
}

/// Runs a query that must return solutions.
fn select(runner: &LocalQueryRunner, query: &str) -> anyhow::Result<ResultTable> {
    runner
        .run(query)?
        .into_solutions()
        .context("The query is not a SELECT query")
}

/// Reads a query file whole.
fn read_query(path: &Path) -> anyhow::Result<String> {
    debug!(path = %path.display(), "Reading query file");
    fs::read_to_string(path).with_context(|| format!("Failed to read query file {}", path.display()))
}

fn query_text(query: Option<String>, query_file: Option<&Path>) -> anyhow::Result<String> {
    if let Some(query) = query {
        Ok(query)
    } else if let Some(query_file) = query_file {
        read_query(query_file)
    } else {
        bail!("Either --query or --query-file must be set")
    }
}

fn pause(prompt: &str) -> io::Result<()> {
    let mut out = stdout().lock();
    write!(out, "{prompt}")?;
    out.flush()?;
    stdin().read_line(&mut String::new())?;
    Ok(())
}

fn close_file_writer(writer: BufWriter<File>) -> io::Result<()> {
    let mut file = writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    file.flush()?;
    file.sync_all()
}

#[derive(Serialize)]
struct JsonReport {
    conforms: bool,
    results: Vec<JsonResult>,
}

#[derive(Serialize)]
struct JsonResult {
    focus_node: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    source_shape: String,
    component: String,
    severity: String,
    message: String,
}

impl From<&ValidationReport> for JsonReport {
    fn from(report: &ValidationReport) -> Self {
        Self {
            conforms: report.conforms(),
            results: report
                .results()
                .iter()
                .map(|result| JsonResult {
                    focus_node: result.focus_node.to_string(),
                    path: result.path.as_ref().map(ToString::to_string),
                    value: result.value.as_ref().map(ToString::to_string),
                    source_shape: result.source_shape_label(),
                    component: result.component.to_string(),
                    severity: result.severity.to_string(),
                    message: result.message.clone(),
                })
                .collect(),
        }
    }
}
