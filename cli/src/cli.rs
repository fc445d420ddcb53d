use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "ontolab")]
/// Semantic web tutorials: ontology reasoning, SHACL validation and SPARQL queries
pub struct Args {
    /// Directory holding the tutorial ontologies, shapes and queries
    #[arg(long, global = true, default_value = "data", value_hint = ValueHint::DirPath)]
    pub data_dir: PathBuf,
    /// Format of the diagnostics written to stderr
    ///
    /// Verbosity is controlled with the RUST_LOG environment variable.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Infer which foods are unsafe from the food safety ontology
    ///
    /// Runs the same reasoning on the Turtle and the RDF/XML serializations.
    Food,
    /// Find affordable gaming computers with defined classes and with manual filters
    Computers,
    /// Walk through the classification of the computer catalog step by step
    ComputersSteps {
        /// Wait for Enter before applying the reasoner
        #[arg(long)]
        pause: bool,
    },
    /// Match the restaurant menu with the dietary restrictions of its customers
    Diet,
    /// Validate the diet data against its SHACL shapes
    DietValidate,
    /// Validate a data graph against SHACL shapes
    ///
    /// The exit status is 0 whether the data conforms or not.
    Validate {
        /// File holding the data graph
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        data: PathBuf,
        /// File holding the shapes graph
        ///
        /// By default, the shapes are read from the data graph itself.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        shapes: Option<PathBuf>,
        /// Entailment applied to the data graph before validation
        #[arg(long, value_enum, default_value_t = InferenceArg::Rdfs)]
        inference: InferenceArg,
        /// Stop at the first validation result
        #[arg(long)]
        abort_on_first: bool,
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Compute the closure of an ontology
    Reason {
        /// File holding the ontology
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// The format of the file
        ///
        /// It can be a name like "turtle", an extension like "ttl" or a MIME type like "text/turtle".
        ///
        /// By default, the format is guessed from the file extension.
        #[arg(long)]
        format: Option<String>,
        /// Entailment rules to apply
        #[arg(long, value_enum, default_value_t = ProfileArg::Owlrl)]
        profile: ProfileArg,
        /// File to write the closure to
        ///
        /// The format is guessed from the file extension.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
    /// Run a SPARQL query against a local ontology file
    Query {
        /// File holding the ontology
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// The SPARQL query to execute
        #[arg(short, long, required_unless_present = "query_file", conflicts_with = "query_file")]
        query: Option<String>,
        /// File in which the query is stored
        #[arg(long, value_hint = ValueHint::FilePath)]
        query_file: Option<PathBuf>,
        /// Compute the OWL 2 RL closure before querying
        #[arg(long)]
        reason: bool,
    },
    /// Run a SELECT query against a remote SPARQL endpoint
    RemoteQuery {
        /// URL of the SPARQL endpoint
        #[arg(short, long, default_value = "http://mini23:7200/repositories/food", value_hint = ValueHint::Url)]
        endpoint: String,
        /// The SPARQL query to execute
        ///
        /// By default, asks for the people who eat apples.
        #[arg(short, long, conflicts_with = "query_file")]
        query: Option<String>,
        /// File in which the query is stored
        #[arg(long, value_hint = ValueHint::FilePath)]
        query_file: Option<PathBuf>,
        /// Request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
    /// Learn how Wikidata models "Douglas Adams was an English writer, born in 1952"
    Wikidata {
        /// Only run the introductory lesson
        #[arg(long)]
        simple: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum InferenceArg {
    None,
    Rdfs,
    Owlrl,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ProfileArg {
    Rdfs,
    Owlrl,
}
