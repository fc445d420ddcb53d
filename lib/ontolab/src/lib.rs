#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod capability;
mod error;
mod load;
mod query;
mod remote;
pub mod report;

pub use capability::{Conformance, Reasoner, ShaclEngine, ShapeValidator};
pub use error::{Error, ParseError, QueryError, RemoteQueryError};
pub use load::{GraphFormat, load_graph, parse_graph};
pub use ontolab_reason::{ClosureReasoner, ClosureStats, ReasonerConfig, ReasoningProfile};
pub use ontolab_shacl::{Inference, ValidationOptions, ValidationReport};
pub use query::{LocalQueryRunner, QueryOutcome, ResultRow, ResultTable};
pub use remote::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, RemoteEndpoint};
