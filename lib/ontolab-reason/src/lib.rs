#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod datatype;
mod error;
mod graph;
mod reasoner;
mod rules;
pub mod vocab;

pub use datatype::{DataRange, Facet, compare_literals, is_well_formed};
pub use error::ReasoningError;
pub use reasoner::{
    ClosureReasoner, ClosureStats, Inconsistency, ReasonerConfig, ReasoningProfile,
};
