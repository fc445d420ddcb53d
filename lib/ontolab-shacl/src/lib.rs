#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod constraint;
mod error;
mod graph;
mod model;
mod path;
mod report;
mod validator;
pub mod vocab;

pub use constraint::{Constraint, ConstraintComponent, NodeKind, Pattern};
pub use error::{ShaclError, ShaclParseError, ShaclValidationError};
pub use model::{Shape, ShapeId, ShapesGraph, Target};
pub use path::PropertyPath;
pub use report::{Severity, ValidationReport, ValidationResult};
pub use validator::{Inference, MAX_RECURSION_DEPTH, ShaclValidator, ValidationOptions};
