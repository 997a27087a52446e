//! Pipeline conversions module
//!
//! This module contains orchestration logic for decoding an image pair, filtering it and
//! encoding the result.

mod explainer;
mod structure_transfer;


pub use explainer::{Explainer, ParameterSummary};
pub use structure_transfer::{StructureTransferPipeline, TransferReport};
