pub mod analysis;
pub mod entities;
pub mod requests;
pub mod responses;

pub use analysis::{AnalysisRejection, DocumentAnalysis, parse_analysis};
