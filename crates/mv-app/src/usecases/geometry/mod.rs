mod analyze_geometry;

pub use analyze_geometry::{AnalysisReport, AnalyzeGeometry, AnalyzeRequest};
