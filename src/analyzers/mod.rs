pub mod ndvi_analyzer;

pub use ndvi_analyzer::{NdviAnalyzer, NdviStatistics};
