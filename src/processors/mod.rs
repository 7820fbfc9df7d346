pub mod integrity_checker;
pub mod pipeline;
pub mod transformer;

pub use integrity_checker::{ImportReport, IntegrityChecker};
pub use pipeline::{import_ndvi_data, ImportPipeline};
pub use transformer::{CoordinatePolicy, NdviTransformer, TransformOutcome};
