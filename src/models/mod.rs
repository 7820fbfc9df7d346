pub mod ndvi;

pub use ndvi::{MeasurementTime, NdviRecord, RawNdviRow};
