pub mod ndvi_reader;

pub use ndvi_reader::NdviReader;
