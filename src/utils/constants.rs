/// CSV column names
pub const COL_SYSTEM_INDEX: &str = "system:index";
pub const COL_GEO: &str = ".geo";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";
pub const COL_NDVI_VALUE: &str = "ndvi_value";
pub const COL_MEASUREMENT_DATE: &str = "measurement_date";

/// Columns that must be present in the CSV header
pub const REQUIRED_COLUMNS: [&str; 4] = [
    COL_LATITUDE,
    COL_LONGITUDE,
    COL_NDVI_VALUE,
    COL_MEASUREMENT_DATE,
];

/// Fill value written by the exporter for pixels without data
pub const NDVI_SENTINEL: f64 = 99999.0;

/// Remote table defaults
pub const DEFAULT_TABLE: &str = "ndvi_data";
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Supabase credential variables, in lookup order
pub const SUPABASE_URL_VARS: [&str; 2] = ["NEXT_PUBLIC_SUPABASE_URL", "SUPABASE_URL"];
pub const SUPABASE_KEY_VARS: [&str; 2] = ["NEXT_PUBLIC_SUPABASE_ANON_KEY", "SUPABASE_KEY"];

/// Dotenv files tried when no explicit path is given
pub const DEFAULT_ENV_FILES: [&str; 2] = [".env.local", ".env"];

/// Config file and environment prefix
pub const DEFAULT_CONFIG_FILE: &str = "ndvi-importer";
pub const ENV_PREFIX: &str = "NDVI_IMPORTER";
