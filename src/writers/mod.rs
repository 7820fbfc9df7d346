pub mod batch_importer;
pub mod supabase_writer;

pub use batch_importer::{batch_count, BatchImporter, ImportSummary};
pub use supabase_writer::{RecordSink, SupabaseClient};
