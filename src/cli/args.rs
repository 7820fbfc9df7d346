use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ndvi-importer")]
#[command(about = "Import satellite NDVI CSV exports into a Supabase table")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        help = "Configuration file [default: ./ndvi-importer.toml if present]"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Dotenv file with Supabase credentials [default: ./.env.local, then ./.env]"
    )]
    pub env_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import an NDVI CSV export into the remote table
    Import {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long, help = "Target table [default: ndvi_data]")]
        table: Option<String>,

        #[arg(long, help = "Records per insert request [default: 1000]")]
        chunk_size: Option<usize>,

        #[arg(
            long,
            help = "Drop rows with non-numeric coordinates instead of aborting",
            long_help = "Drop rows whose latitude or longitude is empty, non-numeric or \
                         non-finite (e.g. `NA`), counting them in the report. Without this \
                         flag the first such row aborts the run before anything is \
                         inserted, naming its row and column."
        )]
        skip_invalid_coordinates: bool,

        #[arg(long, help = "Prepare and report without inserting anything")]
        dry_run: bool,

        #[arg(long, help = "Memory-map the input file")]
        mmap: bool,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,
    },

    /// Check an NDVI CSV export without inserting anything
    Validate {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(
            long,
            help = "Drop rows with non-numeric coordinates instead of aborting",
            long_help = "Drop rows whose latitude or longitude is empty, non-numeric or \
                         non-finite (e.g. `NA`), counting them in the report. Without this \
                         flag the first such row aborts the run before anything is \
                         inserted, naming its row and column."
        )]
        skip_invalid_coordinates: bool,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,
    },

    /// Display statistics about the records an NDVI CSV export would produce
    Info {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long, default_value = "5")]
        sample: usize,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_command() {
        let cli = Cli::parse_from([
            "ndvi-importer",
            "--env-file",
            "petal/.env.local",
            "import",
            "-i",
            "ndvi.csv",
            "--chunk-size",
            "500",
            "--dry-run",
        ]);

        assert_eq!(cli.env_file, Some(PathBuf::from("petal/.env.local")));
        match cli.command {
            Commands::Import {
                input,
                table,
                chunk_size,
                dry_run,
                skip_invalid_coordinates,
                ..
            } => {
                assert_eq!(input, PathBuf::from("ndvi.csv"));
                assert_eq!(table, None);
                assert_eq!(chunk_size, Some(500));
                assert!(dry_run);
                assert!(!skip_invalid_coordinates);
            }
            _ => panic!("expected import command"),
        }
    }

    #[test]
    fn test_import_help_explains_coordinate_policy() {
        use clap::CommandFactory;

        let mut cli = Cli::command();
        let import = cli.find_subcommand_mut("import").unwrap();
        let help = import.render_long_help().to_string();

        assert!(help.contains("--skip-invalid-coordinates"));
        assert!(help.contains("`NA`"));
        assert!(help.contains("aborts the run"));
    }

    #[test]
    fn test_global_verbose_after_subcommand() {
        let cli = Cli::parse_from(["ndvi-importer", "validate", "-i", "ndvi.csv", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Validate { .. }));
    }
}
