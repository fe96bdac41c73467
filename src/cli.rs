use clap::Parser;

#[derive(Debug, Clone, Parser)] // requires `derive` feature
#[command(name = "check-maxvalue")]
#[command(
    about = "Check for values in integer-type columns that had reached near maximum value",
    long_about = None
)]
pub struct Cli {
    /// Name of host to connect to
    #[arg(short = 'H', long)]
    pub hostname: Option<String>,

    /// The port to be used when connecting to host
    #[arg(short = 'P', long, default_value_t = 3306)]
    pub port: u16,

    /// The username to be used when connecting to host
    #[arg(short, long)]
    pub user: Option<String>,

    /// The password to be used when connecting to host
    #[arg(short, long)]
    pub password: Option<String>,

    /// A comma-separated list of db names to be inspected
    #[arg(short = 'd', long)]
    pub use_dbs: Option<String>,

    /// A comma-separated list of db names to be ignored
    #[arg(short, long)]
    pub ignore_dbs: Option<String>,

    /// YAML configuration file; its values take precedence over options
    #[arg(short = 'C', long)]
    pub config: Option<String>,

    /// Number of scan workers to spawn
    #[arg(short = 'T', long, default_value_t = 2)]
    pub threads: usize,

    /// Columns to exclude: schema1.table1=col1,col2,colN;schemaN.tableN=colN;...
    #[arg(short, long)]
    pub exclude_columns: Option<String>,

    /// Warning threshold (percent of the column type maximum)
    #[arg(short, long, default_value_t = 100.0)]
    pub warning: f64,

    /// Critical threshold (percent of the column type maximum)
    #[arg(short, long, default_value_t = 100.0)]
    pub critical: f64,

    /// If table row count ratio is less than this value, columns for this
    /// table are excluded from display
    #[arg(long, default_value_t = 50.0)]
    pub row_count_max_ratio: f64,

    /// In a separate section, display columns with high values whose table
    /// row count ratio is below --row-count-max-ratio
    #[arg(long)]
    pub display_row_count_max_ratio_columns: bool,

    /// Scan every integer column, not only keys
    #[arg(long)]
    pub scan_all_columns: bool,

    /// Also scan the leading column of secondary indexes
    #[arg(long)]
    pub secondary_keys: bool,

    /// Results database hostname
    #[arg(long)]
    pub results_host: Option<String>,

    /// Results database port
    #[arg(long)]
    pub results_port: Option<u16>,

    /// Results database username
    #[arg(long)]
    pub results_user: Option<String>,

    /// Results database password
    #[arg(long)]
    pub results_password: Option<String>,

    /// Results database name
    #[arg(long)]
    pub results_database: Option<String>,

    /// Log level filter (overridden by TRACING_LEVEL)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<String>,
}
