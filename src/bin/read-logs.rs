use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use visitor_counter::observability::logging;
use visitor_counter::reader;
use visitor_counter::store::{FileStore, Store};

/// Table read when `--table` is not given. Deliberately not taken from `TABLE_NAME`.
const TABLE_NAME: &str = "VisitorCounter";

#[derive(Parser)]
#[command(name = "read-logs")]
#[command(about = "Read visitor logs from the visitor counter table", long_about = None)]
struct Cli {
    /// Number of most recent logs to display
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    limit: Option<u64>,

    /// Table to read
    #[arg(short, long, default_value = TABLE_NAME)]
    table: String,

    /// Directory holding file-backed tables
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_stderr("visitor_counter=warn");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match print_logs(&cli, &mut out).await {
        // A closed pipe (`read-logs | head`) is not a failure.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => Ok(other?),
    }
}

async fn print_logs<W: Write>(cli: &Cli, out: &mut W) -> io::Result<()> {
    let store: Arc<dyn Store> = match FileStore::open_existing(&cli.data_dir, &cli.table).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            reader::report_error(out, &e)?;
            return out.flush();
        }
    };

    reader::run(store, cli.limit.map(|l| l as usize), out).await
}
