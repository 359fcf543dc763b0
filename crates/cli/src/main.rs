use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use comfy_table::Table;
use sqlgate::{
    ClientInfo, Config, Context, HttpMethod, ProfileCounters, ProfileEvent, QueryResult,
    ReadonlyLevel, Session,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "sqlgate")]
#[command(version)]
#[command(about = "Run ClickHouse-style SQL through the sqlgate dispatcher and access gate")]
struct Args {
    /// TOML config with `default_database` and a `[settings]` table
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the readonly level (0, 1 or 2)
    #[arg(long, value_name = "LEVEL")]
    readonly: Option<u8>,

    /// Set allow_ddl = 0
    #[arg(long)]
    no_ddl: bool,

    /// Pretend the client is an HTTP GET request
    #[arg(long)]
    http_get: bool,

    /// SQL to execute; read from stdin when omitted
    #[arg(short, long, value_name = "SQL")]
    query: Option<String>,

    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Print statement counters on exit
    #[arg(long)]
    stats: bool,

    /// Log filter, e.g. `debug` or `sqlgate_executor=debug`
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log: String,
}

fn init_logging(filter: &str) -> anyhow::Result<()> {
    tracing_log::LogTracer::init().ok();
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| anyhow::anyhow!("Invalid log filter '{}': {}", filter, e))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(level) = args.readonly {
        config.settings.readonly = ReadonlyLevel::try_from(level).map_err(anyhow::Error::msg)?;
    }
    if args.no_ddl {
        config.settings.allow_ddl = false;
    }
    Ok(config)
}

fn read_sql(args: &Args) -> anyhow::Result<String> {
    if let Some(query) = &args.query {
        return Ok(query.clone());
    }
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        anyhow::bail!("no --query given and stdin is a terminal");
    }
    let mut sql = String::new();
    stdin.read_to_string(&mut sql)?;
    Ok(sql)
}

fn print_result(result: &QueryResult, format: OutputFormat) -> anyhow::Result<()> {
    if result.schema.is_empty() {
        println!("Ok.");
        return Ok(());
    }
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(result.column_names());
            for row in &result.rows {
                table.add_row(row.iter().map(|v| v.to_string()));
            }
            println!("{table}");
            println!("{} rows in set", result.row_count());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result.to_json())?);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log)?;

    let config = build_config(&args)?;
    let client = if args.http_get {
        ClientInfo::http(HttpMethod::Get, "default")
    } else {
        ClientInfo::native("default")
    };
    let counters = Arc::new(ProfileCounters::new());
    let context = Context::from_config(&config)?
        .with_client_info(client)
        .with_profile_events(counters.clone());
    let session = Session::with_context(Arc::new(context));

    log::debug!(
        "session ready, current database {}",
        session.context().current_database()
    );

    let sql = read_sql(&args)?;
    let statements = sqlgate::Parser::new().parse_sql(&sql)?;
    for statement in &statements {
        match session.execute_statement(statement, &statement.id()) {
            Ok(result) => print_result(&result, args.format)?,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    if args.stats {
        for event in ProfileEvent::ALL {
            eprintln!("{}: {}", event.metric_name(), counters.get(event));
        }
    }
    Ok(())
}
