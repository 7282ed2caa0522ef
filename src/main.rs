use aqm::cli::{self, CliError, SubqueryOptions, UnparseOptions};
use aqm::output::Dialect;
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "aqm")]
#[command(about = "aqm - Inspect and render abstract query model trees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON query tree as query text
    Unparse {
        /// JSON query tree (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Output dialect
        #[arg(short, long, value_enum, default_value_t = DialectArg::Readable)]
        dialect: DialectArg,
    },

    /// List referenced selectors and alias mappings
    Selectors {
        /// JSON query tree (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print every subquery, one per line
    Subqueries {
        /// JSON query tree (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Include subqueries nested inside other subqueries
        #[arg(long)]
        nested: bool,
    },

    /// Parse a full-text search expression and print its terms
    Terms {
        /// The full-text search expression
        expression: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Readable,
    JcrSql2,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Readable => Dialect::Readable,
            DialectArg::JcrSql2 => Dialect::JcrSql2,
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Unparse { input, dialect } => read_input(input).and_then(|input| {
            let options = UnparseOptions {
                input,
                dialect: dialect.into(),
            };
            println!("{}", cli::execute_unparse(&options)?);
            Ok(())
        }),
        Commands::Selectors { input, pretty } => read_input(input).and_then(|input| {
            let report = cli::execute_selectors(input.as_ref())?;
            print_json(&report.to_json(), pretty)
        }),
        Commands::Subqueries { input, nested } => read_input(input).and_then(|input| {
            let options = SubqueryOptions { input, nested };
            for subquery in cli::execute_subqueries(&options)? {
                println!("{}", subquery);
            }
            Ok(())
        }),
        Commands::Terms { expression, pretty } => {
            cli::execute_terms(&expression).and_then(|terms| print_json(&terms, pretty))
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    println!("{}", json);
    Ok(())
}
