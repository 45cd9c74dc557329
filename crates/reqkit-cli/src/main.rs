use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod req;
mod subject;

/// reqkit command-line tool for certificate signing requests.
#[derive(Parser)]
#[command(name = "reqkit")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a certificate signing request (CSR) from a key and a detached signature.
    Req(req::ReqArgs),
    /// Print the subject of a CSR, or of a raw DER Name at an offset.
    Subject {
        /// Input file (PEM or DER request, or any buffer when --offset is given).
        #[arg(short, long)]
        input: String,
        /// Byte offset of a DER Name inside the input.
        #[arg(long)]
        offset: Option<usize>,
    },
}

fn init_logging() {
    // RUST_LOG overrides; warnings (legacy algorithms) are shown by default
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Req(args) => req::run(args),
        Commands::Subject { input, offset } => subject::run(input, *offset),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
