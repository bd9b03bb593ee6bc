use clap::Parser;

#[tokio::main]
async fn main() {
    if let Err(err) = surety_cli::run(surety_cli::args::Cli::parse()).await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
