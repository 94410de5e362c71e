use clap::Parser;
use tracing::error;

use retireplan::cli::{Cli, Command, render_compare, render_pv};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    retireplan::logging::init_logging(&cli.log_level);

    let rendered = match cli.command {
        Command::Serve(args) => {
            if let Err(e) = retireplan::api::run_http_server(args.port).await {
                error!(error = %e, "server error");
                std::process::exit(1);
            }
            return;
        }
        Command::Compare(args) => render_compare(&args),
        Command::Pv(args) => render_pv(&args),
    };

    match rendered {
        Ok(out) => print!("{out}"),
        Err(e) => {
            error!(error = %e, "calculation failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
