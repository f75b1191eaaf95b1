//! deploy-agent - runs build hooks and the start command for an application unit

use clap::Parser;

use deploy_agent::cli::Cli;

#[tokio::main]
async fn main() {
    deploy_agent::logging::init();
    let cli = Cli::parse();
    let ctx = cli.output_context();
    if let Err(e) = cli.run(&ctx).await {
        ctx.error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
