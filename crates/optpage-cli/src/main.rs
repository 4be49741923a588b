use clap::Parser;
use optpage_cli::{init_tracing, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli, &mut std::io::stdout().lock())
}
