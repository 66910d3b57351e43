use clap::Parser;
use form_overlay::cli::commands::{cmd_inspect, cmd_run};
use form_overlay::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Run { scenario } => {
            let all_passed = cmd_run(
                &scenario,
                &config.overlay,
                cli.trace.as_deref(),
                cli.verbose,
            )?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Inspect { scenario } => {
            cmd_inspect(&scenario)?;
        }
    }

    Ok(())
}
