use anyhow::Result;
use envloadr::{
    cli::{self, Invocation},
    setup_logging,
};

fn main() -> Result<()> {
    let args = cli::utf8_args(std::env::args_os().skip(1))?;
    let schema = cli::default_schema()?;

    match cli::prepare(&args, &schema)? {
        Invocation::Help(text) => {
            println!("{text}");
            Ok(())
        }
        Invocation::Launch { config, command } => {
            setup_logging(config.verbose)?;

            // Only returns if the host process outlived the child
            cli::execute_command(&config, &command)?;
            Ok(())
        }
    }
}
