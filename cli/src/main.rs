mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, check, lookup, power, probe};
use rebootr_core::Verdict;
use terminal::{logging, print};
use tracing::error;

const EXIT_DOWN: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);
    print::banner(commands.quiet);

    match run(commands) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(commands: CommandLine) -> anyhow::Result<ExitCode> {
    let quiet: bool = commands.quiet;

    match commands.command {
        Commands::Check(args) => check::check(args, quiet).map(verdict_code),
        Commands::Probe(args) => probe::probe(args, quiet).map(verdict_code),
        Commands::Power {
            action,
            outlet,
            transport,
        } => {
            print::header("switching outlet", quiet);
            power::power(action, outlet, &transport, quiet)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Lookup { host, record, dns } => {
            print::header("dns lookup", quiet);
            let found: bool = lookup::lookup(&host, record, &dns)?;
            Ok(if found {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_DOWN)
            })
        }
    }
}

fn verdict_code(verdict: Verdict) -> ExitCode {
    if verdict.is_up() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_DOWN)
    }
}
