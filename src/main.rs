use std::path::PathBuf;

use clap::Parser;
use cli_dispatch::commands::defaults::stdout_output;
use cli_dispatch::console::{StdinReader, StdoutWriter};
use cli_dispatch::dispatch::DispatchResult;
use cli_dispatch::{CommandRegistry, Dispatcher, DriverConfig, InteractiveDriver, Outcome};

mod demo;

#[derive(Parser)]
#[command(name = "cli-dispatch")]
#[command(about = "Dispatch registered commands from arguments or an interactive prompt")]
#[command(version)]
struct Cli {
    /// Read commands from stdin until end of input or `exit`
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Allow several commands separated by the delimiter (default `&&`)
    #[arg(short = 'm', long = "multiple")]
    multiple: bool,

    /// Stop the interactive loop after the first failed command
    #[arg(short = 'b', long = "break-on-failure")]
    break_on_failure: bool,

    /// Interactive prompt
    #[arg(long = "prompt")]
    prompt: Option<String>,

    /// TOML file with driver options
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Do not register the `help` and `exit` commands
    #[arg(long = "no-defaults")]
    no_defaults: bool,

    /// Report outcomes as JSON (non-interactive runs)
    #[arg(long = "json")]
    json: bool,

    /// Command line to dispatch
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    let mut config = match &cli.config {
        Some(path) => match DriverConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                return 2;
            }
        },
        None => DriverConfig::default(),
    };
    config.allow_multiple |= cli.multiple;
    config.break_on_failure |= cli.break_on_failure;
    config.register_defaults &= !cli.no_defaults;
    if let Some(prompt) = cli.prompt {
        config.prompt = prompt;
    }

    let mut registry = CommandRegistry::new();
    if config.register_defaults {
        if let Err(e) = registry.register_defaults() {
            log::error!("{}", e);
            return 2;
        }
    }
    if let Err(e) = registry.register_bundle(&demo::DemoCommands::new(stdout_output()), false) {
        log::error!("{}", e);
        return 2;
    }

    let dispatcher = Dispatcher::new(registry).with_delimiter(config.delimiter.clone());

    if cli.interactive || cli.args.is_empty() {
        let mut driver = InteractiveDriver::new(dispatcher, StdinReader, StdoutWriter, config);
        return match driver.run() {
            Ok(reason) => reason.exit_code(),
            Err(e) => {
                log::error!("console error: {}", e);
                1
            }
        };
    }

    let mut dispatcher = dispatcher;
    let results = dispatcher.run(&cli.args, config.allow_multiple);
    let groups: Vec<String> = if config.allow_multiple {
        cli_dispatch::split(&cli.args, dispatcher.delimiter())
            .map(|g| g.join(" "))
            .collect()
    } else {
        vec![cli.args.join(" ")]
    };

    if cli.json {
        print_json(&groups, &results);
    } else {
        for (group, result) in groups.iter().zip(&results) {
            match result {
                Ok(Outcome::Succeeded) => {}
                Ok(outcome) => eprintln!("Command '{}' returned '{}'", group, outcome),
                Err(e) if e.exit_code().is_some() => {}
                Err(e) => eprintln!("{}", e),
            }
        }
    }

    exit_code(&results)
}

fn print_json(groups: &[String], results: &[DispatchResult]) {
    let entries: Vec<serde_json::Value> = groups
        .iter()
        .zip(results)
        .map(|(group, result)| match result {
            Ok(outcome) => serde_json::json!({"command": group, "outcome": outcome.as_str()}),
            Err(e) => serde_json::json!({"command": group, "error": e.to_string()}),
        })
        .collect();

    println!(
        "{}",
        serde_json::json!({
            "results": entries,
            "success": results.iter().all(|r| matches!(r, Ok(Outcome::Succeeded))),
        })
    );
}

/// The code requested by `exit` wins; otherwise 0 only if every group succeeded.
fn exit_code(results: &[DispatchResult]) -> i32 {
    if let Some(code) = results.iter().find_map(|r| r.as_ref().err().and_then(|e| e.exit_code())) {
        return code;
    }
    if results.iter().all(|r| matches!(r, Ok(Outcome::Succeeded))) {
        0
    } else {
        1
    }
}
