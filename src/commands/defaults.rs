// src/commands/defaults.rs
use std::sync::Arc;

use super::exit_cmd::exit_command;
use super::help_cmd::help_command;
use super::registry::Descriptions;
use super::spec::CommandSpec;
use super::types::CommandBundle;

/// Where default commands print their text.
pub type Output = Arc<dyn Fn(&str) + Send + Sync>;

pub fn stdout_output() -> Output {
    Arc::new(|text: &str| print!("{}", text))
}

/// The `help` and `exit` commands every registry can start with.
pub struct DefaultCommands {
    descriptions: Descriptions,
    output: Output,
}

impl DefaultCommands {
    pub fn new(descriptions: Descriptions) -> Self {
        Self::with_output(descriptions, stdout_output())
    }

    pub fn with_output(descriptions: Descriptions, output: Output) -> Self {
        Self { descriptions, output }
    }
}

impl CommandBundle for DefaultCommands {
    fn name(&self) -> &str {
        "defaults"
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            help_command(self.descriptions.clone(), self.output.clone()),
            exit_command(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandError, CommandRegistry};
    use crate::dispatch::{DispatchError, Dispatcher};
    use crate::console::BufferWriter;
    use crate::commands::Outcome;
    use std::sync::Mutex;

    fn capture() -> (Output, Arc<Mutex<String>>) {
        let text = Arc::new(Mutex::new(String::new()));
        let sink = text.clone();
        let output: Output = Arc::new(move |s: &str| sink.lock().unwrap().push_str(s));
        (output, text)
    }

    fn dispatcher(output: Output) -> Dispatcher {
        let mut registry = CommandRegistry::new();
        let defaults = DefaultCommands::with_output(registry.descriptions(), output);
        registry.register_bundle(&defaults, false).unwrap();
        Dispatcher::new(registry).with_notices(BufferWriter::new())
    }

    #[test]
    fn test_help_lists_registered_commands() {
        let (output, text) = capture();
        let mut dispatcher = dispatcher(output);

        assert_eq!(dispatcher.dispatch(&["help"]), Ok(Outcome::Succeeded));
        let printed = text.lock().unwrap().clone();
        assert!(printed.contains("help         | Display all commands."));
        assert!(printed.contains("exit         | Exit the interactive session."));
        assert!(!printed.contains("--force"));
    }

    #[test]
    fn test_help_verbose_lists_options() {
        let (output, text) = capture();
        let mut dispatcher = dispatcher(output);

        dispatcher.dispatch(&["HELP", "--all"]).unwrap();
        assert!(text.lock().unwrap().contains("--force"));
    }

    #[test]
    fn test_exit_requests_termination() {
        let (output, _) = capture();
        let mut dispatcher = dispatcher(output);

        let err = dispatcher.dispatch(&["exit", "-f"]).unwrap_err();
        assert_eq!(
            err,
            DispatchError::Handler {
                command: "exit".to_string(),
                source: CommandError::Exit { code: -1 },
            }
        );
        assert_eq!(err.exit_code(), Some(-1));
    }
}
