//! Command Dispatcher
//!
//! The first token of a command group names the command. The rest are bound
//! into its parameter record before the handler runs, and the handler's
//! result is normalized into an [`Outcome`].

use log::{debug, warn};
use thiserror::Error;

use super::splitter::{split, DEFAULT_DELIMITER};
use crate::commands::spec::InvokeError;
use crate::commands::{CommandError, CommandRegistry, Outcome};
use crate::console::{LineWriter, StderrWriter};
use crate::params::BindError;

/// A dispatch that did not reach a tri-state outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Arguments could not be bound; the handler never ran.
    #[error("command '{command}': {source}")]
    Binding { command: String, source: BindError },

    /// The handler raised an error.
    #[error("command '{command}' raised an error: {source}")]
    Handler { command: String, source: CommandError },
}

impl DispatchError {
    pub fn command(&self) -> &str {
        match self {
            DispatchError::Binding { command, .. } | DispatchError::Handler { command, .. } => command,
        }
    }

    /// Exit code if the handler asked to terminate.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            DispatchError::Handler { source, .. } => source.exit_code(),
            DispatchError::Binding { .. } => None,
        }
    }
}

pub type DispatchResult = Result<Outcome, DispatchError>;

pub struct Dispatcher {
    registry: CommandRegistry,
    delimiter: String,
    notices: Box<dyn LineWriter + Send>,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            delimiter: DEFAULT_DELIMITER.to_string(),
            notices: Box::new(StderrWriter),
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Where "unknown command" notices go. Defaults to stderr.
    pub fn with_notices(mut self, notices: impl LineWriter + Send + 'static) -> Self {
        self.notices = Box::new(notices);
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn into_registry(self) -> CommandRegistry {
        self.registry
    }

    /// Dispatch one command group: `tokens[0]` names the command.
    pub fn dispatch<S: AsRef<str>>(&mut self, tokens: &[S]) -> DispatchResult {
        let Some((head, rest)) = tokens.split_first() else {
            self.notify("empty command");
            return Ok(Outcome::CommandNotFound);
        };

        let name = head.as_ref().to_lowercase();
        let descriptor = match self.registry.resolve(&name) {
            Some(descriptor) => descriptor,
            None => {
                let notice = format!("unknown command: '{}'", head.as_ref());
                if let Err(e) = self.notices.write_line(&notice) {
                    warn!("failed to write notice: {}", e);
                }
                return Ok(Outcome::CommandNotFound);
            }
        };

        let args: Vec<String> = rest.iter().map(|s| s.as_ref().to_string()).collect();
        debug!("dispatching '{}' with {} argument(s)", name, args.len());

        match descriptor.invoke(&args) {
            Ok(success) => Ok(Outcome::from_success(success)),
            Err(InvokeError::Binding(source)) => Err(DispatchError::Binding { command: name, source }),
            Err(InvokeError::Handler(source)) => Err(DispatchError::Handler { command: name, source }),
        }
    }

    /// Split `tokens` on the delimiter and dispatch every group in order.
    ///
    /// A failed group does not stop the chain. A handler error does: it is
    /// the last entry returned.
    pub fn dispatch_multiple<S: AsRef<str>>(&mut self, tokens: &[S]) -> Vec<DispatchResult> {
        let delimiter = self.delimiter.clone();
        let mut results = Vec::new();
        for group in split(tokens, &delimiter) {
            let result = self.dispatch(group);
            let stop = matches!(result, Err(DispatchError::Handler { .. }));
            results.push(result);
            if stop {
                break;
            }
        }
        results
    }

    /// Dispatch a fixed argument vector, splitting it when `multiple` is set.
    pub fn run<S: AsRef<str>>(&mut self, tokens: &[S], multiple: bool) -> Vec<DispatchResult> {
        if multiple {
            self.dispatch_multiple(tokens)
        } else {
            vec![self.dispatch(tokens)]
        }
    }

    fn notify(&mut self, notice: &str) {
        if let Err(e) = self.notices.write_line(notice) {
            warn!("failed to write notice: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandSpec;
    use crate::console::BufferWriter;
    use crate::params::{Arg, NoArgs, Parameters, PrimitiveKind, SchemaBuilder};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct TestArgs {
        verbose: bool,
        flag: bool,
        value: Option<String>,
        count: i64,
    }

    impl Parameters for TestArgs {
        fn declare(schema: &mut SchemaBuilder<Self>) {
            schema
                .flag(Arg::new('f', "flag"), |r| r.flag = true)
                .string(Arg::new('v', "value"), |r, v| r.value = Some(v))
                .integer(Arg::new('c', "count"), |r, v| r.count = v);
        }

        fn verbose(&self) -> bool {
            self.verbose
        }

        fn set_verbose(&mut self, verbose: bool) {
            self.verbose = verbose;
        }
    }

    struct Fixture {
        dispatcher: Dispatcher,
        notices: BufferWriter,
        seen: Arc<Mutex<Vec<TestArgs>>>,
    }

    // 测试用命令集
    fn fixture() -> Fixture {
        let mut registry = CommandRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        registry
            .register(CommandSpec::new::<NoArgs>("always-true").check_with(|_| Ok(true)), false)
            .unwrap();
        registry
            .register(CommandSpec::new::<NoArgs>("always-false").check(|| Ok(false)), false)
            .unwrap();
        registry
            .register(CommandSpec::new::<NoArgs>("fire-and-forget").run(|| Ok(())), false)
            .unwrap();
        registry
            .register(
                CommandSpec::new::<NoArgs>("explode").run(|| Err(CommandError::failed("kaboom"))),
                false,
            )
            .unwrap();

        let sink = seen.clone();
        registry
            .register(
                CommandSpec::new::<TestArgs>("test-data").run_with(move |args| {
                    sink.lock().unwrap().push(args.clone());
                    Ok(())
                }),
                false,
            )
            .unwrap();

        let notices = BufferWriter::new();
        let dispatcher = Dispatcher::new(registry).with_notices(notices.clone());
        Fixture { dispatcher, notices, seen }
    }

    #[test]
    fn test_boolean_handlers() {
        let mut f = fixture();
        assert_eq!(f.dispatcher.dispatch(&["always-true"]), Ok(Outcome::Succeeded));
        assert_eq!(f.dispatcher.dispatch(&["always-false"]), Ok(Outcome::Failed));
    }

    #[test]
    fn test_unit_handler_succeeds() {
        let mut f = fixture();
        assert_eq!(f.dispatcher.dispatch(&["fire-and-forget", "-x"]), Ok(Outcome::Succeeded));
    }

    #[test]
    fn test_unknown_command() {
        let mut f = fixture();
        assert_eq!(f.dispatcher.dispatch(&["i-do-not-exist"]), Ok(Outcome::CommandNotFound));
        assert_eq!(f.notices.lines(), vec!["unknown command: 'i-do-not-exist'".to_string()]);
    }

    #[test]
    fn test_empty_group_is_not_found() {
        let mut f = fixture();
        assert_eq!(f.dispatcher.dispatch::<&str>(&[]), Ok(Outcome::CommandNotFound));
        assert_eq!(f.notices.lines(), vec!["empty command".to_string()]);
    }

    #[test]
    fn test_head_is_case_folded() {
        let mut f = fixture();
        assert_eq!(f.dispatcher.dispatch(&["ALWAYS-TRUE"]), Ok(Outcome::Succeeded));
    }

    #[test]
    fn test_binds_record() {
        let mut f = fixture();
        assert_eq!(f.dispatcher.dispatch(&["test-data", "-f", "-v", "data"]), Ok(Outcome::Succeeded));
        assert_eq!(f.dispatcher.dispatch(&["test-data"]), Ok(Outcome::Succeeded));
        assert_eq!(
            f.dispatcher.dispatch(&["test-data", "--flag", "--value", "data"]),
            Ok(Outcome::Succeeded)
        );

        let seen = f.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            TestArgs { verbose: false, flag: true, value: Some("data".to_string()), count: 0 }
        );
        assert_eq!(seen[1], TestArgs::default());
        assert!(seen[2].verbose && seen[2].flag);
        assert_eq!(seen[2].value.as_deref(), Some("data"));
    }

    #[test]
    fn test_binding_error_skips_handler() {
        let mut f = fixture();
        let err = f.dispatcher.dispatch(&["test-data", "-c", "lots"]).unwrap_err();
        assert_eq!(
            err,
            DispatchError::Binding {
                command: "test-data".to_string(),
                source: BindError::InvalidValue {
                    token: "-c".to_string(),
                    value: "lots".to_string(),
                    expected: PrimitiveKind::Integer,
                },
            }
        );
        assert_eq!(err.command(), "test-data");
        assert!(f.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_handler_error_propagates() {
        let mut f = fixture();
        let err = f.dispatcher.dispatch(&["explode"]).unwrap_err();
        assert_eq!(
            err,
            DispatchError::Handler {
                command: "explode".to_string(),
                source: CommandError::failed("kaboom"),
            }
        );
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_multiple_all_true() {
        let mut f = fixture();
        let line: Vec<&str> = "always-true && always-true".split(' ').collect();
        assert_eq!(
            f.dispatcher.dispatch_multiple(&line),
            vec![Ok(Outcome::Succeeded), Ok(Outcome::Succeeded)]
        );
    }

    #[test]
    fn test_multiple_all_false_does_not_short_circuit() {
        let mut f = fixture();
        let line: Vec<&str> = "always-false && always-false".split(' ').collect();
        assert_eq!(
            f.dispatcher.dispatch_multiple(&line),
            vec![Ok(Outcome::Failed), Ok(Outcome::Failed)]
        );
    }

    #[test]
    fn test_multiple_mixed_groups() {
        let mut f = fixture();
        let line: Vec<&str> = "fire-and-forget && test-data -f -v data && nope && test-data --flag --value data"
            .split(' ')
            .collect();
        assert_eq!(
            f.dispatcher.dispatch_multiple(&line),
            vec![
                Ok(Outcome::Succeeded),
                Ok(Outcome::Succeeded),
                Ok(Outcome::CommandNotFound),
                Ok(Outcome::Succeeded),
            ]
        );
        assert_eq!(f.seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_multiple_stops_after_handler_error() {
        let mut f = fixture();
        let results = f.dispatcher.dispatch_multiple(&["always-true", "&&", "explode", "&&", "always-true"]);
        assert_eq!(results.len(), 2);
        assert!(results[1].is_err());
    }

    #[test]
    fn test_multiple_continues_after_binding_error() {
        let mut f = fixture();
        let results = f.dispatcher.dispatch_multiple(&["test-data", "-c", "x", "&&", "always-true"]);
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], Err(DispatchError::Binding { .. })));
        assert_eq!(results[1], Ok(Outcome::Succeeded));
    }

    #[test]
    fn test_run_modes() {
        let mut f = fixture();
        let tokens = ["always-true", "&&", "always-false"];
        assert_eq!(f.dispatcher.run(&tokens, false), vec![Ok(Outcome::Succeeded)]);
        assert_eq!(
            f.dispatcher.run(&tokens, true),
            vec![Ok(Outcome::Succeeded), Ok(Outcome::Failed)]
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let f = fixture();
        let mut dispatcher = f.dispatcher.with_delimiter(";");
        assert_eq!(dispatcher.delimiter(), ";");
        assert_eq!(
            dispatcher.dispatch_multiple(&["always-true", ";", "always-false"]),
            vec![Ok(Outcome::Succeeded), Ok(Outcome::Failed)]
        );
    }
}
