//! Interactive Driver
//!
//! Read-eval loop over a [`Dispatcher`]:
//!
//! - `Prompting`: write the prompt, read a line, split it on whitespace
//! - `Dispatching`: dispatch the line (or each `&&` group), report every
//!   non-success, then prompt again or terminate
//! - `Terminated`: no further reads
//!
//! Reads block until a line is available; there is no timeout.

use std::io;

use log::debug;

use crate::commands::{CommandError, Outcome};
use crate::config::DriverConfig;
use crate::console::{LineReader, LineWriter};
use crate::dispatch::{split, DispatchError, DispatchResult, Dispatcher};

/// Why the loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    EndOfInput,
    /// A command did not succeed and break-on-failure is set.
    BrokeOnFailure,
    /// A handler asked to exit with this code.
    Exit(i32),
    /// A handler raised an error.
    Aborted(String),
}

impl Termination {
    /// Process exit code for this termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Termination::EndOfInput => 0,
            Termination::Exit(code) => *code,
            Termination::BrokeOnFailure | Termination::Aborted(_) => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverState {
    Prompting,
    Dispatching(Vec<String>),
    Terminated(Termination),
}

pub struct InteractiveDriver<R, W> {
    dispatcher: Dispatcher,
    reader: R,
    writer: W,
    config: DriverConfig,
    state: DriverState,
}

impl<R: LineReader, W: LineWriter> InteractiveDriver<R, W> {
    pub fn new(dispatcher: Dispatcher, reader: R, writer: W, config: DriverConfig) -> Self {
        let dispatcher = dispatcher.with_delimiter(config.delimiter.clone());
        Self {
            dispatcher,
            reader,
            writer,
            config,
            state: DriverState::Prompting,
        }
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run until the loop terminates.
    pub fn run(&mut self) -> io::Result<Termination> {
        loop {
            if let DriverState::Terminated(reason) = self.step()? {
                return Ok(reason.clone());
            }
        }
    }

    /// Advance the state machine by one transition.
    pub fn step(&mut self) -> io::Result<&DriverState> {
        let state = std::mem::replace(&mut self.state, DriverState::Prompting);
        self.state = match state {
            DriverState::Prompting => self.prompt()?,
            DriverState::Dispatching(tokens) => self.dispatch_line(&tokens)?,
            DriverState::Terminated(reason) => DriverState::Terminated(reason),
        };
        Ok(&self.state)
    }

    fn prompt(&mut self) -> io::Result<DriverState> {
        self.writer.write(&self.config.prompt)?;
        let Some(line) = self.reader.read_line()? else {
            return Ok(DriverState::Terminated(Termination::EndOfInput));
        };

        let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
        if tokens.is_empty() {
            return Ok(DriverState::Prompting);
        }
        Ok(DriverState::Dispatching(tokens))
    }

    fn dispatch_line(&mut self, tokens: &[String]) -> io::Result<DriverState> {
        let delimiter = self.dispatcher.delimiter().to_string();
        let (groups, results): (Vec<&[String]>, Vec<DispatchResult>) = if self.config.allow_multiple {
            (split(tokens, &delimiter).collect(), self.dispatcher.dispatch_multiple(tokens))
        } else {
            (vec![tokens], vec![self.dispatcher.dispatch(tokens)])
        };

        let mut any_failure = false;
        let mut terminated = None;

        for (group, result) in groups.iter().zip(&results) {
            let text = group.join(" ");
            match result {
                Ok(Outcome::Succeeded) => {}
                Ok(outcome) => {
                    any_failure = true;
                    self.writer.write_line(&format!("Command '{}' returned '{}'", text, outcome))?;
                }
                Err(DispatchError::Handler { source: CommandError::Exit { code }, .. }) => {
                    debug!("'{}' requested exit with code {}", text, code);
                    terminated = Some(Termination::Exit(*code));
                }
                Err(err @ DispatchError::Handler { .. }) => {
                    self.writer.write_line(&err.to_string())?;
                    terminated = Some(Termination::Aborted(err.to_string()));
                }
                Err(err @ DispatchError::Binding { .. }) => {
                    any_failure = true;
                    self.writer.write_line(&err.to_string())?;
                }
            }
        }
        self.writer.write_line("")?;

        if let Some(reason) = terminated {
            return Ok(DriverState::Terminated(reason));
        }
        if any_failure && self.config.break_on_failure {
            return Ok(DriverState::Terminated(Termination::BrokeOnFailure));
        }
        Ok(DriverState::Prompting)
    }

    pub fn into_parts(self) -> (Dispatcher, R, W) {
        (self.dispatcher, self.reader, self.writer)
    }
}
