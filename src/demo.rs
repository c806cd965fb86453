//! Commands bundled with the binary.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use cli_dispatch::commands::Output;
use cli_dispatch::{Arg, CommandBundle, CommandSpec, NoArgs, Parameters, SchemaBuilder};

#[derive(Debug, Default, Clone)]
pub struct GreetArgs {
    pub verbose: bool,
    pub username: Option<String>,
    pub times: i64,
}

impl Parameters for GreetArgs {
    fn declare(schema: &mut SchemaBuilder<Self>) {
        schema
            .string(Arg::new('u', "username").help("Who to greet"), |r, v| r.username = Some(v))
            .integer(Arg::new('n', "times").help("Repeat the greeting"), |r, v| r.times = v);
    }

    fn verbose(&self) -> bool {
        self.verbose
    }

    fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }
}

/// `greet` and `ping` commands.
pub struct DemoCommands {
    greeted: Arc<Mutex<HashMap<String, usize>>>,
    output: Output,
}

impl DemoCommands {
    pub fn new(output: Output) -> Self {
        Self {
            greeted: Arc::new(Mutex::new(HashMap::new())),
            output,
        }
    }
}

impl CommandBundle for DemoCommands {
    fn name(&self) -> &str {
        "demo"
    }

    fn commands(&self) -> Vec<CommandSpec> {
        let greeted = self.greeted.clone();
        let output = self.output.clone();
        let greet = CommandSpec::new::<GreetArgs>("greet")
            .description("Greet a user. -u <name> sets the name.")
            .check_with(move |args| {
                let Some(name) = args.username.as_deref() else {
                    output("Hello, stranger!\n");
                    return Ok(false);
                };

                let mut greeted = greeted.lock().unwrap_or_else(|e| e.into_inner());
                let count = greeted.entry(name.to_string()).or_insert(0);
                *count += 1;

                for _ in 0..args.times.max(1) {
                    output(&format!("Hello, {}!\n", name));
                }
                if args.verbose {
                    output(&format!("({} greeted {} time(s))\n", name, count));
                }
                Ok(true)
            });

        let output = self.output.clone();
        let ping = CommandSpec::new::<NoArgs>("ping")
            .description("Print pong.")
            .run(move || {
                output("pong\n");
                Ok(())
            });

        vec![greet, ping]
    }
}
