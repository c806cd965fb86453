use super::spec::CommandSpec;
use super::types::{CommandError, HandlerResult};
use crate::params::ForceArgs;

/// Exit code requested by `exit -f`.
pub const FORCED_EXIT_CODE: i32 = -1;

/// `exit`: stop the session.
///
/// - `exit` requests a clean exit (code 0)
/// - `exit -f` requests exit code -1
/// - a forced exit with verbose on (`exit --force`) fails the command with
///   an error instead, which aborts an interactive session
pub fn exit_command() -> CommandSpec {
    CommandSpec::new::<ForceArgs>("exit")
        .description("Exit the interactive session. -f exits with an error code.")
        .check_with(exit)
}

fn exit(args: &ForceArgs) -> HandlerResult<bool> {
    match (args.force, args.verbose) {
        (true, false) => Err(CommandError::Exit { code: FORCED_EXIT_CODE }),
        (true, true) => Err(CommandError::failed("forced an exit")),
        (false, _) => Err(CommandError::Exit { code: 0 }),
    }
}
