//! Purpose: Hold top-level CLI command dispatch for `structsmith`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Command behavior, output envelopes, and exit code semantics stay unchanged.
//! Invariants: Helpers in `main.rs` remain the source of command business logic.

use super::*;

pub(super) fn dispatch_command(command: Command, color_mode: ColorMode) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "structsmith", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_version_output(color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Generate {
            files,
            name,
            sort_fields,
            value_comments,
            derive_default,
            json,
        } => {
            let options = GenerateOptions {
                name,
                sort_fields,
                value_comments,
                derive_default,
            };
            run_generate(&files, &options, json, color_mode)?;
            Ok(RunOutcome::ok())
        }
        Command::Serve {
            bind,
            allow_non_loopback,
            max_body_bytes,
        } => {
            run_serve(&bind, allow_non_loopback, max_body_bytes)?;
            Ok(RunOutcome::ok())
        }
        Command::Workbench => {
            workbench::run()?;
            Ok(RunOutcome::ok())
        }
    }
}
