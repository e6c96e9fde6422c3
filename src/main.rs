//! Purpose: `structsmith` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, runs commands, prints generated code on stdout.
//! Invariants: Generated Rust source goes to stdout; diagnostics go to stderr.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
#![allow(clippy::result_large_err)]
use std::ffi::OsString;
use std::io::{self, IsTerminal, Read};
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand, ValueEnum, ValueHint,
    error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;

mod color_rust;
mod command_dispatch;
mod serve;
mod workbench;

use color_rust::colorize_rust;
use structsmith::api::{
    Error, ErrorKind, FALLBACK_TYPE, GenerateOptions, Generator, Renderer, StructDef,
    structs_from_file, to_exit_code,
};

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_MAX_BODY_BYTES: u64 = 1024 * 1024;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                let message = clap_error_summary(&err);
                let hint = clap_error_hint(&err);
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(message)
                        .with_hint(hint),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;

    let result = command_dispatch::dispatch_command(cli.command, color_mode);

    result
        .map_err(add_parse_hint)
        .map_err(add_io_hint)
        .map_err(add_internal_hint)
        .map_err(|err| (err, color_mode))
}

fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let replacement = arg.to_str().and_then(|value| match value {
                "---help" => Some("--help"),
                "---version" => Some("--version"),
                _ => None,
            });
            replacement.map(OsString::from).unwrap_or_else(|| arg)
        })
        .collect()
}

#[derive(Parser)]
#[command(
    name = "structsmith",
    version,
    about = "Generate Rust struct definitions from example JSON",
    help_template = r#"{about-with-newline}
{before-help}USAGE
  {usage}

COMMANDS
{subcommands}

OPTIONS
{options}

{after-help}
"#,
    long_about = None,
    before_help = r#"Feed it example JSON, get serde-ready Rust structs.

Mental model:
  - `generate` converts files or piped JSON on the command line
  - `serve` hosts the converter as a local web page
  - `workbench` is the converter as an interactive terminal app
"#,
    after_help = r#"EXAMPLES
  $ structsmith generate api_response.json
  $ curl -s https://api.example.com/user | structsmith generate
  $ structsmith generate --name Payload --value-comments event.json
  $ structsmith serve
  $ structsmith workbench

LEARN MORE
  $ structsmith <command> --help"#,
    arg_required_else_help = true,
    disable_help_subcommand = false
)]
#[derive(Debug)]
struct Cli {
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics and generated code: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Generate struct definitions from JSON files or stdin",
        long_about = r#"Infer Rust struct definitions from example JSON documents.

Objects become structs, arrays of objects are merged (fields missing from
some elements become Option), and nested values get definitions of their own.
Reads stdin when no files are given."#,
        after_help = r#"EXAMPLES
  $ structsmith generate api_response.json
  $ structsmith generate --name Payload --sort-fields false event.json
  $ curl -s https://api.example.com/user | structsmith generate --value-comments
  $ structsmith generate first.json second.json

NOTES
  - The base type name comes from the file name; override it with --name
  - Several JSON documents in one input yield Name, Name2, Name3, ...
  - Empty arrays are typed Vec<String>; refine them by hand if needed"#
    )]
    Generate {
        #[arg(
            help = "JSON files to read (stdin when omitted)",
            value_hint = ValueHint::FilePath
        )]
        files: Vec<PathBuf>,
        #[arg(long, help = "Base type name (default: from the file name, or `Generated`)")]
        name: Option<String>,
        #[arg(
            long,
            default_value_t = true,
            action = ArgAction::Set,
            help = "Sort fields alphabetically: true|false"
        )]
        sort_fields: bool,
        #[arg(long, help = "Append example values as comments")]
        value_comments: bool,
        #[arg(long, help = "Add Default to the derive list")]
        derive_default: bool,
        #[arg(long, help = "Emit a JSON envelope instead of plain source")]
        json: bool,
    },
    #[command(
        about = "Serve the converter as a local web page",
        long_about = r#"Serve a browser UI for the converter.

The page posts example JSON to the server and swaps the generated code into
the output pane, highlighted client-side."#,
        after_help = r#"EXAMPLES
  $ structsmith serve
  $ structsmith serve --bind 127.0.0.1:9000

NOTES
  - Binds loopback only; pass --allow-non-loopback to expose it
  - Request bodies above --max-body-bytes are rejected"#
    )]
    Serve {
        #[arg(
            long,
            default_value = DEFAULT_BIND,
            help = "Address to bind (host:port)"
        )]
        bind: String,
        #[arg(
            long,
            help = "Allow binding non-loopback addresses",
            help_heading = "Safety"
        )]
        allow_non_loopback: bool,
        #[arg(
            long,
            default_value_t = DEFAULT_MAX_BODY_BYTES,
            help = "Max request body size in bytes",
            help_heading = "Safety"
        )]
        max_body_bytes: u64,
    },
    #[command(
        about = "Convert JSON interactively in the terminal",
        long_about = r#"Open an interactive terminal workbench.

Type or paste JSON on the left, convert with Ctrl-R, and copy the generated
code to the system clipboard with Ctrl-Y."#,
        after_help = r#"KEYS
  Ctrl-R        convert the current input
  Ctrl-Y        copy the generated code to the clipboard
  Tab           switch pane focus
  F2 / F3 / F4  toggle sort fields / value comments / derive Default
  Ctrl-L        clear the input
  Ctrl-C, Esc   quit"#
    )]
    Workbench,
    #[command(
        about = "Print version information",
        after_help = r#"EXAMPLES
  $ structsmith version"#
    )]
    Version,
    #[command(
        arg_required_else_help = true,
        about = "Generate shell completions",
        long_about = r#"Generate shell completion scripts.

Prints a completion script for the given shell to stdout.
Install the generated file in your shell's completion directory (or source it)
to enable tab completion."#,
        after_help = r#"EXAMPLES
  $ structsmith completion bash > ~/.local/share/bash-completion/completions/structsmith
  $ source ~/.bashrc
  $ structsmith completion zsh > ~/.zfunc/_structsmith
  $ structsmith completion fish > ~/.config/fish/completions/structsmith.fish"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn run_generate(
    files: &[PathBuf],
    options: &GenerateOptions,
    json_output: bool,
    color_mode: ColorMode,
) -> Result<(), Error> {
    let defs = if files.is_empty() {
        let input = read_stdin_input()?;
        let base = options.name.clone().unwrap_or_else(|| FALLBACK_TYPE.to_string());
        Generator::new(options.clone()).structs_from_str(&base, &input)?
    } else {
        let mut defs: Vec<StructDef> = Vec::new();
        for file in files {
            defs.extend(structs_from_file(options, file)?);
        }
        defs
    };

    let code = Renderer::new(options).render(&defs);

    if json_output {
        emit_json(
            json!({
                "structs": defs.len(),
                "code": code,
            }),
            color_mode,
        );
        return Ok(());
    }

    let use_color = color_mode.use_color(io::stdout().is_terminal());
    print!("{}", colorize_rust(&code, use_color));
    Ok(())
}

fn read_stdin_input() -> Result<String, Error> {
    if io::stdin().is_terminal() {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("missing input")
            .with_hint("Pass one or more JSON files, or pipe JSON to stdin."));
    }
    let mut input = String::new();
    io::stdin().read_to_string(&mut input).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read stdin")
            .with_source(err)
    })?;
    Ok(input)
}

fn run_serve(bind: &str, allow_non_loopback: bool, max_body_bytes: u64) -> Result<(), Error> {
    let bind: SocketAddr = bind.parse().map_err(|_| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("invalid bind address `{bind}`"))
            .with_hint("Use host:port, for example 127.0.0.1:8080.")
    })?;
    let config = serve::ServeConfig {
        bind,
        allow_non_loopback,
        max_body_bytes,
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to start async runtime")
                .with_source(err)
        })?;
    runtime.block_on(serve::serve(config))
}

fn add_parse_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Parse || err.hint().is_some() {
        return err;
    }
    err.with_hint("Check the JSON syntax near the reported position.")
}

fn add_io_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Io || err.hint().is_some() {
        return err;
    }
    err.with_hint("I/O error. Check the path, filesystem, and disk space.")
}

fn add_internal_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Internal || err.hint().is_some() {
        return err;
    }
    err.with_hint(
        "Unexpected internal failure. Retry with RUST_BACKTRACE=1 and share command/context if it persists.",
    )
}

fn emit_version_output(color_mode: ColorMode) {
    if io::stdout().is_terminal() {
        println!("structsmith {}", env!("CARGO_PKG_VERSION"));
    } else {
        emit_json(
            json!({
                "name": "structsmith",
                "version": env!("CARGO_PKG_VERSION"),
            }),
            color_mode,
        );
    }
}

fn emit_json(value: serde_json::Value, color_mode: ColorMode) {
    let is_tty = io::stdout().is_terminal();
    let pretty = is_tty || color_mode.use_color(is_tty);
    let json = if pretty {
        serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    } else {
        serde_json::to_string(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    };
    println!("{json}");
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::Parse => "invalid json".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(path) = err.path() {
        lines.push(format!(
            "{} {}",
            colorize_label("path:", use_color, AnsiColor::Yellow),
            path.display()
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

fn clap_error_hint(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let usage = rendered
        .lines()
        .find_map(|line| line.trim().strip_prefix("Usage: "))
        .map(str::trim);

    let Some(usage) = usage else {
        return "Try `structsmith --help`.".to_string();
    };

    let tokens: Vec<&str> = usage.split_whitespace().collect();
    let Some(pos) = tokens.iter().position(|t| *t == "structsmith") else {
        return "Try `structsmith --help`.".to_string();
    };

    let mut parts = Vec::new();
    for token in tokens.iter().skip(pos + 1) {
        if token.starts_with('-') || token.starts_with('<') || token.starts_with('[') {
            break;
        }
        parts.push(*token);
    }

    if parts.is_empty() {
        return "Try `structsmith --help`.".to_string();
    }

    format!("Try `structsmith {} --help`.", parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args.iter().map(OsString::from))
    }

    #[test]
    fn normalize_args_rewrites_triple_dash_help() {
        let args = normalize_args(vec![
            OsString::from("structsmith"),
            OsString::from("---help"),
            OsString::from("---version"),
            OsString::from("generate"),
        ]);
        assert_eq!(
            args,
            vec![
                OsString::from("structsmith"),
                OsString::from("--help"),
                OsString::from("--version"),
                OsString::from("generate"),
            ]
        );
    }

    #[test]
    fn generate_defaults_sort_fields_on() {
        let cli = parse(&["structsmith", "generate", "input.json"]).expect("cli");
        match cli.command {
            Command::Generate {
                files,
                sort_fields,
                value_comments,
                derive_default,
                json,
                name,
            } => {
                assert_eq!(files, vec![PathBuf::from("input.json")]);
                assert!(sort_fields);
                assert!(!value_comments);
                assert!(!derive_default);
                assert!(!json);
                assert_eq!(name, None);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn generate_sort_fields_takes_an_explicit_value() {
        let cli = parse(&["structsmith", "generate", "--sort-fields", "false", "x.json"])
            .expect("cli");
        match cli.command {
            Command::Generate { sort_fields, .. } => assert!(!sort_fields),
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn serve_defaults_to_loopback_bind() {
        let cli = parse(&["structsmith", "serve"]).expect("cli");
        match cli.command {
            Command::Serve {
                bind,
                allow_non_loopback,
                max_body_bytes,
            } => {
                assert_eq!(bind, DEFAULT_BIND);
                assert!(!allow_non_loopback);
                assert_eq!(max_body_bytes, DEFAULT_MAX_BODY_BYTES);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn error_text_respects_color_flag() {
        let err = Error::new(ErrorKind::Usage).with_message("bad input");
        let colored = error_text(&err, true);
        let plain = error_text(&err, false);
        assert!(colored.contains("\u{1b}[31merror:\u{1b}[0m"));
        assert!(plain.contains("error:"));
        assert!(!plain.contains("\u{1b}["));
    }

    #[test]
    fn error_json_carries_hint_path_and_causes() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = Error::new(ErrorKind::Io)
            .with_message("failed to read input file")
            .with_hint("Check the path.")
            .with_path("input.json")
            .with_source(io_err);
        let value = error_json(&err);
        assert_eq!(value["error"]["kind"], "Io");
        assert_eq!(value["error"]["message"], "failed to read input file");
        assert_eq!(value["error"]["hint"], "Check the path.");
        assert_eq!(value["error"]["path"], "input.json");
        assert_eq!(value["error"]["causes"][0], "disk on fire");
    }

    #[test]
    fn error_message_falls_back_by_kind() {
        assert_eq!(error_message(&Error::new(ErrorKind::Parse)), "invalid json");
        assert_eq!(error_message(&Error::new(ErrorKind::Usage)), "usage error");
        assert_eq!(
            error_message(&Error::new(ErrorKind::Internal)),
            "internal error"
        );
    }

    #[test]
    fn parse_hint_is_added_once() {
        let err = add_parse_hint(Error::new(ErrorKind::Parse).with_message("bad"));
        assert_eq!(
            err.hint(),
            Some("Check the JSON syntax near the reported position.")
        );

        let err = add_parse_hint(
            Error::new(ErrorKind::Parse).with_hint("existing hint"),
        );
        assert_eq!(err.hint(), Some("existing hint"));

        let err = add_parse_hint(Error::new(ErrorKind::Usage));
        assert_eq!(err.hint(), None);
    }

    #[test]
    fn clap_error_hint_points_at_the_subcommand() {
        let err = parse(&["structsmith", "generate", "--bogus"]).expect_err("clap err");
        assert_eq!(clap_error_hint(&err), "Try `structsmith generate --help`.");
    }

    #[test]
    fn clap_error_summary_strips_error_prefix() {
        let err = parse(&["structsmith", "generate", "--bogus"]).expect_err("clap err");
        let summary = clap_error_summary(&err);
        assert!(!summary.starts_with("error:"), "{summary}");
        assert!(summary.contains("--bogus"), "{summary}");
    }

    #[test]
    fn invalid_bind_is_a_usage_error() {
        let err = run_serve("not-an-addr", false, 1024).expect_err("usage error");
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(err.hint().is_some());
    }
}
