//! snipkit CLI - inspect the token stream of snippet templates.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use snipkit::{LexOptions, Position, Token, lex_with};
use tracing::debug;

mod logging;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for token dumps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One token per line.
    Text,
    /// A JSON array of tokens.
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "snipkit",
    version,
    about = "Print the tokens of a snippet template"
)]
struct Cli {
    /// Snippet file to tokenize
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Tokenize snippet text given on the command line
    #[arg(short, long, value_name = "TEXT", conflicts_with = "file")]
    eval: Option<String>,

    /// Indent stripped from continuation lines of Python code
    #[arg(long, default_value = "")]
    indent: String,

    /// Line of the first character (0-indexed)
    #[arg(long, default_value_t = 0)]
    line: usize,

    /// Column of the first character (0-indexed)
    #[arg(long, default_value_t = 0)]
    column: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Start the interactive prompt after tokenizing FILE or TEXT
    #[arg(short, long)]
    interactive: bool,

    /// Log filter, e.g. "debug" or "snipkit::lexer=trace" (overrides RUST_LOG)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    fn options(&self) -> LexOptions {
        LexOptions::new(self.indent.clone(), Position::new(self.line, self.column))
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    logging::init(cli.log_level.as_deref())?;
    let options = cli.options();
    debug!(target: "snipkit::cli", ?options, format = ?cli.format, "Starting");

    if let Some(text) = &cli.eval {
        print_tokens(text, &options, cli.format)?;
    } else if let Some(path) = &cli.file {
        let text = read_file(path)?;
        print_tokens(&text, &options, cli.format)
            .map_err(|e| format!("Error in {}: {}", path.display(), e))?;
    } else {
        return start_repl(&options, cli.format);
    }

    if cli.interactive {
        start_repl(&options, cli.format)?;
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String, String> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()));
    }
    fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))
}

fn print_tokens(text: &str, options: &LexOptions, format: Format) -> Result<(), String> {
    let tokens = lex_with(text, options).map_err(|e| e.to_string())?;
    println!("{}", render(&tokens, format)?);
    Ok(())
}

fn render(tokens: &[Token], format: Format) -> Result<String, String> {
    match format {
        Format::Text => Ok(tokens
            .iter()
            .map(Token::to_string)
            .collect::<Vec<_>>()
            .join("\n")),
        Format::Json => serde_json::to_string_pretty(tokens)
            .map_err(|e| format!("Failed to serialize tokens: {}", e)),
    }
}

fn start_repl(options: &LexOptions, format: Format) -> Result<(), String> {
    println!("snipkit v{} - Type 'exit' or Ctrl+D to quit", VERSION);
    println!();

    let mut rl = DefaultEditor::new().map_err(|e| format!("Failed to create editor: {}", e))?;

    loop {
        match rl.readline("snip> ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "exit" || trimmed == "quit" {
                    println!("Goodbye!");
                    break;
                }

                if trimmed.starts_with('/') {
                    if !handle_command(trimmed) {
                        break;
                    }
                    continue;
                }

                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(line.as_str()).ok(); // Ignore history errors

                if let Err(e) = print_tokens(&line, options, format) {
                    eprintln!("Error: {}", e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(e) => {
                return Err(format!("Readline error: {}", e));
            }
        }
    }

    Ok(())
}

/// Run a `/command`. Returns false when the prompt should close.
fn handle_command(cmd: &str) -> bool {
    let parts: Vec<&str> = cmd[1..].split_whitespace().collect();
    let command = parts.first().map(|s| s.to_lowercase()).unwrap_or_default();

    match command.as_str() {
        "help" => {
            println!(
                r#"
Commands:
  /help     Show this help
  /clear    Clear the screen
  /exit     Exit the prompt

Any other line is tokenized and its tokens printed.
"#
            );
        }
        "clear" => {
            // ANSI escape code to clear screen
            print!("\x1B[2J\x1B[1;1H");
        }
        "exit" | "quit" => {
            return false;
        }
        _ => {
            println!(
                "Unknown command: /{}. Type /help for available commands.",
                command
            );
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("snipkit").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_defaults() {
        let cli = cli(&[]);
        assert!(cli.file.is_none());
        assert!(cli.eval.is_none());
        assert_eq!(cli.format, Format::Text);
        assert_eq!(cli.options(), LexOptions::default());
    }

    #[test]
    fn test_parse_options() {
        let cli = cli(&[
            "-e", "$1", "--indent", "  ", "--line", "3", "--column", "4", "--format", "json",
        ]);
        assert_eq!(cli.eval.as_deref(), Some("$1"));
        assert_eq!(cli.format, Format::Json);
        assert_eq!(cli.options(), LexOptions::new("  ", Position::new(3, 4)));
    }

    #[test]
    fn test_eval_conflicts_with_file() {
        let result = Cli::try_parse_from(["snipkit", "-e", "$1", "snippet.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_render_text() {
        let tokens = lex_with("${1:hi} $1", &LexOptions::default()).unwrap();
        assert_eq!(
            render(&tokens, Format::Text).unwrap(),
            "TabStop(0:0..0:7, 1, \"hi\")\nMirror(0:8..0:10, 1)\nEndOfText(0:10..0:10)"
        );
    }

    #[test]
    fn test_render_json() {
        let tokens = lex_with("$2", &LexOptions::default()).unwrap();
        let json = render(&tokens, Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["kind"], "Mirror");
        assert_eq!(value[0]["number"], 2);
        assert_eq!(value[0]["end"]["column"], 2);
        assert_eq!(value[1]["kind"], "EndOfText");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_file(Path::new("/definitely/not/here.snippets")).unwrap_err();
        assert!(err.starts_with("File not found"));
    }

    #[test]
    fn test_handle_command() {
        assert!(handle_command("/help"));
        assert!(handle_command("/bogus"));
        assert!(!handle_command("/exit"));
    }
}
