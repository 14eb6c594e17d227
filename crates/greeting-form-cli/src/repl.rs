//! Interactive mode.
//!
//! Every plain line is typed into the name field and submitted without
//! waiting for the previous submission, so replies can arrive out of order.
//! Lines starting with `/` are commands.

use std::sync::Arc;

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Config, Editor, Helper};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use greeting_form::FormDispatcher;

const COMMANDS: &[(&str, &str)] = &[
    ("/show", "Show the current greeting text"),
    ("/wait", "Wait for in-flight submissions"),
    ("/help", "Show available commands"),
    ("/exit", "Quit"),
];

#[derive(Default)]
struct FormHelper;

impl Completer for FormHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];
        if !input.starts_with('/') || input.contains(' ') {
            return Ok((pos, Vec::new()));
        }

        let matches = COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| Pair {
                display: format!("{cmd:<8} {desc}"),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, matches))
    }
}

impl Hinter for FormHelper {
    type Hint = String;
}
impl Highlighter for FormHelper {}
impl Validator for FormHelper {}
impl Helper for FormHelper {}

/// Run the interactive loop on a blocking thread.
pub fn run(dispatcher: FormDispatcher, handle: Handle) -> anyhow::Result<()> {
    let dispatcher = Arc::new(dispatcher);

    eprintln!();
    eprintln!(
        "  greeting-form v{} \u{00b7} posting to {}{}",
        env!("CARGO_PKG_VERSION"),
        dispatcher.config().base_url,
        dispatcher.config().endpoint
    );
    eprintln!("  Type a name and press Enter to submit. /help for commands.");
    eprintln!();

    let config = Config::builder()
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .build();
    let mut rl: Editor<FormHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(FormHelper));

    let mut in_flight: Vec<JoinHandle<()>> = Vec::new();

    loop {
        match rl.readline(" name> ") {
            Ok(line) => match line.trim().to_string().as_str() {
                "/exit" | "/quit" => break,
                "/help" => cmd_help(),
                "/show" => {
                    let text = handle.block_on(dispatcher.display_text());
                    eprintln!("  greeting: {}", text.unwrap_or_default());
                }
                "/wait" => wait_all(&handle, &mut in_flight),
                cmd if cmd.starts_with('/') => {
                    eprintln!("  Unknown command '{cmd}'. Type /help for commands.");
                }
                // Sent as typed; the line itself is not trimmed.
                _ => submit(&dispatcher, &handle, line, &mut in_flight),
            },
            Err(ReadlineError::Interrupted) => {
                eprintln!("  (Ctrl+C) Type /exit to quit.");
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    wait_all(&handle, &mut in_flight);
    Ok(())
}

fn submit(
    dispatcher: &Arc<FormDispatcher>,
    handle: &Handle,
    value: String,
    in_flight: &mut Vec<JoinHandle<()>>,
) {
    in_flight.retain(|task| !task.is_finished());

    let submission = match handle.block_on(dispatcher.submit_with(value)) {
        Ok(submission) => submission,
        Err(e) => {
            eprintln!("  Cannot submit: {e}");
            return;
        }
    };

    let dispatcher = Arc::clone(dispatcher);
    in_flight.push(handle.spawn(async move {
        let id = submission.id;
        match submission.wait().await {
            Ok(()) => {
                let text = dispatcher.display_text().await.unwrap_or_default();
                eprintln!("  [{id}] greeting: {text}");
            }
            Err(e) => eprintln!("  [{id}] failed: {e}"),
        }
    }));
}

fn wait_all(handle: &Handle, in_flight: &mut Vec<JoinHandle<()>>) {
    for task in in_flight.drain(..) {
        let _ = handle.block_on(task);
    }
}

fn cmd_help() {
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<8} {desc}");
    }
    eprintln!();
}
