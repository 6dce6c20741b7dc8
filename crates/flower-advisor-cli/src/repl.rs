//! Interactive REPL for Flower Advisor.
//!
//! Launch with `flower-advisor repl` (the default command). Type a month,
//! season or flower name to search; `/help` lists commands.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};

use flower_advisor::{flower_image_url, AdvisorSession, ViewState};

use crate::config::resolve_history_path;
use crate::render::{quick_pick, render_landing, render_loading, render_view, QUICK_PICKS};

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/search", "Search a month, season or flower (or just type it)"),
    ("/pick", "Run a quick pick by number"),
    ("/retry", "Fetch the last query again"),
    ("/reset", "Back to the start screen"),
    ("/open", "Toggle details of card N"),
    ("/image", "Show the image URL of card N"),
    ("/state", "Show the current screen"),
    ("/json", "Print current results as JSON"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// REPL helper for tab completion.
#[derive(Default)]
struct AdvisorHelper;

impl Completer for AdvisorHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if input.starts_with('/') && !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        if let Some(args) = input.strip_prefix("/pick ") {
            let prefix_start = input.len() - args.len();
            let matches: Vec<Pair> = QUICK_PICKS
                .iter()
                .enumerate()
                .map(|(i, (label, _))| (format!("{}", i + 1), label))
                .filter(|(n, _)| n.starts_with(args.trim()))
                .map(|(n, label)| Pair {
                    display: format!("{n} {label}"),
                    replacement: format!("{n} "),
                })
                .collect();
            return Ok((prefix_start, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for AdvisorHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for AdvisorHelper {}
impl Validator for AdvisorHelper {}
impl Helper for AdvisorHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Search(String),
    Pick(Option<usize>),
    Retry,
    Reset,
    Open(Option<u32>),
    Image(Option<u32>),
    State,
    Json,
    Clear,
    Help,
    Exit,
    Unknown(String),
}

fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(input) = line.strip_prefix('/') else {
        return Some(Input::Search(line.to_string()));
    };
    if input.is_empty() {
        return Some(Input::Help);
    }

    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    let parsed = match cmd {
        "exit" | "quit" => Input::Exit,
        "help" | "h" | "?" => Input::Help,
        "clear" | "cls" => Input::Clear,
        "search" | "s" => Input::Search(args.to_string()),
        "pick" | "p" => Input::Pick(args.parse().ok()),
        "retry" | "r" => Input::Retry,
        "reset" | "home" => Input::Reset,
        "open" | "o" => Input::Open(args.parse().ok()),
        "image" | "img" => Input::Image(args.parse().ok()),
        "state" => Input::State,
        "json" => Input::Json,
        other => Input::Unknown(other.to_string()),
    };
    Some(parsed)
}

/// Run the interactive REPL against a ready session.
pub async fn run(mut session: AdvisorSession) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{273f}\x1b[0m \x1b[1mflower-advisor v{}\x1b[0m \x1b[90m\u{2014} 뭐 심지?\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!(
        "    Type a query, \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprint!("{}", render_landing());

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<AdvisorHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(AdvisorHelper));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let hist_path = resolve_history_path();
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let prompt = " \x1b[32mplant>\x1b[0m ";

    loop {
        let line = tokio::task::block_in_place(|| rl.readline(prompt));
        match line {
            Ok(line) => {
                let Some(input) = parse_input(&line) else {
                    continue;
                };
                match input {
                    Input::Exit => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    Input::Help => cmd_help(),
                    Input::Clear => eprint!("\x1b[2J\x1b[H"),
                    Input::Search(query) => cmd_search(&mut session, &query).await,
                    Input::Pick(n) => match n.and_then(quick_pick) {
                        Some(query) => cmd_search(&mut session, query).await,
                        None => eprintln!("  Usage: /pick <1-{}>", QUICK_PICKS.len()),
                    },
                    Input::Retry => cmd_retry(&mut session).await,
                    Input::Reset => {
                        session.reset().await;
                        eprint!("{}", render_landing());
                    }
                    Input::Open(rank) => cmd_open(&session, rank).await,
                    Input::Image(rank) => cmd_image(&session, rank).await,
                    Input::State => {
                        let view = session.snapshot().await;
                        eprintln!("  State: {}  Query: {:?}", view.state(), view.query());
                    }
                    Input::Json => cmd_json(&session).await?,
                    Input::Unknown(cmd) => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = std::fs::create_dir_all(hist_path.parent().unwrap_or(std::path::Path::new(".")));
    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Quick picks:");
    for (i, (label, _)) in QUICK_PICKS.iter().enumerate() {
        eprintln!("    {}. {label}", i + 1);
    }
    eprintln!();
    eprintln!("  Tip: a bare 1-2 digit number searches that month, e.g. 7 -> 7월.");
    eprintln!();
}

async fn cmd_search(session: &mut AdvisorSession, query: &str) {
    session.start(query).await;
    settle(session).await;
}

async fn cmd_retry(session: &mut AdvisorSession) {
    if session.retry().await.is_none() {
        eprintln!("  Nothing to retry. Search something first.");
        return;
    }
    settle(session).await;
}

/// Show the loading screen, wait for the request, then render the outcome.
///
/// Ctrl+C while waiting cancels the request and returns to the start screen.
async fn settle(session: &mut AdvisorSession) {
    eprint!("{}", render_loading(&session.snapshot().await));

    let state = tokio::select! {
        state = session.wait() => Some(state),
        _ = tokio::signal::ctrl_c() => None,
    };

    if state.is_none() {
        session.reset().await;
        eprintln!("  \x1b[90m(cancelled)\x1b[0m");
    }

    let view = session.snapshot().await;
    if view.state() == ViewState::Error {
        if let Some(detail) = view.last_failure() {
            tracing::debug!("Last failure: {detail}");
        }
    }
    eprint!("{}", render_view(&view));
}

async fn cmd_open(session: &AdvisorSession, rank: Option<u32>) {
    let Some(rank) = rank else {
        eprintln!("  Usage: /open <rank>");
        return;
    };
    let controller = session.controller();
    let mut view = controller.lock().await;
    match view.toggle_details(rank) {
        Some(_) => eprint!("{}", render_view(&view)),
        None => eprintln!("  No card with rank {rank}."),
    }
}

async fn cmd_image(session: &AdvisorSession, rank: Option<u32>) {
    let Some(rank) = rank else {
        eprintln!("  Usage: /image <rank>");
        return;
    };
    let view = session.snapshot().await;
    match view.flowers().iter().find(|f| f.rank == rank) {
        Some(flower) => eprintln!("  {}", flower_image_url(flower)),
        None => eprintln!("  No card with rank {rank}."),
    }
}

async fn cmd_json(session: &AdvisorSession) -> anyhow::Result<()> {
    let view = session.snapshot().await;
    if view.state() != ViewState::Results {
        eprintln!("  No results yet.");
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(view.flowers())?);
    Ok(())
}
