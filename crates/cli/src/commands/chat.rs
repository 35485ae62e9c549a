//! `scopedesk chat` — Interactive question panel.
//!
//! Lines starting with `/` are panel commands; anything else is a question
//! for the active identity.

use super::Globals;
use scopedesk_agent::{Panel, Reply};
use scopedesk_core::credential::Credential;
use scopedesk_core::message::Role;
use scopedesk_core::session::Session;
use std::io::Write;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const HELP: &str = concat!(
    "  /users            list identities\n",
    "  /user <name|#>    act as another identity (clears the chat)\n",
    "  /whoami           show the active identity and scope\n",
    "  /view             show the rows you can see\n",
    "  /history          show this conversation\n",
    "  /key <secret>     set the API key for this session\n",
    "  /reset            clear the conversation\n",
    "  /help             this help\n",
    "  exit              quit",
);

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Exit,
    Help,
    Users,
    User(String),
    WhoAmI,
    View,
    History,
    Key(String),
    Reset,
    Question(String),
    Unknown(String),
}

fn is_exit(line: &str) -> bool {
    matches!(line.trim(), "exit" | "quit" | "/exit" | "/quit" | ":q")
}

impl Input {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if is_exit(line) {
            return Some(Self::Exit);
        }
        let Some(command) = line.strip_prefix('/') else {
            return Some(Self::Question(line.to_string()));
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        Some(match (name, arg.is_empty()) {
            ("help", _) => Self::Help,
            ("users", _) => Self::Users,
            ("user", false) => Self::User(arg.to_string()),
            ("whoami", _) => Self::WhoAmI,
            ("view", _) => Self::View,
            ("history", _) => Self::History,
            ("key", false) => Self::Key(arg.to_string()),
            ("reset", _) => Self::Reset,
            _ => Self::Unknown(line.to_string()),
        })
    }
}

/// Map `/user` arguments to a display name: a 1-based index or the name itself.
fn resolve_name(panel: &Panel, arg: &str) -> String {
    if let Ok(index) = arg.parse::<usize>() {
        if let Some(name) = index
            .checked_sub(1)
            .and_then(|i| panel.directory().list().into_iter().nth(i))
        {
            return name;
        }
    }
    arg.to_string()
}

pub async fn run(globals: &Globals, user: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let panel = super::build_panel(globals, &config)?;
    let (mut session, selection) = super::open_session(&panel, globals, user.as_deref());

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║         ScopeDesk — Scoped Question Panel      ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", panel.bridge().provider_name());
    println!("  Model:     {}", panel.bridge().model());
    println!("  Dataset:   {} rows", panel.dataset().len());
    println!();
    if let Some(notice) = selection.notice() {
        println!("  {notice}");
    }
    print_whoami(&session);
    if session.credential().is_none() {
        println!("  API key:   not set (use /key <secret> or --api-key)");
    }
    println!();
    println!("  Ask a question about your students, or /help for commands.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut rx = spawn_line_reader(BufReader::new(io::stdin()));
    prompt()?;

    while let Some(line) = rx.recv().await {
        let Some(input) = Input::parse(&line) else {
            prompt()?;
            continue;
        };

        match input {
            Input::Exit => break,
            Input::Help => println!("{HELP}"),
            Input::Users => print!("{}", super::users::list_identities(panel.directory())),
            Input::User(arg) => {
                let name = resolve_name(&panel, &arg);
                let selection = panel.select(&mut session, &name);
                super::report_selection(&selection, &name);
                if let Some(notice) = selection.notice() {
                    println!("  {notice}");
                }
                print_whoami(&session);
            }
            Input::WhoAmI => print_whoami(&session),
            Input::View => println!("{}", super::view::render_table(session.view())),
            Input::History => print_history(&session),
            Input::Key(secret) => match Credential::new(secret) {
                Some(credential) => {
                    session.set_credential(Some(credential));
                    println!("  🔑 API key set for this session.");
                }
                None => println!("  ⚠️  Empty key ignored."),
            },
            Input::Reset => {
                session.clear_transcript();
                println!("  Chat cleared.");
            }
            Input::Question(question) => {
                eprint!("  ...");
                let reply = panel.ask(&mut session, &question).await;
                eprint!("\r     \r");
                match reply {
                    Reply::Answered(answer) => {
                        println!();
                        for line in answer.lines() {
                            println!("  Assistant > {line}");
                        }
                        println!();
                    }
                    Reply::Refused(refusal) => println!("  ⚠️  {refusal}"),
                }
            }
            Input::Unknown(line) => println!("  Unknown command: {line} (try /help)"),
        }

        prompt()?;
    }

    println!();
    println!("  Goodbye! 👋");
    println!();
    Ok(())
}

/// Forward lines until EOF or an exit word.
///
/// The exit word is forwarded and then reading stops, so no read on stdin is
/// left pending when the runtime shuts down.
fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<String>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(async move {
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let exit = is_exit(&line);
                    if tx.send(line).await.is_err() || exit {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read stdin");
                    break;
                }
            }
        }
    });
    rx
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

fn print_whoami(session: &Session) {
    match session.active() {
        Some(user) => println!(
            "  Acting as: {} [{}], {} row(s) visible",
            user.display_name,
            user.scope,
            session.view().len()
        ),
        None => println!("  Acting as: nobody, no rows visible"),
    }
}

fn print_history(session: &Session) {
    if session.transcript().is_empty() {
        println!("  (no messages yet)");
        return;
    }
    for turn in session.transcript().turns() {
        let who = match turn.role {
            Role::User => "You",
            Role::Assistant => "Assistant",
            Role::System => continue,
        };
        for line in turn.content.lines() {
            println!("  {who} > {line}");
        }
    }
}
