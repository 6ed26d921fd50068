//! Single-threaded event loop driving the dashboard.
//!
//! Two producers feed one channel: a stdin reader thread (user commands) and
//! load worker threads (finished loads). Only the loop itself touches the
//! [`Dashboard`].

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;

use crate::cli::Args;
use crate::dashboard::{Dashboard, LoadOutcome, LoadTicket, spawn_load};
use crate::db::CredentialStore;
use crate::display::{RenderOptions, render_dashboard, render_json};
use crate::metrics_api::{MetricsClient, MetricsSource};

pub const HELP: &str = "\
Commands:
  key <value>   edit the workspace key (not saved, no reload)
  load          save the workspace key and reload
  refresh       reload with the current key
  select <n>    show details for row n (a bare number works too)
  show          redraw the dashboard
  help          this text
  quit          exit";

#[derive(Debug)]
pub enum Event {
    Input(String),
    InputClosed,
    LoadFinished(LoadOutcome),
}

impl From<LoadOutcome> for Event {
    fn from(outcome: LoadOutcome) -> Self {
        Event::LoadFinished(outcome)
    }
}

/// A parsed user intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetKey(String),
    Load,
    Refresh,
    /// Zero-based row index
    Select(usize),
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Rows are numbered from 1 on screen.
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };
        match word.to_ascii_lowercase().as_str() {
            "key" | "k" => {
                if rest.is_empty() {
                    Err("usage: key <value>".to_string())
                } else {
                    Ok(Command::SetKey(rest.to_string()))
                }
            }
            "load" | "l" | "save" => Ok(Command::Load),
            "refresh" | "r" => Ok(Command::Refresh),
            "select" | "s" => parse_row(rest),
            "show" | "" => Ok(Command::Show),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other if other.chars().all(|c| c.is_ascii_digit()) => parse_row(other),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

fn parse_row(s: &str) -> Result<Command, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(Command::Select(n - 1)),
        _ => Err("usage: select <row number>".to_string()),
    }
}

/// What the loop should do after handling an event
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Redraw,
    /// Output was written; show the prompt again
    Prompt,
    /// Nothing visible changed
    Idle,
    Exit { redraw: bool },
}

struct App<S: MetricsSource + ?Sized + 'static> {
    view: Dashboard,
    source: Arc<S>,
    store: Option<CredentialStore>,
    events: Sender<Event>,
    input_closed: bool,
}

impl<S: MetricsSource + ?Sized + 'static> App<S> {
    fn dispatch(&mut self, ticket: LoadTicket) {
        spawn_load(Arc::clone(&self.source), ticket, self.events.clone());
    }

    fn handle(&mut self, event: Event, out: &mut impl Write) -> Result<Flow> {
        match event {
            Event::LoadFinished(outcome) => {
                if !self.view.apply(outcome) {
                    return Ok(Flow::Idle);
                }
                if self.input_closed && !self.view.is_loading() {
                    return Ok(Flow::Exit { redraw: true });
                }
                Ok(Flow::Redraw)
            }
            Event::InputClosed => {
                self.input_closed = true;
                if self.view.is_loading() {
                    Ok(Flow::Idle)
                } else {
                    Ok(Flow::Exit { redraw: false })
                }
            }
            Event::Input(line) => match Command::parse(&line) {
                Ok(cmd) => self.run_command(cmd, out),
                Err(msg) => {
                    writeln!(out, "{msg}")?;
                    Ok(Flow::Prompt)
                }
            },
        }
    }

    fn run_command(&mut self, cmd: Command, out: &mut impl Write) -> Result<Flow> {
        log::debug!("command {cmd:?}");
        match cmd {
            Command::SetKey(value) => {
                self.view.set_credential(value);
                Ok(Flow::Redraw)
            }
            Command::Load => {
                let ticket = self.view.save_credential(self.store.as_ref());
                self.dispatch(ticket);
                Ok(Flow::Redraw)
            }
            Command::Refresh => {
                let ticket = self.view.begin_load();
                self.dispatch(ticket);
                Ok(Flow::Redraw)
            }
            Command::Select(index) => {
                if self.view.select(index) {
                    Ok(Flow::Redraw)
                } else {
                    writeln!(out, "no row {}", index + 1)?;
                    Ok(Flow::Prompt)
                }
            }
            Command::Show => Ok(Flow::Redraw),
            Command::Help => {
                writeln!(out, "{HELP}")?;
                Ok(Flow::Prompt)
            }
            Command::Quit => Ok(Flow::Exit { redraw: false }),
        }
    }
}

fn spawn_stdin_reader(events: Sender<Event>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if events.send(Event::Input(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    log::warn!("stdin read failed: {e}");
                    break;
                }
            }
        }
        let _ = events.send(Event::InputClosed);
    });
}

fn render_options(args: &Args) -> RenderOptions {
    let width = terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(100);
    RenderOptions {
        color: args.color_enabled(),
        time_fmt: args.time_fmt,
        chart_height: args.chart_height,
        width,
    }
}

fn draw(view: &Dashboard, args: &Args, out: &mut impl Write) -> Result<()> {
    if args.json {
        let json = serde_json::to_string(&render_json(view, args.time_fmt))?;
        writeln!(out, "{json}")?;
    } else {
        write!(out, "{}", render_dashboard(view, &render_options(args)))?;
        write!(out, "> ")?;
    }
    out.flush().context("flush stdout")
}

/// Run the event loop over `events` until the user quits or input ends.
///
/// The initial load is dispatched before the first event is read.
pub fn run_loop<S: MetricsSource + ?Sized + 'static>(
    view: Dashboard,
    source: Arc<S>,
    store: Option<CredentialStore>,
    (tx, rx): (Sender<Event>, Receiver<Event>),
    args: &Args,
    out: &mut impl Write,
) -> Result<Dashboard> {
    let mut app = App {
        view,
        source,
        store,
        events: tx,
        input_closed: false,
    };

    let ticket = app.view.begin_load();
    app.dispatch(ticket);
    if !args.json {
        draw(&app.view, args, out)?;
    }

    while let Ok(event) = rx.recv() {
        match app.handle(event, out)? {
            Flow::Redraw => draw(&app.view, args, out)?,
            Flow::Prompt => {
                if !args.json {
                    write!(out, "> ")?;
                    out.flush()?;
                }
            }
            Flow::Idle => {}
            Flow::Exit { redraw } => {
                if redraw {
                    draw(&app.view, args, out)?;
                }
                break;
            }
        }
    }
    if !args.json {
        writeln!(out)?;
    }
    Ok(app.view)
}

/// Binary entry point: wire the HTTP client, credential store and stdin
pub fn run(args: &Args) -> Result<()> {
    let store = match CredentialStore::open(args.db_path.clone()) {
        Ok(store) => {
            log::debug!("credential store at {}", store.path().display());
            Some(store)
        }
        Err(e) => {
            log::warn!("credential store unavailable, key will not persist: {e:#}");
            None
        }
    };
    let view = Dashboard::from_store(store.as_ref(), &args.default_key);
    let client = Arc::new(MetricsClient::new(&args.base_url));
    log::info!(
        "metrics service {} workspace {}",
        client.base_url(),
        view.credential()
    );

    let (tx, rx) = crossbeam_channel::unbounded();
    spawn_stdin_reader(tx.clone());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_loop(view, client, store, (tx, rx), args, &mut out)?;
    Ok(())
}
