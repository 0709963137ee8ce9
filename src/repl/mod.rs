//! Interactive conformance browser
//!
//! A readline shell over a [`Session`]:
//! - Command history (persisted across sessions)
//! - Tab completion for commands, child suite names, test names and options
//! - Breadcrumb and history navigation (`.up`, `.crumb`, `.back`, `.forward`)

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::navigation::{FilterOption, SortOption, CONFORMANCE_PATHNAME};
use crate::reconcile::CurrentSuite;
use crate::results::{ResultFetcher, SpecEdition};
use crate::session::{render_view, Session};

/// Browser commands for completion
const BROWSER_COMMANDS: &[&str] = &[
    ".help", ".h", ".ls", ".cd", ".up", ".crumb", ".flag", ".sort", ".filter",
    ".test", ".version", ".versions", ".back", ".forward", ".link", ".url",
    ".exit", ".quit", ".q",
];

/// Browser helper for completion
#[derive(Helper, Hinter, Highlighter, Validator)]
struct BrowserHelper {
    /// Child suite and test names of the current view
    names: Rc<RefCell<Vec<String>>>,
}

impl BrowserHelper {
    fn candidates(&self, command: &str) -> Vec<String> {
        match command {
            ".cd" | ".test" => self.names.borrow().clone(),
            ".sort" => SortOption::ALL.iter().map(|o| o.to_string()).collect(),
            ".filter" => FilterOption::ALL.iter().map(|o| o.to_string()).collect(),
            ".flag" => SpecEdition::ALL.iter().map(|e| e.flag().to_string()).collect(),
            _ => Vec::new(),
        }
    }
}

impl Completer for BrowserHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let line = &line[..pos];
        let (start, word, pool) = match line.split_once(' ') {
            Some((command, arg)) => (command.len() + 1, arg, self.candidates(command)),
            None => (0, line, BROWSER_COMMANDS.iter().map(|c| c.to_string()).collect()),
        };

        let pairs = pool
            .into_iter()
            .filter(|candidate| candidate.starts_with(word))
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

/// Special browser commands
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    Help,
    Exit,
    Ls,
    Cd(String),
    Up(usize),
    Crumb(usize),
    Flag(Option<String>),
    Sort(String),
    Filter(String),
    Test(Option<String>),
    Version(String),
    Versions,
    Back,
    Forward,
    Link,
    Url,
}

impl BrowseCommand {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let rest = input.strip_prefix('.')?;

        let mut parts = rest.splitn(2, ' ');
        let cmd = parts.next()?.to_lowercase();
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty()).map(str::to_string);

        match cmd.as_str() {
            "help" | "h" => Some(Self::Help),
            "exit" | "quit" | "q" => Some(Self::Exit),
            "ls" => Some(Self::Ls),
            "cd" => arg.map(Self::Cd),
            "up" => match arg {
                None => Some(Self::Up(1)),
                Some(n) => n.parse().ok().map(Self::Up),
            },
            "crumb" => arg?.parse().ok().map(Self::Crumb),
            "flag" => Some(Self::Flag(arg)),
            "sort" => arg.map(Self::Sort),
            "filter" => arg.map(Self::Filter),
            "test" => Some(Self::Test(arg)),
            "version" => arg.map(Self::Version),
            "versions" => Some(Self::Versions),
            "back" => Some(Self::Back),
            "forward" => Some(Self::Forward),
            "link" => Some(Self::Link),
            "url" => Some(Self::Url),
            _ => None,
        }
    }
}

/// The browser instance
pub struct Browser<F> {
    session: Session<F>,
    runtime: tokio::runtime::Runtime,
    editor: Editor<BrowserHelper, rustyline::history::DefaultHistory>,
    names: Rc<RefCell<Vec<String>>>,
}

impl<F: ResultFetcher> Browser<F> {
    pub fn new(session: Session<F>) -> std::result::Result<Self, BrowserError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| BrowserError::InitError(e.to_string()))?;

        let mut editor = Editor::new().map_err(|e| BrowserError::InitError(e.to_string()))?;
        let names = Rc::new(RefCell::new(Vec::new()));
        editor.set_helper(Some(BrowserHelper {
            names: Rc::clone(&names),
        }));

        if let Some(ref history_file) = session.config().history_file {
            let _ = editor.load_history(history_file);
        }

        Ok(Self {
            session,
            runtime,
            editor,
            names,
        })
    }

    /// Run the browser until `.exit` or end of input
    pub fn run(&mut self) -> std::result::Result<(), BrowserError> {
        println!("Conformance Explorer v{}", crate::VERSION);
        println!("Type .help for available commands\n");

        let opened = self.runtime.block_on(self.session.open_default());
        self.show(opened);

        loop {
            match self.read_input() {
                Ok(input) => {
                    if input.trim().is_empty() {
                        continue;
                    }
                    match BrowseCommand::parse(&input) {
                        Some(BrowseCommand::Exit) => break,
                        Some(cmd) => self.execute_command(cmd),
                        None => print_error(&format!("unknown command: {}", input.trim())),
                    }
                }
                Err(BrowserError::Interrupted) => {
                    println!("\n(To exit, type .exit or press Ctrl+D)");
                }
                Err(BrowserError::Eof) => {
                    println!("\nGoodbye!");
                    break;
                }
                Err(e) => print_error(&e.to_string()),
            }
        }

        if let Some(ref history_file) = self.session.config().history_file {
            let _ = self.editor.save_history(history_file);
        }
        Ok(())
    }

    fn read_input(&mut self) -> std::result::Result<String, BrowserError> {
        let prompt = self.session.config().prompt.clone();
        match self.editor.readline(&prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(&line);
                Ok(line)
            }
            Err(ReadlineError::Interrupted) => Err(BrowserError::Interrupted),
            Err(ReadlineError::Eof) => Err(BrowserError::Eof),
            Err(e) => Err(BrowserError::IoError(e.to_string())),
        }
    }

    fn execute_command(&mut self, cmd: BrowseCommand) {
        let session = &mut self.session;
        let outcome = match cmd {
            BrowseCommand::Help => {
                print_help();
                return;
            }
            BrowseCommand::Exit => return,
            BrowseCommand::Versions => {
                for version in &session.config().versions {
                    println!("  {}  {}", version.tag_name, version.fetch_url);
                }
                return;
            }
            BrowseCommand::Link => {
                match session.source_url() {
                    Some(link) => println!("{}", link),
                    None => print_error("no results loaded yet"),
                }
                return;
            }
            BrowseCommand::Url => {
                match session.state() {
                    Some(state) => println!("{}?{}", CONFORMANCE_PATHNAME, state.search()),
                    None => print_error("no location yet"),
                }
                return;
            }
            BrowseCommand::Ls => Ok(session.current().cloned()),
            BrowseCommand::Cd(name) => self.runtime.block_on(session.navigate_to_suite(&name)),
            BrowseCommand::Up(levels) => self.runtime.block_on(session.ascend(levels)),
            BrowseCommand::Crumb(index) => self.runtime.block_on(session.slice_nav_to_index(index)),
            BrowseCommand::Flag(flag) => self.runtime.block_on(session.set_ecmascript_flag(flag.as_deref())),
            BrowseCommand::Sort(option) => match option.parse() {
                Ok(option) => self.runtime.block_on(session.set_sort_option(option)),
                Err(e) => Err(e),
            },
            BrowseCommand::Filter(option) => match option.parse() {
                Ok(option) => self.runtime.block_on(session.set_filter_option(option)),
                Err(e) => Err(e),
            },
            BrowseCommand::Test(test) => self.runtime.block_on(session.set_selected_test(test.as_deref())),
            BrowseCommand::Version(tag) => self.runtime.block_on(session.switch_version(&tag)),
            BrowseCommand::Back => self.runtime.block_on(session.back()),
            BrowseCommand::Forward => self.runtime.block_on(session.forward()),
        };
        self.show(outcome);
    }

    fn show(&mut self, outcome: Result<Option<CurrentSuite>>) {
        match outcome {
            Ok(Some(view)) => {
                self.refresh_names(&view);
                print!("{}", render_view(&view, &self.session.config().test262_repo_url));
            }
            Ok(None) => {}
            Err(e) => print_error(&e.to_string()),
        }
    }

    fn refresh_names(&self, view: &CurrentSuite) {
        let mut names = self.names.borrow_mut();
        names.clear();
        if let Some(suite) = view.suite() {
            names.extend(suite.suites.iter().map(|s| s.name.clone()));
            names.extend(suite.tests.iter().map(|t| t.name.clone()));
        }
    }
}

fn print_error(msg: &str) {
    eprintln!("\x1b[31mError:\x1b[0m {}", msg);
}

fn print_help() {
    println!("Available commands:");
    println!("  .ls               Show the current suite");
    println!("  .cd <suite>       Descend into a child suite");
    println!("  .up [n]           Go up n suites (default 1)");
    println!("  .crumb <index>    Keep the first <index> path elements");
    println!("  .flag [es]        Restrict to an ECMAScript edition, or clear");
    println!("  .sort <option>    Sort child suites");
    println!("  .filter <option>  Filter tests by outcome");
    println!("  .test [name]      Select a test, or clear the selection");
    println!("  .version <tag>    Switch result version");
    println!("  .versions         List configured versions");
    println!("  .back, .forward   Move through navigation history");
    println!("  .link             Upstream test262 source link");
    println!("  .url              Shareable location of the current view");
    println!("  .help, .h         Show this help message");
    println!("  .exit, .quit      Exit the browser");
}

/// Browser error types
#[derive(Debug)]
pub enum BrowserError {
    InitError(String),
    IoError(String),
    Interrupted,
    Eof,
}

impl std::fmt::Display for BrowserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InitError(msg) => write!(f, "initialization error: {}", msg),
            Self::IoError(msg) => write!(f, "I/O error: {}", msg),
            Self::Interrupted => write!(f, "interrupted"),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

impl std::error::Error for BrowserError {}
