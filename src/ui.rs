// UI layer: the terminal prompts the session loop talks through. The
// `Prompter` trait keeps the loop independent of the terminal so it can be
// driven from tests; `Terminal` is the real implementation on top of
// `dialoguer`.

use std::io;
use std::time::Duration;

use crossterm::style::Stylize;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

/// Everything the session needs from the user.
pub trait Prompter {
    /// Free-text answer; may be empty.
    fn input(&mut self, prompt: &str) -> io::Result<String>;

    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<bool>;

    /// Pick one of `items`, returning its index.
    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> io::Result<usize>;

    /// Plain output.
    fn say(&mut self, text: &str);

    /// A recovered problem the user should know about.
    fn warn(&mut self, text: &str);
}

/// Interactive terminal prompts.
pub struct Terminal;

impl Prompter for Terminal {
    fn input(&mut self, prompt: &str) -> io::Result<String> {
        // `allow_empty` so a bare Enter means "keep the current value".
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<bool> {
        Confirm::new().with_prompt(prompt).default(default).interact()
    }

    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> io::Result<usize> {
        // `Select::interact()` is keyboard-driven: arrow keys and Enter.
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
    }

    fn say(&mut self, text: &str) {
        println!("{text}");
    }

    fn warn(&mut self, text: &str) {
        eprintln!("{} {text}", "Warning:".yellow().bold());
    }
}

/// Spinner shown while a blocking step runs. Call `finish_and_clear` when
/// done.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Section heading for the card details.
pub fn heading(text: &str) -> String {
    format!("{}", format!("--- {text} ---").bold())
}
