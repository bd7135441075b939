//! Terminal prompts.

use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use mailacct_core::{PromptError, Prompter};

/// Prompts on stderr and reads answers from the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

/// Leaves raw mode when dropped.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Prompter for TerminalPrompter {
    fn prompt_text(&self, label: &str, default: &str) -> Result<String, PromptError> {
        let mut stderr = io::stderr();
        if default.is_empty() {
            write!(stderr, "{label}")?;
        } else {
            write!(stderr, "{label}[{default}] ")?;
        }
        stderr.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(PromptError::Cancelled);
        }
        let answer = line.trim_end_matches(['\r', '\n']);
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer.to_string())
        }
    }

    fn prompt_secret(&self, label: &str) -> Result<String, PromptError> {
        let mut stderr = io::stderr();
        write!(stderr, "{label}")?;
        stderr.flush()?;

        let secret = {
            let _raw = RawMode::enable()?;
            read_secret()
        };
        writeln!(stderr)?;
        secret
    }
}

/// Reads keys until Enter; Esc and Ctrl-C cancel.
fn read_secret() -> Result<String, PromptError> {
    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Esc => return Err(PromptError::Cancelled),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(PromptError::Cancelled);
            }
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    }
}
