//! External refresh commands.
//!
//! A refresh command is an operator-configured shell command whose first
//! line of output is a fresh `OAuth2` access token. The process is always
//! reaped, whether the token was read, the output was empty, or reading
//! failed.

use std::io::{self, BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Starts refresh commands.
pub trait CommandRunner {
    /// Handle to a started command.
    type Process: ChildProcess;

    /// Starts `command_line` with its standard output readable through
    /// the returned handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started.
    fn run(&self, command_line: &str) -> io::Result<Self::Process>;
}

/// A running command whose output can be read line by line.
pub trait ChildProcess {
    /// Reads the next output line without its trailing line terminator.
    ///
    /// Returns `Ok(None)` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the output fails.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Closes the output stream and waits for the process to exit.
    ///
    /// Calling this more than once is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if waiting on the process fails.
    fn wait_and_close(&mut self) -> io::Result<()>;
}

/// Runs commands through `sh -c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    type Process = ShellProcess;

    fn run(&self, command_line: &str) -> io::Result<ShellProcess> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;
        let stdout = child.stdout.take().map(BufReader::new);
        Ok(ShellProcess {
            child,
            stdout,
            reaped: false,
        })
    }
}

/// A command started by [`ShellRunner`].
#[derive(Debug)]
pub struct ShellProcess {
    child: Child,
    stdout: Option<BufReader<ChildStdout>>,
    reaped: bool,
}

impl ChildProcess for ShellProcess {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };
        let mut line = String::new();
        if stdout.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(trim_line_ending(line)))
    }

    fn wait_and_close(&mut self) -> io::Result<()> {
        if self.reaped {
            return Ok(());
        }
        // Drop the pipe first so a command blocked on writing can exit
        self.stdout = None;
        let status = self.child.wait()?;
        self.reaped = true;
        if !status.success() {
            warn!("Refresh command exited with {status}");
        }
        Ok(())
    }
}

fn trim_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Reaps the wrapped process when dropped.
struct Reaper<P: ChildProcess>(P);

impl<P: ChildProcess> Drop for Reaper<P> {
    fn drop(&mut self) {
        if let Err(e) = self.0.wait_and_close() {
            warn!("Failed to reap refresh command: {e}");
        }
    }
}

/// Runs `command` and returns the first line of its output as a token.
///
/// # Errors
///
/// Returns [`Error::RefreshCommandFailed`] if the command cannot be
/// started, [`Error::Io`] if its output cannot be read, and
/// [`Error::EmptyToken`] if the first line is missing or empty.
pub fn fetch_refresh_token<R: CommandRunner>(runner: &R, command: &str) -> Result<String> {
    debug!("Running OAuth refresh command");
    let process = runner.run(command).map_err(Error::RefreshCommandFailed)?;
    let mut reaper = Reaper(process);
    let line = reaper.0.read_line();
    drop(reaper);

    match line? {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(Error::EmptyToken),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::*;

    /// Process that replays canned output.
    struct Canned {
        lines: VecDeque<io::Result<String>>,
        closes: Rc<Cell<usize>>,
    }

    impl ChildProcess for Canned {
        fn read_line(&mut self) -> io::Result<Option<String>> {
            self.lines.pop_front().transpose()
        }

        fn wait_and_close(&mut self) -> io::Result<()> {
            self.closes.set(self.closes.get() + 1);
            Ok(())
        }
    }

    struct CannedRunner {
        output: Vec<&'static str>,
        read_error: bool,
        spawn_error: bool,
        closes: Rc<Cell<usize>>,
    }

    impl CannedRunner {
        fn new(output: Vec<&'static str>) -> Self {
            Self {
                output,
                read_error: false,
                spawn_error: false,
                closes: Rc::new(Cell::new(0)),
            }
        }
    }

    impl CommandRunner for CannedRunner {
        type Process = Canned;

        fn run(&self, _command_line: &str) -> io::Result<Canned> {
            if self.spawn_error {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such command"));
            }
            let mut lines: VecDeque<io::Result<String>> =
                self.output.iter().map(|l| Ok((*l).to_string())).collect();
            if self.read_error {
                lines.push_front(Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe")));
            }
            Ok(Canned {
                lines,
                closes: Rc::clone(&self.closes),
            })
        }
    }

    #[test]
    fn test_first_line_is_token() {
        let runner = CannedRunner::new(vec!["tok123", "ignored"]);
        assert_eq!(fetch_refresh_token(&runner, "cmd").unwrap(), "tok123");
        assert_eq!(runner.closes.get(), 1);
    }

    #[test]
    fn test_empty_output_is_empty_token() {
        let runner = CannedRunner::new(vec![]);
        assert!(matches!(
            fetch_refresh_token(&runner, "cmd"),
            Err(Error::EmptyToken)
        ));
        assert_eq!(runner.closes.get(), 1);
    }

    #[test]
    fn test_blank_first_line_is_empty_token() {
        let runner = CannedRunner::new(vec!["", "tok123"]);
        assert!(matches!(
            fetch_refresh_token(&runner, "cmd"),
            Err(Error::EmptyToken)
        ));
        assert_eq!(runner.closes.get(), 1);
    }

    #[test]
    fn test_read_error_still_reaps() {
        let mut runner = CannedRunner::new(vec!["tok123"]);
        runner.read_error = true;
        assert!(matches!(
            fetch_refresh_token(&runner, "cmd"),
            Err(Error::Io(_))
        ));
        assert_eq!(runner.closes.get(), 1);
    }

    #[test]
    fn test_spawn_failure() {
        let mut runner = CannedRunner::new(vec!["tok123"]);
        runner.spawn_error = true;
        assert!(matches!(
            fetch_refresh_token(&runner, "cmd"),
            Err(Error::RefreshCommandFailed(_))
        ));
        assert_eq!(runner.closes.get(), 0);
    }

    #[test]
    fn test_trim_line_ending() {
        assert_eq!(trim_line_ending("abc\n".to_string()), "abc");
        assert_eq!(trim_line_ending("abc\r\n".to_string()), "abc");
        assert_eq!(trim_line_ending("abc".to_string()), "abc");
        assert_eq!(trim_line_ending("a\rb".to_string()), "a\rb");
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_runner_reads_first_line() {
        let token = fetch_refresh_token(&ShellRunner, "printf 'tok123\\nsecond\\n'").unwrap();
        assert_eq!(token, "tok123");
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_runner_silent_command() {
        assert!(matches!(
            fetch_refresh_token(&ShellRunner, "true"),
            Err(Error::EmptyToken)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_process_close_is_idempotent() {
        let mut process = ShellRunner.run("echo hi").unwrap();
        assert_eq!(process.read_line().unwrap().as_deref(), Some("hi"));
        process.wait_and_close().unwrap();
        process.wait_and_close().unwrap();
        assert_eq!(process.read_line().unwrap(), None);
    }
}
