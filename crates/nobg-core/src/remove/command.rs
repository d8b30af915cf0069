//! Background removal through an external program.
//!
//! The image goes to the child's stdin and the result is read from its
//! stdout, which is how `rembg i - -` works. The child is killed if it
//! does not exit within the timeout.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::{BackgroundRemover, RemovalError};

/// Default wait for the external program.
pub const DEFAULT_REMOVAL_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs an external program as the background remover.
#[derive(Debug, Clone)]
pub struct CommandRemover {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandRemover {
    /// Create a remover that runs `program` with `args`.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: DEFAULT_REMOVAL_TIMEOUT,
        }
    }

    /// The `rembg` CLI reading stdin and writing stdout.
    pub fn rembg() -> Self {
        Self::new("rembg", ["i", "-", "-"])
    }

    /// Set how long to wait before killing the program.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll the child until it exits or the deadline passes.
    fn wait_with_deadline(&self, child: &mut Child) -> Result<ExitStatus, RemovalError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {}
                Err(e) => {
                    abandon(child);
                    return Err(e.into());
                }
            }
            if Instant::now() >= deadline {
                log::warn!(
                    "{} did not finish within {:?}, killing it",
                    self.program,
                    self.timeout
                );
                abandon(child);
                return Err(RemovalError::Timeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Kill and reap a child we are giving up on.
fn abandon(child: &mut Child) {
    // Already-exited children make kill fail; wait still reaps them
    let _ = child.kill();
    let _ = child.wait();
}

impl BackgroundRemover for CommandRemover {
    fn remove(&self, bytes: &[u8]) -> Result<Vec<u8>, RemovalError> {
        log::debug!("running {} {:?} on {} bytes", self.program, self.args, bytes.len());

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let (Some(mut stdin), Some(mut stdout), Some(mut stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            abandon(&mut child);
            return Err(RemovalError::Failed("child pipes unavailable".to_string()));
        };

        // Pipes are drained on their own threads so a chatty child cannot
        // deadlock against a full buffer while we wait on it.
        let input = bytes.to_vec();
        let writer = thread::spawn(move || stdin.write_all(&input));
        let reader = thread::spawn(move || {
            let mut out = Vec::new();
            stdout.read_to_end(&mut out).map(|_| out)
        });
        let errors = thread::spawn(move || {
            let mut err = String::new();
            let _ = stderr.read_to_string(&mut err);
            err
        });

        let status = self.wait_with_deadline(&mut child)?;

        // A child that exits without reading all input breaks the pipe; the
        // exit status below is the real signal.
        let _ = writer.join();
        let output = reader
            .join()
            .map_err(|_| RemovalError::Failed("stdout reader panicked".to_string()))??;
        let stderr = errors.join().unwrap_or_default();

        if !status.success() {
            return Err(RemovalError::Failed(format!(
                "{} exited with {}: {}",
                self.program,
                status,
                stderr.trim()
            )));
        }

        if output.is_empty() {
            return Err(RemovalError::MalformedOutput(format!(
                "{} produced no output",
                self.program
            )));
        }

        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_echo_program_round_trips_bytes() {
        let remover = CommandRemover::new("cat", Vec::<String>::new());
        let out = remover.remove(b"\x89PNG fake").unwrap();
        assert_eq!(out, b"\x89PNG fake");
    }

    #[test]
    fn test_large_input_does_not_deadlock() {
        let remover = CommandRemover::new("cat", Vec::<String>::new());
        let input = vec![42u8; 4 * 1024 * 1024];
        assert_eq!(remover.remove(&input).unwrap().len(), input.len());
    }

    #[test]
    fn test_timeout_kills_child() {
        let remover = CommandRemover::new("sh", ["-c", "exec sleep 5"])
            .with_timeout(Duration::from_millis(100));
        let started = Instant::now();
        let err = remover.remove(b"x").unwrap_err();
        assert!(matches!(err, RemovalError::Timeout(d) if d == Duration::from_millis(100)));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_abandon_reaps_running_child() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        let started = Instant::now();
        abandon(&mut child);
        assert!(child.try_wait().unwrap().is_some());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_abandon_tolerates_exited_child() {
        let mut child = Command::new("true").spawn().unwrap();
        child.wait().unwrap();
        abandon(&mut child);
        assert!(child.try_wait().unwrap().is_some());
    }

    #[test]
    fn test_nonzero_exit_reports_stderr() {
        let remover = CommandRemover::new("sh", ["-c", "cat >/dev/null; echo model missing >&2; exit 3"]);
        match remover.remove(b"x").unwrap_err() {
            RemovalError::Failed(message) => {
                assert!(message.contains("model missing"), "{}", message);
                assert!(message.starts_with("sh exited with"), "{}", message);
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_output_is_malformed() {
        let remover = CommandRemover::new("sh", ["-c", "cat >/dev/null"]);
        assert!(matches!(
            remover.remove(b"x"),
            Err(RemovalError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let remover = CommandRemover::new("definitely-not-a-real-remover-binary", Vec::<String>::new());
        assert!(matches!(remover.remove(b"x"), Err(RemovalError::Io(_))));
    }

    #[test]
    fn test_rembg_defaults() {
        let remover = CommandRemover::rembg();
        assert_eq!(remover.program, "rembg");
        assert_eq!(remover.args, vec!["i", "-", "-"]);
        assert_eq!(remover.timeout(), DEFAULT_REMOVAL_TIMEOUT);
    }
}
