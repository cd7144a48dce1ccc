//! Line-oriented adapter to an external NER process.

use super::Extractor;
use crate::sync::{lock, Mutex};
use crate::{Error, Result};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

struct Session {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Talks to a long-running extractor process.
///
/// Protocol: for every call one line of text is written to the child's
/// stdin, and one line holding a JSON array of strings is read back from its
/// stdout. The process is spawned once and killed on drop. Calls are
/// serialized through a mutex.
pub struct CommandExtractor {
    program: String,
    session: Mutex<Session>,
}

impl std::fmt::Debug for CommandExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandExtractor")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

impl CommandExtractor {
    /// Spawn `program` with `args`.
    pub fn spawn<I, S>(program: &str, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::config(format!("cannot start extractor '{}': {}", program, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::config("extractor stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::config("extractor stdout unavailable"))?;

        log::info!("Started extractor process '{}' (pid {})", program, child.id());
        Ok(Self {
            program: program.to_string(),
            session: Mutex::new(Session {
                child,
                stdin,
                stdout: BufReader::new(stdout),
            }),
        })
    }

    /// Spawn from a whitespace-separated command line, e.g. `python ner.py --model sm`.
    pub fn from_command_line(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::config("empty extractor command"))?;
        Self::spawn(program, parts)
    }
}

impl Extractor for CommandExtractor {
    fn extract(&self, text: &str) -> Result<Vec<String>> {
        let mut session = lock(&self.session);
        let single_line = text.replace(['\r', '\n'], " ");

        writeln!(session.stdin, "{}", single_line)
            .and_then(|()| session.stdin.flush())
            .map_err(|e| Error::extractor(format!("{}: write failed: {}", self.program, e)))?;

        let mut reply = String::new();
        let read = session
            .stdout
            .read_line(&mut reply)
            .map_err(|e| Error::extractor(format!("{}: read failed: {}", self.program, e)))?;
        if read == 0 {
            return Err(Error::extractor(format!("{}: process closed its output", self.program)));
        }

        serde_json::from_str::<Vec<String>>(reply.trim()).map_err(|e| {
            Error::extractor(format!("{}: bad reply {:?}: {}", self.program, reply.trim(), e))
        })
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

impl Drop for CommandExtractor {
    fn drop(&mut self) {
        let mut session = lock(&self.session);
        if let Err(e) = session.child.kill() {
            log::debug!("Extractor process already gone: {}", e);
        }
        let _ = session.child.wait();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    // `cat` echoes the line back, which is valid JSON when the text is a JSON array.
    #[test]
    fn round_trips_through_process() {
        let ex = CommandExtractor::spawn("cat", Vec::<String>::new()).unwrap();
        assert_eq!(
            ex.extract(r#"["ACME LTD","BETA S.A"]"#).unwrap(),
            vec!["ACME LTD", "BETA S.A"]
        );
        assert!(ex.extract("[]").unwrap().is_empty());
    }

    #[test]
    fn non_json_reply_is_extractor_error() {
        let ex = CommandExtractor::spawn("cat", Vec::<String>::new()).unwrap();
        assert!(matches!(ex.extract("ACME LTD"), Err(Error::Extractor(_))));
    }

    #[test]
    fn closed_output_is_extractor_error() {
        let ex = CommandExtractor::from_command_line("true").unwrap();
        // Give the child time to exit so the read sees EOF.
        std::thread::sleep(std::time::Duration::from_millis(50));
        let err = ex.extract("ACME").unwrap_err();
        assert!(matches!(err, Error::Extractor(_)));
    }

    #[test]
    fn missing_program_is_config_error() {
        let err = CommandExtractor::from_command_line("/no/such/extractor-bin").unwrap_err();
        assert!(err.is_fatal());
        assert!(CommandExtractor::from_command_line("   ").is_err());
    }
}
