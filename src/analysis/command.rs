use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Mutex;
use tracing::{debug, info};

use super::engine::LinguisticEngine;
use crate::error::{MaccabyteError, Result};
use crate::types::Token;

#[derive(Deserialize, Debug)]
struct Handshake {
    #[serde(default)]
    ready: bool,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Serialize, Debug)]
struct Request<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum Response {
    Tokens { tokens: Vec<Token> },
    Failure { error: String },
}

struct Session {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Session {
    fn read_message(&mut self) -> Result<String> {
        loop {
            let mut line = String::new();
            let read = self
                .stdout
                .read_line(&mut line)
                .map_err(|e| unavailable(format!("failed to read from engine: {e}")))?;
            if read == 0 {
                return Err(unavailable("engine closed its output"));
            }
            if !line.trim().is_empty() {
                return Ok(line);
            }
        }
    }

    fn send(&mut self, request: &Request<'_>) -> Result<()> {
        let mut payload = serde_json::to_string(request)?;
        payload.push('\n');
        self.stdin
            .write_all(payload.as_bytes())
            .and_then(|_| self.stdin.flush())
            .map_err(|e| unavailable(format!("failed to write to engine: {e}")))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Engine backed by a long-running analysis bridge process.
///
/// The bridge is started once as `<program> <args..> --language <lang>` and speaks
/// line-delimited JSON over stdio. It first announces
/// `{"ready": true, "language": "<lang>"}`; afterwards every `{"text": ...}` request
/// is answered with `{"tokens": [...]}` or `{"error": ...}`. Starting the bridge is
/// where the model loading cost is paid, so keep one handle per process. Requests
/// are serialised through an internal lock; the process is killed on drop.
pub struct CommandEngine {
    language: String,
    program: String,
    session: Mutex<Session>,
}

impl CommandEngine {
    pub fn spawn(program: &str, args: &[String], language: &str) -> Result<Self> {
        info!(program, language, "starting linguistic engine");
        let mut child = Command::new(program)
            .args(args)
            .arg("--language")
            .arg(language)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| unavailable(format!("failed to start '{program}': {e}")))?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let (stdin, stdout) = match (stdin, stdout) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(unavailable("engine pipes were not captured"));
            }
        };
        let mut session = Session {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        };

        let line = session.read_message()?;
        let handshake: Handshake = serde_json::from_str(&line)
            .map_err(|e| unavailable(format!("unreadable engine handshake: {e}")))?;
        if let Some(error) = handshake.error {
            return Err(unavailable(format!("engine failed to initialise: {error}")));
        }
        if !handshake.ready {
            return Err(unavailable("engine did not report ready"));
        }
        if let Some(reported) = handshake.language.as_deref() {
            if reported != language {
                return Err(unavailable(format!(
                    "engine initialised for '{reported}', expected '{language}'"
                )));
            }
        }

        info!(program, language, "linguistic engine ready");
        Ok(CommandEngine {
            language: language.to_string(),
            program: program.to_string(),
            session: Mutex::new(session),
        })
    }
}

impl LinguisticEngine for CommandEngine {
    fn language(&self) -> &str {
        &self.language
    }

    fn analyze(&self, text: &str) -> Result<Vec<Token>> {
        let mut session = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        session.send(&Request { text })?;
        let line = session.read_message()?;
        match serde_json::from_str::<Response>(&line) {
            Ok(Response::Tokens { tokens }) => {
                debug!(
                    program = %self.program,
                    chars = text.chars().count(),
                    tokens = tokens.len(),
                    "engine call completed"
                );
                Ok(tokens)
            }
            Ok(Response::Failure { error }) => Err(unavailable(format!("engine error: {error}"))),
            Err(e) => Err(unavailable(format!("unreadable engine response: {e}"))),
        }
    }
}

fn unavailable(reason: impl Into<String>) -> MaccabyteError {
    MaccabyteError::EngineUnavailable(reason.into())
}
