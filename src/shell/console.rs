//! Console: where the shell reads input and writes output.
//!
//! The shell never touches stdin/stdout directly. [`TerminalConsole`] is the
//! interactive implementation; [`ScriptedConsole`] replays canned input and
//! records everything written, for tests and scripted sessions.

use dialoguer::console::Term;
use std::collections::VecDeque;
use std::io::Write;
use std::time::Duration;

/// Input/output surface used by the shell and its commands.
pub trait Console {
    /// Write one block of text followed by a newline.
    fn print(&mut self, text: &str);
    /// Show `prompt` and read a line. `None` means input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Option<String>;
    /// Like [`Console::read_line`] but without echoing what is typed.
    fn read_password(&mut self, prompt: &str) -> Option<String>;
    /// Hand a media payload to the animation player.
    fn play_animation(&mut self, frames: &[String], fps: u32);
    fn clear(&mut self) {}
}

/// Interactive console on the process terminal.
pub struct TerminalConsole {
    term: Term,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn read_plain(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = std::io::stdout().flush();
        let mut buf = String::new();
        match std::io::stdin().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                tracing::warn!("Failed to read from stdin: {}", e);
                None
            }
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn print(&mut self, text: &str) {
        if let Err(e) = self.term.write_line(text) {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        if !self.term.is_term() {
            return self.read_plain(prompt);
        }
        if let Err(e) = self.term.write_str(prompt) {
            tracing::warn!("Failed to write prompt: {}", e);
        }
        match self.term.read_line() {
            Ok(line) => Some(line),
            Err(e) => {
                tracing::debug!("Terminal input closed: {}", e);
                None
            }
        }
    }

    fn read_password(&mut self, prompt: &str) -> Option<String> {
        if !self.term.is_term() {
            return self.read_plain(prompt);
        }
        // dialoguer renders its own ": " after the prompt
        let label = prompt.trim_end().trim_end_matches(':');
        dialoguer::Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| tracing::debug!("Password prompt closed: {}", e))
            .ok()
    }

    fn play_animation(&mut self, frames: &[String], fps: u32) {
        let delay = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
        for frame in frames {
            self.clear();
            self.print(frame);
            std::thread::sleep(delay);
        }
    }

    fn clear(&mut self) {
        if let Err(e) = self.term.clear_screen() {
            tracing::warn!("Failed to clear terminal: {}", e);
        }
    }
}

/// Console fed from a queue of input lines, recording all output.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    output: Vec<String>,
    prompts: Vec<String>,
    animations: Vec<(Vec<String>, u32)>,
    clears: usize,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn push_input(&mut self, line: impl Into<String>) {
        self.inputs.push_back(line.into());
    }

    pub fn pending_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Drain and return what was printed so far.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Everything printed, one block per line.
    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn animations(&self) -> &[(Vec<String>, u32)] {
        &self.animations
    }

    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl Console for ScriptedConsole {
    fn print(&mut self, text: &str) {
        self.output.push(text.to_string());
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.inputs.pop_front()
    }

    fn read_password(&mut self, prompt: &str) -> Option<String> {
        self.read_line(prompt)
    }

    fn play_animation(&mut self, frames: &[String], fps: u32) {
        self.animations.push((frames.to_vec(), fps));
    }

    fn clear(&mut self) {
        self.clears += 1;
    }
}
