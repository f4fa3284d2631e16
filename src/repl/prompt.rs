use std::{
    fmt::Display,
    io::{self, BufRead, Write},
    str::FromStr,
};

use thiserror::Error;

/// End-of-input reads in a row after which the input counts as closed
pub const MAX_CONSECUTIVE_EOF: usize = 3;

#[derive(Error, Debug)]
pub enum PromptError {
    /// The user ended input while a prompt was waiting
    #[error("input interrupted")]
    Interrupted,
    /// Input keeps reporting end-of-file; nothing more can be read
    #[error("input closed")]
    Closed,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PromptError>;

/// Reads validated answers from the user, re-asking until the input is valid
pub struct Prompter<R, W> {
    input: R,
    output: W,
    eof_streak: usize,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            eof_streak: 0,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints a full line of output
    pub fn say(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }

    /// Prints `prompt` and reads one trimmed line
    pub fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => {
                writeln!(self.output)?;
                self.eof_streak += 1;
                if self.eof_streak >= MAX_CONSECUTIVE_EOF {
                    Err(PromptError::Closed)
                } else {
                    Err(PromptError::Interrupted)
                }
            }
            Ok(_) => {
                self.eof_streak = 0;
                Ok(line.trim().to_string())
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Err(PromptError::Interrupted),
            // The offending bytes are consumed; treat the line as blank input
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                self.eof_streak = 0;
                Ok(String::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn non_empty(&mut self, prompt: &str) -> Result<String> {
        loop {
            let value = self.read_line(prompt)?;
            if !value.is_empty() {
                return Ok(value);
            }
            self.say("Error: the value must not be empty. Try again.")?;
        }
    }

    pub fn integer<T: FromStr>(&mut self, prompt: &str) -> Result<T> {
        loop {
            if let Ok(value) = self.read_line(prompt)?.parse() {
                return Ok(value);
            }
            self.say("Error: enter a valid number.")?;
        }
    }

    /// Asks for one of `choices` (case-insensitive) and parses the answer
    pub fn select<T: FromStr>(&mut self, prompt: &str, choices: &[&str]) -> Result<T> {
        let options = choices.join("/");
        let prompt = format!("{prompt} ({options}): ");

        loop {
            let value = self.read_line(&prompt)?.to_lowercase();
            if choices.contains(&value.as_str()) {
                if let Ok(parsed) = value.parse() {
                    return Ok(parsed);
                }
            }
            self.say(format!("Error: enter one of the following values: {options}."))?;
        }
    }

    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer: String = self.select(prompt, &["yes", "no"])?;
        Ok(answer == "yes")
    }
}
