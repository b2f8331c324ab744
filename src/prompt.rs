//! Interactive terminal prompts
//!
//! Generic over the input/output streams so the selection logic can be
//! driven by scripted input in tests.

use std::io::{self, BufRead, Write};

use crossterm::style::Stylize;

use crate::config::MAX_THRESHOLD;

/// Line-oriented prompter
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter on the process's stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Output stream, for printing between prompts
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Print `question` and read one trimmed line
    ///
    /// End of input is an error; a prompt must never spin on a closed stdin.
    fn ask_line(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim().to_string())
    }

    /// Ask a yes/no question until it gets an answer
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            let answer = self.ask_line(&format!("{} [y/n]:", question))?;
            match answer.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "{}", "Please enter Y or N".red())?,
            }
        }
    }

    /// Ask for an integer, returning `default` on empty input
    pub fn ask_int(&mut self, question: &str, default: Option<i64>) -> io::Result<i64> {
        let question = match default {
            Some(d) => format!("{} ({}):", question, d),
            None => format!("{}:", question),
        };
        loop {
            let answer = self.ask_line(&question)?;
            if answer.is_empty() {
                if let Some(d) = default {
                    return Ok(d);
                }
            }
            match answer.parse::<i64>() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(
                    self.output,
                    "{}",
                    "Invalid input. Please enter a number.".red()
                )?,
            }
        }
    }

    /// Ask for a 1-based index into a list of `count` items
    pub fn ask_index(&mut self, question: &str, count: usize) -> io::Result<usize> {
        loop {
            let choice = self.ask_int(question, None)?;
            match usize::try_from(choice) {
                Ok(i) if (1..=count).contains(&i) => return Ok(i - 1),
                _ => writeln!(self.output, "{}", "Invalid index. Please try again.".red())?,
            }
        }
    }

    /// Explain the threshold and ask for one in `0..=MAX_THRESHOLD`
    pub fn ask_threshold(&mut self, default: u8) -> io::Result<u8> {
        writeln!(self.output)?;
        writeln!(
            self.output,
            "{}",
            format!("Configure the trigger threshold (0-{} Newtons).", MAX_THRESHOLD).bold()
        )?;
        writeln!(self.output, "A lower value makes the sensor more sensitive.")?;
        writeln!(
            self.output,
            "{} Use a value of {} for an 'instant press' that triggers on any touch.",
            "Tip:".yellow().bold(),
            "1".cyan()
        )?;

        loop {
            let value = self.ask_int("Enter trigger threshold", Some(i64::from(default)))?;
            match u8::try_from(value) {
                Ok(t) if t <= MAX_THRESHOLD => return Ok(t),
                _ => writeln!(
                    self.output,
                    "{}",
                    format!("Threshold must be between 0 and {}.", MAX_THRESHOLD).red()
                )?,
            }
        }
    }
}
