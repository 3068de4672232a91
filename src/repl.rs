//! Line-based front end.
//!
//! Each input line is parsed and evaluated on its own, against one scope
//! that lives for the whole session, so `let` bindings carry over from line
//! to line. A failing line prints its error and leaves the session intact.

use std::io::{self, BufRead, Write};

use log::{debug, info};

use crate::environment::{Env, Environment};
use crate::evaluator::Evaluator;

/// Shown before every line read.
pub const PROMPT: &str = "REPL> ";

/// Typing this on its own line ends the session.
pub const EXIT_COMMAND: &str = ".exit";

pub struct Repl {
    env: Env,
    evaluator: Evaluator,
}

impl Default for Repl {
    fn default() -> Self {
        Self::new(Evaluator::new())
    }
}

impl Repl {
    pub fn new(evaluator: Evaluator) -> Self {
        info!(
            "REPL session started, max call depth {}",
            evaluator.max_depth()
        );

        Self {
            env: Environment::new_shared(),
            evaluator,
        }
    }

    /// The session-wide scope.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Run one line and return what the REPL prints for it: the value's
    /// inspection string or the error message.
    pub fn eval_line(&mut self, line: &str) -> String {
        match crate::run(line, &self.env, &mut self.evaluator) {
            Ok(value) => {
                debug!("Line evaluated to: {}", value);
                value.inspect()
            }

            Err(e) => {
                debug!("Line failed: {}", e);
                e.to_string()
            }
        }
    }

    /// Read-eval-print until end of input or [`EXIT_COMMAND`].
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        let mut line: String = String::new();

        loop {
            write!(output, "{}", PROMPT)?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }

            let source: &str = line.trim();

            if source == EXIT_COMMAND {
                break;
            }

            if source.is_empty() {
                continue;
            }

            let printed: String = self.eval_line(source);
            writeln!(output, "{}", printed)?;
        }

        writeln!(output, "Exiting REPL.")?;
        info!("REPL session ended");

        Ok(())
    }
}
