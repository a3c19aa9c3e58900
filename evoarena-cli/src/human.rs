//! Console move source - a human typing action labels

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use evoarena_core::{Action, ArenaError, Game, Result};
use evoarena_tournament::MoveSource;

/// Reads moves line by line, re-prompting until the game accepts one.
///
/// Input and output are generic so the prompt loop can be driven from tests.
pub struct ConsoleMoveSource<R, W> {
    label: String,
    input: R,
    output: W,
}

/// Console source bound to the process's stdin and stdout
pub type StdinMoveSource = ConsoleMoveSource<BufReader<Stdin>, Stdout>;

impl StdinMoveSource {
    pub fn stdin(label: impl Into<String>) -> Self {
        ConsoleMoveSource::new(label, BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleMoveSource<R, W> {
    pub fn new(label: impl Into<String>, input: R, output: W) -> Self {
        Self {
            label: label.into(),
            input,
            output,
        }
    }

    fn prompt(&mut self, game: &Game, opponent_history: &[Action]) -> io::Result<()> {
        if let Some(&last) = opponent_history.last() {
            writeln!(
                self.output,
                "{}: opponent played {}",
                self.label,
                game.label(last).unwrap_or("?")
            )?;
        }
        write!(
            self.output,
            "{} move ({}): ",
            self.label,
            game.valid_actions().join("/")
        )?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> MoveSource for ConsoleMoveSource<R, W> {
    fn label(&self) -> &str {
        &self.label
    }

    fn next_move(&mut self, game: &Game, opponent_history: &[Action]) -> Result<Action> {
        loop {
            self.prompt(game, opponent_history)
                .map_err(|e| self.console_error(e))?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|e| self.console_error(e))?;
            if read == 0 {
                return Err(ArenaError::move_input(
                    &self.label,
                    "input closed before a move was entered",
                ));
            }

            match game.validate_move(line.trim()) {
                Ok(action) => return Ok(action),
                Err(e) => {
                    writeln!(self.output, "{e}").map_err(|e| self.console_error(e))?;
                }
            }
        }
    }
}

impl<R, W> ConsoleMoveSource<R, W> {
    fn console_error(&self, e: io::Error) -> ArenaError {
        ArenaError::move_input(&self.label, format!("console error: {e}"))
    }
}
