//! Terminal progress bar for one pass over a data loader.
//!
//! Renders a single self-overwriting line on stderr:
//!
//! ```text
//! Epoch 3:  40%|########            | 16/40 [00:02, loss=0.412, acc=88.13%]
//! ```
//!
//! When stderr is not a terminal only the final line is printed.

use std::io::{IsTerminal, Write};
use std::time::{Duration, Instant};

const BAR_WIDTH: usize = 20;

#[derive(Debug)]
pub struct EpochProgress {
    desc:    String,
    total:   usize,
    current: usize,
    postfix: String,
    started: Instant,
    live:    bool,
}

impl EpochProgress {
    pub fn new(desc: impl Into<String>, total: usize) -> Self {
        Self {
            desc:    desc.into(),
            total,
            current: 0,
            postfix: String::new(),
            started: Instant::now(),
            live:    std::io::stderr().is_terminal(),
        }
    }

    /// Advance by one step and replace the trailing key=value text.
    pub fn update(&mut self, postfix: impl Into<String>) {
        self.current += 1;
        self.postfix = postfix.into();
        if self.live {
            let line = self.render(self.started.elapsed());
            let mut err = std::io::stderr().lock();
            // A failed redraw must not abort training
            write!(err, "\r{line}").and_then(|_| err.flush()).ok();
        }
    }

    /// Draw the final state and end the line.
    pub fn finish(self) {
        let line = self.render(self.started.elapsed());
        let prefix = if self.live { "\r" } else { "" };
        writeln!(std::io::stderr().lock(), "{prefix}{line}").ok();
    }

    fn render(&self, elapsed: Duration) -> String {
        let frac = if self.total == 0 {
            1.0
        } else {
            (self.current as f64 / self.total as f64).min(1.0)
        };
        let filled = (frac * BAR_WIDTH as f64).round() as usize;
        let bar: String = "#".repeat(filled) + &" ".repeat(BAR_WIDTH - filled);

        let secs = elapsed.as_secs();
        let mut line = format!(
            "{}: {:>3.0}%|{}| {}/{} [{:02}:{:02}",
            self.desc,
            frac * 100.0,
            bar,
            self.current,
            self.total,
            secs / 60,
            secs % 60,
        );
        if !self.postfix.is_empty() {
            line.push_str(", ");
            line.push_str(&self.postfix);
        }
        line.push(']');
        line
    }
}
