use std::io::Write;

use async_trait::async_trait;
use storefront_core::{Decision, Prompt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

/// Line input for the shell and the confirmation prompt.
pub struct Console<I> {
    lines: Lines<I>,
}

impl Console<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<I> Console<I>
where
    I: AsyncBufRead + Unpin + Send,
{
    pub fn new(input: I) -> Self {
        Self {
            lines: input.lines(),
        }
    }

    /// Prints `prompt` and reads one line; `None` at end of input.
    pub async fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?)
    }
}

#[derive(Debug, PartialEq)]
enum Answer {
    Decided(Decision),
    Dismissed,
    Unclear,
}

fn parse_answer(line: &str) -> Answer {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Answer::Decided(Decision::Approve),
        "n" | "no" => Answer::Decided(Decision::Reject),
        "" => Answer::Dismissed,
        _ => Answer::Unclear,
    }
}

#[async_trait]
impl<I> Prompt for Console<I>
where
    I: AsyncBufRead + Unpin + Send,
{
    async fn ask(&mut self, message: &str) -> Option<Decision> {
        let question = format!("{message} [y/n] ");
        loop {
            let line = match self.read_line(&question).await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    warn!("⚠️ Could not read confirmation: {}", e);
                    return None;
                }
            };
            match parse_answer(&line) {
                Answer::Decided(decision) => return Some(decision),
                Answer::Dismissed => return None,
                Answer::Unclear => println!("Please answer y or n."),
            }
        }
    }
}
