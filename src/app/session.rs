use crate::app::ballot_form::submit_ballot;
use crate::core::VoteStore;
use crate::domain::model::Candidate;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub accepted: usize,
    pub rejected: usize,
}

/// Line-oriented ballot prompt over any reader/writer pair.
pub struct BallotSession<'a, S: Storage> {
    store: &'a VoteStore<S>,
}

impl<'a, S: Storage> BallotSession<'a, S> {
    pub fn new(store: &'a VoteStore<S>) -> Self {
        Self { store }
    }

    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<SessionStats> {
        let mut stats = SessionStats::default();
        let choices = Candidate::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join("/");

        writeln!(output, "Enter your UNO ID and select a candidate")?;
        writeln!(output, "(type 'tally' to see results, 'quit' to leave)")?;

        loop {
            let Some(voter_id) = prompt(&mut input, &mut output, "UNO ID: ")? else {
                break;
            };

            match voter_id.as_str() {
                "quit" | "exit" => break,
                "tally" => {
                    writeln!(output, "{}\n", self.store.summary()?)?;
                    continue;
                }
                _ => {}
            }

            let Some(candidate) =
                prompt(&mut input, &mut output, &format!("Candidate ({}): ", choices))?
            else {
                break;
            };
            let candidate = (!candidate.is_empty()).then_some(candidate.as_str());

            let response = submit_ballot(self.store, &voter_id, candidate);
            if response.success {
                stats.accepted += 1;
            } else {
                stats.rejected += 1;
            }

            writeln!(output, "{}", response.message)?;
            writeln!(output, "{}\n", response.summary)?;
        }

        tracing::info!(
            "Ballot session closed: {} accepted, {} rejected",
            stats.accepted,
            stats.rejected
        );
        Ok(stats)
    }
}

/// 讀取一行輸入；EOF 時回傳 None
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<Option<String>> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
