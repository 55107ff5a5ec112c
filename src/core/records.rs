//! CSV encoding of the two ballot files.
//!
//! The tally file has no header and one `<candidate>,<count>` row per
//! candidate. The voter file starts with a `voter_id,candidate` header and
//! grows by one row per accepted vote; files edited by hand may lack the
//! header or the final newline, and both are tolerated.

use crate::domain::model::{Candidate, Tally, VoterEntry};
use crate::utils::error::{BallotError, Result};

pub fn encode_tally(tally: &Tally) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for (candidate, count) in tally.iter() {
        writer.write_record([candidate.as_str(), count.to_string().as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| BallotError::IoError(e.into_error()))
}

/// 未知候選人的列直接略過；票數無法解析的列視為損毀，該候選人維持 0
pub fn decode_tally(data: &[u8]) -> Tally {
    let mut tally = Tally::new();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping unreadable tally row {}: {}", line + 1, e);
                continue;
            }
        };

        let Some(candidate) = record.get(0).and_then(|name| name.parse::<Candidate>().ok()) else {
            tracing::debug!("Ignoring tally row {} for unknown candidate", line + 1);
            continue;
        };

        match record.get(1).and_then(|count| count.trim().parse::<u64>().ok()) {
            Some(count) => tally.set(candidate, count),
            None => tracing::warn!(
                "Corrupt count for {} on tally row {}, treating as 0",
                candidate,
                line + 1
            ),
        }
    }

    tally
}

pub const VOTER_HEADER: [&str; 2] = ["voter_id", "candidate"];

/// 追加列之前對既有投票者檔案的了解
#[derive(Debug, Clone, Copy)]
pub enum AppendTarget<'a> {
    Missing,
    Contents(&'a [u8]),
    /// 檔案存在但無法讀取
    Unreadable,
}

/// Encodes one voter row so that appending it to `target` keeps the file
/// parseable: a header when the file has no content yet, and a leading
/// newline when the existing bytes do not end a line.
pub fn encode_voter_append(entry: &VoterEntry, target: AppendTarget<'_>) -> Result<Vec<u8>> {
    let (with_header, needs_separator) = match target {
        AppendTarget::Missing => (true, false),
        AppendTarget::Contents(data) => {
            let blank = data.iter().all(|b| b.is_ascii_whitespace());
            let open_line = data.last().is_some_and(|b| *b != b'\n');
            (blank, open_line)
        }
        // 不確定結尾狀態時補一個換行，空白列讀取時會被略過
        AppendTarget::Unreadable => (false, true),
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    if with_header {
        writer.write_record(VOTER_HEADER)?;
    }
    writer.serialize(entry)?;

    let row = writer
        .into_inner()
        .map_err(|e| BallotError::IoError(e.into_error()))?;

    if needs_separator {
        let mut separated = Vec::with_capacity(row.len() + 1);
        separated.push(b'\n');
        separated.extend(row);
        Ok(separated)
    } else {
        Ok(row)
    }
}

/// Header is optional: the first row is skipped only when it reads
/// `voter_id,candidate`.
pub fn decode_voters(data: &[u8]) -> Vec<VoterEntry> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut entries = Vec::new();
    for (line, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                if line == 0 && record.iter().eq(VOTER_HEADER) {
                    continue;
                }
                let voter_id = record.get(0).unwrap_or_default();
                if voter_id.is_empty() {
                    continue;
                }
                entries.push(VoterEntry {
                    voter_id: voter_id.to_string(),
                    candidate: record.get(1).unwrap_or_default().to_string(),
                });
            }
            Err(e) => tracing::warn!("Skipping unreadable voter row {}: {}", line + 1, e),
        }
    }

    entries
}
