use crate::core::records::{
    decode_tally, decode_voters, encode_tally, encode_voter_append, AppendTarget,
};
use crate::domain::model::{
    AuditReport, Candidate, Tally, TallySnapshot, VoteOutcome, VoterEntry, VoterId,
};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{BallotError, Result, VoteRejection};
use std::collections::HashSet;
use std::sync::Mutex;

/// Owns the in-memory tally and the two files that shadow it.
///
/// Every mutation goes through [`VoteStore::cast_vote`], which holds the
/// tally lock for the whole check-then-write sequence.
pub struct VoteStore<S: Storage> {
    storage: S,
    tally_file: String,
    voters_file: String,
    tally: Mutex<Tally>,
}

enum VoterFile {
    Missing,
    Present(Vec<u8>),
    Unreadable,
}

impl VoterFile {
    fn entries(&self) -> Vec<VoterEntry> {
        match self {
            VoterFile::Present(data) => decode_voters(data),
            VoterFile::Missing | VoterFile::Unreadable => Vec::new(),
        }
    }

    fn append_target(&self) -> AppendTarget<'_> {
        match self {
            VoterFile::Missing => AppendTarget::Missing,
            VoterFile::Present(data) => AppendTarget::Contents(data),
            VoterFile::Unreadable => AppendTarget::Unreadable,
        }
    }
}

impl<S: Storage> VoteStore<S> {
    pub fn open<C: ConfigProvider>(storage: S, config: &C) -> Result<Self> {
        let store = Self {
            storage,
            tally_file: config.tally_file().to_string(),
            voters_file: config.voters_file().to_string(),
            tally: Mutex::new(Tally::new()),
        };

        let tally = store.load_tally()?;
        let recorded = store.load_voters().entries().len() as u64;
        if recorded != tally.total() {
            tracing::warn!(
                "Voter record has {} entries but tally total is {}",
                recorded,
                tally.total()
            );
        }

        tracing::debug!("Loaded tally: {:?}", tally);
        *store.tally.lock().map_err(|_| BallotError::StatePoisoned)? = tally;
        Ok(store)
    }

    fn load_tally(&self) -> Result<Tally> {
        match self.storage.read_file(&self.tally_file) {
            Ok(Some(data)) => Ok(decode_tally(&data)),
            Ok(None) => {
                tracing::info!("No tally file at {}, starting from zero", self.tally_file);
                let tally = Tally::new();
                self.persist_tally(&tally)?;
                Ok(tally)
            }
            Err(e) => {
                // 讀取失敗視為尚未建立，不覆寫原檔
                tracing::warn!("Could not read tally file {}: {}", self.tally_file, e);
                Ok(Tally::new())
            }
        }
    }

    fn load_voters(&self) -> VoterFile {
        match self.storage.read_file(&self.voters_file) {
            Ok(Some(data)) => VoterFile::Present(data),
            Ok(None) => VoterFile::Missing,
            Err(e) => {
                tracing::warn!("Could not read voter file {}: {}", self.voters_file, e);
                VoterFile::Unreadable
            }
        }
    }

    fn persist_tally(&self, tally: &Tally) -> Result<()> {
        encode_tally(tally)
            .and_then(|data| self.storage.write_file(&self.tally_file, &data))
            .map_err(|e| BallotError::persistence(&self.tally_file, &e))
    }

    fn reject(&self, rejection: VoteRejection) -> Result<VoteOutcome> {
        tracing::debug!("Vote rejected: {}", rejection);
        Ok(VoteOutcome::rejected(rejection))
    }

    /// Validates and records a single vote.
    ///
    /// Rejections come back as `Ok` with `success == false` and leave all
    /// state untouched. `Err` means the vote passed validation but could not
    /// be made durable; in that case the in-memory tally is rolled back.
    pub fn cast_vote(&self, candidate: &str, voter_id: &str) -> Result<VoteOutcome> {
        let mut tally = self.tally.lock().map_err(|_| BallotError::StatePoisoned)?;

        let candidate = match candidate.parse::<Candidate>() {
            Ok(candidate) => candidate,
            Err(rejection) => return self.reject(rejection),
        };

        let voter_id = match voter_id.parse::<VoterId>() {
            Ok(voter_id) => voter_id,
            Err(rejection) => return self.reject(rejection),
        };

        let voters = self.load_voters();
        if voters
            .entries()
            .iter()
            .any(|entry| entry.voter_id == voter_id.as_str())
        {
            return self.reject(VoteRejection::DuplicateVote);
        }

        let row = encode_voter_append(
            &VoterEntry::new(&voter_id, candidate),
            voters.append_target(),
        )?;

        let previous = tally.clone();
        tally.increment(candidate);

        if let Err(e) = self.persist_tally(&tally) {
            *tally = previous;
            tracing::error!("Vote for {} not recorded: {}", candidate, e);
            return Err(e);
        }

        if let Err(e) = self.storage.append_file(&self.voters_file, &row) {
            *tally = previous;
            tracing::error!("Voter record append failed for {}: {}", voter_id, e);
            if let Err(restore) = self.persist_tally(&tally) {
                tracing::error!("Could not restore tally after failed append: {}", restore);
            }
            return Err(BallotError::persistence(&self.voters_file, &e));
        }

        tracing::info!("Recorded vote from {} for {}", voter_id, candidate);
        Ok(VoteOutcome::accepted(candidate))
    }

    pub fn tally(&self) -> Result<Tally> {
        let tally = self.tally.lock().map_err(|_| BallotError::StatePoisoned)?;
        Ok(tally.clone())
    }

    pub fn snapshot(&self) -> Result<TallySnapshot> {
        self.tally().map(TallySnapshot::from)
    }

    pub fn summary(&self) -> Result<String> {
        self.tally().map(|tally| tally.summary())
    }

    pub fn voters(&self) -> Vec<VoterEntry> {
        self.load_voters().entries()
    }

    pub fn has_voted(&self, voter_id: &str) -> bool {
        self.load_voters()
            .entries()
            .iter()
            .any(|entry| entry.voter_id == voter_id)
    }

    /// 比對檔案中的計票與投票者紀錄；讀取錯誤直接回報
    pub fn audit(&self) -> Result<AuditReport> {
        let _guard = self.tally.lock().map_err(|_| BallotError::StatePoisoned)?;

        let tally = self
            .storage
            .read_file(&self.tally_file)?
            .map(|data| decode_tally(&data))
            .unwrap_or_default();

        let entries = self
            .storage
            .read_file(&self.voters_file)?
            .map(|data| decode_voters(&data))
            .unwrap_or_default();

        let mut recorded = Tally::new();
        let mut unknown_rows = 0;
        let mut seen = HashSet::new();
        let mut repeated_ids = Vec::new();

        for entry in &entries {
            match entry.candidate.parse::<Candidate>() {
                Ok(candidate) => recorded.increment(candidate),
                Err(_) => unknown_rows += 1,
            }
            if !seen.insert(entry.voter_id.as_str()) && !repeated_ids.contains(&entry.voter_id) {
                repeated_ids.push(entry.voter_id.clone());
            }
        }

        Ok(AuditReport {
            tally,
            recorded,
            unknown_rows,
            repeated_ids,
        })
    }
}
