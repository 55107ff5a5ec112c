use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use uno_ballot::core::ConfigProvider;
use uno_ballot::domain::ports::Storage;
use uno_ballot::{BallotConfig, BallotError, Candidate, LocalStorage, MemoryStorage, VoteStore};

fn config_in(dir: &TempDir) -> BallotConfig {
    BallotConfig::default().with_overrides(
        Some(dir.path().to_string_lossy().into_owned()),
        None,
        None,
    )
}

fn open_local(dir: &TempDir) -> Result<VoteStore<LocalStorage>> {
    let config = config_in(dir);
    let storage = LocalStorage::new(config.data_dir());
    Ok(VoteStore::open(storage, &config)?)
}

/// Storage wrapper that can be told to fail writes or appends.
#[derive(Clone, Default)]
struct FlakyStorage {
    inner: Arc<MemoryStorage>,
    fail_writes: Arc<AtomicBool>,
    fail_appends: Arc<AtomicBool>,
}

impl FlakyStorage {
    fn broken() -> BallotError {
        BallotError::IoError(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        ))
    }
}

impl Storage for FlakyStorage {
    fn read_file(&self, path: &str) -> uno_ballot::Result<Option<Vec<u8>>> {
        self.inner.read_file(path)
    }

    fn write_file(&self, path: &str, data: &[u8]) -> uno_ballot::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::broken());
        }
        self.inner.write_file(path, data)
    }

    fn append_file(&self, path: &str, data: &[u8]) -> uno_ballot::Result<()> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(Self::broken());
        }
        self.inner.append_file(path, data)
    }
}

#[test]
fn test_each_fresh_id_votes_exactly_once() -> Result<()> {
    let dir = TempDir::new()?;
    let store = open_local(&dir)?;

    for n in 0..20u32 {
        let id = format!("{:08}", 40_000_000 + n);
        let candidate = if n % 2 == 0 { "John" } else { "Jane" };

        let first = store.cast_vote(candidate, &id)?;
        assert!(first.success, "first vote for {} should succeed", id);

        for retry in ["John", "Jane"] {
            let again = store.cast_vote(retry, &id)?;
            assert!(!again.success);
            assert_eq!(again.message, "Already Voted");
        }
    }

    assert_eq!(store.tally()?.total(), 20);
    Ok(())
}

#[test]
fn test_malformed_ids_never_change_tally() -> Result<()> {
    let dir = TempDir::new()?;
    let store = open_local(&dir)?;
    let before = store.tally()?;

    for id in ["", "1", "1234567", "123456789", "abcdefgh", "1234-678", " 12345678", "12.45678"] {
        let outcome = store.cast_vote("Jane", id)?;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "UNO ID must be an 8-digit number.", "id {:?}", id);
    }

    assert_eq!(store.tally()?, before);
    assert!(store.voters().is_empty());
    Ok(())
}

#[test]
fn test_unknown_candidates_never_change_tally() -> Result<()> {
    let dir = TempDir::new()?;
    let store = open_local(&dir)?;

    for candidate in ["", "Bob", "JOHN", "jane", "John "] {
        let outcome = store.cast_vote(candidate, "12345678")?;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Invalid candidate.");
    }

    assert_eq!(store.tally()?.total(), 0);
    assert!(!store.has_voted("12345678"));
    Ok(())
}

#[test]
fn test_split_votes_sum_to_accepted_count() -> Result<()> {
    let dir = TempDir::new()?;
    let store = open_local(&dir)?;

    let plan = [("John", 7), ("Jane", 5)];
    let mut next_id = 10_000_000u32;
    for (candidate, count) in plan {
        for _ in 0..count {
            assert!(store.cast_vote(candidate, &next_id.to_string())?.success);
            next_id += 1;
        }
    }

    let tally = store.tally()?;
    assert_eq!(tally.get(Candidate::John), 7);
    assert_eq!(tally.get(Candidate::Jane), 5);
    assert_eq!(tally.total(), 12);
    assert_eq!(store.voters().len() as u64, tally.total());
    Ok(())
}

#[test]
fn test_reopen_reproduces_counts_and_membership() -> Result<()> {
    let dir = TempDir::new()?;
    {
        let store = open_local(&dir)?;
        store.cast_vote("John", "11111111")?;
        store.cast_vote("Jane", "22222222")?;
        store.cast_vote("Jane", "33333333")?;
    }

    let reopened = open_local(&dir)?;
    let tally = reopened.tally()?;
    assert_eq!(tally.get(Candidate::John), 1);
    assert_eq!(tally.get(Candidate::Jane), 2);

    for id in ["11111111", "22222222", "33333333"] {
        assert!(reopened.has_voted(id));
        assert_eq!(reopened.cast_vote("John", id)?.message, "Already Voted");
    }
    assert!(reopened.audit()?.is_consistent());

    let votes = std::fs::read_to_string(dir.path().join("votes.csv"))?;
    assert_eq!(votes, "John,1\nJane,2\n");
    let voters = std::fs::read_to_string(dir.path().join("voters.csv"))?;
    assert_eq!(
        voters,
        "voter_id,candidate\n11111111,John\n22222222,Jane\n33333333,Jane\n"
    );
    Ok(())
}

#[test]
fn test_reads_files_written_with_crlf_rows() -> Result<()> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("votes.csv"), "John,3\r\nJane,1\r\n")?;
    std::fs::write(
        dir.path().join("voters.csv"),
        "voter_id,candidate\r\n10000001,John\r\n10000002,John\r\n10000003,John\r\n10000004,Jane\r\n",
    )?;

    let store = open_local(&dir)?;
    assert_eq!(store.tally()?.total(), 4);
    assert_eq!(store.cast_vote("Jane", "10000004")?.message, "Already Voted");
    Ok(())
}

/// 手動編輯過的投票者檔案：每個 ID 仍只能投一次
fn assert_votes_once(dir: &TempDir, voters_csv: &str, fresh_id: &str) -> Result<String> {
    std::fs::write(dir.path().join("voters.csv"), voters_csv)?;
    let store = open_local(dir)?;

    assert!(store.cast_vote("John", fresh_id)?.success);
    for retry in ["John", "Jane"] {
        assert_eq!(store.cast_vote(retry, fresh_id)?.message, "Already Voted");
    }
    assert!(store.has_voted(fresh_id));

    let reopened = open_local(dir)?;
    assert_eq!(reopened.cast_vote("Jane", fresh_id)?.message, "Already Voted");

    Ok(std::fs::read_to_string(dir.path().join("voters.csv"))?)
}

#[test]
fn test_empty_voter_file_gets_header_and_votes_once() -> Result<()> {
    let dir = TempDir::new()?;
    let contents = assert_votes_once(&dir, "", "12345678")?;

    assert_eq!(contents, "voter_id,candidate\n12345678,John\n");
    Ok(())
}

#[test]
fn test_headerless_voter_file_keeps_first_row() -> Result<()> {
    let dir = TempDir::new()?;
    let contents = assert_votes_once(&dir, "11111111,Jane\n", "22222222")?;

    assert_eq!(contents, "11111111,Jane\n22222222,John\n");
    let store = open_local(&dir)?;
    assert_eq!(store.cast_vote("John", "11111111")?.message, "Already Voted");
    Ok(())
}

#[test]
fn test_voter_file_without_trailing_newline_is_not_glued() -> Result<()> {
    let dir = TempDir::new()?;
    let contents = assert_votes_once(&dir, "voter_id,candidate\n11111111,Jane", "22222222")?;

    assert_eq!(contents, "voter_id,candidate\n11111111,Jane\n22222222,John\n");
    let store = open_local(&dir)?;
    assert_eq!(store.cast_vote("John", "11111111")?.message, "Already Voted");
    let voters = store.voters();
    assert_eq!(voters.len(), 2);
    assert_eq!(voters[0].candidate, "Jane");
    Ok(())
}

#[test]
fn test_crlf_voter_file_without_trailing_newline() -> Result<()> {
    let dir = TempDir::new()?;
    let contents = assert_votes_once(&dir, "voter_id,candidate\r\n11111111,Jane", "22222222")?;

    assert!(contents.ends_with("11111111,Jane\n22222222,John\n"));
    Ok(())
}

#[test]
fn test_tally_write_failure_is_surfaced_and_rolled_back() -> Result<()> {
    let storage = FlakyStorage::default();
    let store = VoteStore::open(storage.clone(), &BallotConfig::default())?;

    storage.fail_writes.store(true, Ordering::SeqCst);
    let err = store.cast_vote("John", "12345678").unwrap_err();
    assert!(matches!(err, BallotError::PersistenceError { store: ref store_name, .. } if store_name == "votes.csv"));

    assert_eq!(store.tally()?.total(), 0);
    assert!(!store.has_voted("12345678"));

    // 恢復後同一個 ID 仍可投票
    storage.fail_writes.store(false, Ordering::SeqCst);
    assert!(store.cast_vote("John", "12345678")?.success);
    Ok(())
}

#[test]
fn test_voter_append_failure_restores_persisted_tally() -> Result<()> {
    let storage = FlakyStorage::default();
    let store = VoteStore::open(storage.clone(), &BallotConfig::default())?;
    assert!(store.cast_vote("Jane", "00000001")?.success);

    storage.fail_appends.store(true, Ordering::SeqCst);
    let err = store.cast_vote("John", "00000002").unwrap_err();
    assert!(matches!(err, BallotError::PersistenceError { store: ref store_name, .. } if store_name == "voters.csv"));

    assert_eq!(store.tally()?.get(Candidate::John), 0);
    assert_eq!(
        storage.inner.contents("votes.csv").as_deref(),
        Some("John,0\nJane,1\n")
    );
    assert!(store.audit()?.is_consistent());
    Ok(())
}

#[test]
fn test_initial_tally_write_failure_fails_open() {
    let storage = FlakyStorage::default();
    storage.fail_writes.store(true, Ordering::SeqCst);

    let result = VoteStore::open(storage, &BallotConfig::default());
    assert!(matches!(result, Err(BallotError::PersistenceError { .. })));
}

#[test]
fn test_concurrent_casts_keep_invariant() -> Result<()> {
    let dir = TempDir::new()?;
    let store = Arc::new(open_local(&dir)?);

    let handles: Vec<_> = (0..4u32)
        .map(|worker| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for n in 0..10u32 {
                    // 每個 ID 都會被兩個執行緒搶著投
                    let id = format!("{:08}", 50_000_000 + (worker / 2) * 100 + n);
                    let candidate = if worker % 2 == 0 { "John" } else { "Jane" };
                    store.cast_vote(candidate, &id).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let tally = store.tally()?;
    assert_eq!(tally.total(), 20);
    assert_eq!(store.voters().len(), 20);
    assert!(store.audit()?.is_consistent());
    Ok(())
}
