use crate::db::{HandStore, InsertOutcome, StoreError};
use crate::domain::{Decimal, HandRecord};
use crate::parser::HandParser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Parses hand-history files and stores each hand at most once.
#[derive(Clone)]
pub struct Ingestor {
    store: Arc<dyn HandStore>,
    parser: Arc<HandParser>,
}

impl Ingestor {
    pub fn new(store: Arc<dyn HandStore>, parser: HandParser) -> Self {
        Self {
            store,
            parser: Arc::new(parser),
        }
    }

    /// Store finalized hands, skipping ids that already exist.
    ///
    /// Idempotency has two layers: a lookup before the insert, and the
    /// store reporting `Duplicate` when its unique constraint fires anyway.
    /// Neither relies on a transaction.
    pub async fn store_hands(
        &self,
        hands: &[HandRecord],
    ) -> Result<IngestionResult, IngestionError> {
        let mut result = IngestionResult::default();

        for hand in hands {
            result.hands_parsed += 1;

            if let Err(e) = hand.validate() {
                warn!(hand_id = %hand.hand_id, error = %e, "rejecting invalid hand");
                result.hands_rejected += 1;
                continue;
            }

            if self.store.find_hand(&hand.hand_id).await?.is_some() {
                info!(hand_id = %hand.hand_id, "hand already stored, skipping");
                result.hands_skipped += 1;
                continue;
            }

            match self.store.insert_hand(hand).await? {
                InsertOutcome::Inserted => {
                    result.hands_inserted += 1;
                    result.total_profit += hand.hero_profit;
                }
                InsertOutcome::Duplicate => {
                    info!(hand_id = %hand.hand_id, "hand stored concurrently, skipping");
                    result.hands_skipped += 1;
                }
            }
        }

        Ok(result)
    }

    /// Parse one file and store its hands.
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestionResult, IngestionError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| IngestionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);

        let outcome = self.parser.parse_text(&text);
        let mut result = self.store_hands(&outcome.hands).await?;
        result.files = 1;
        result.hands_discarded = outcome.discarded.len();

        info!(
            path = %path.display(),
            parsed = result.hands_parsed,
            inserted = result.hands_inserted,
            skipped = result.hands_skipped,
            discarded = result.hands_discarded,
            "file ingested"
        );
        Ok(result)
    }

    /// Ingest every `.txt` file under `dir`, in path order.
    ///
    /// A storage error aborts the run; files completed before it stay stored.
    pub async fn ingest_directory(&self, dir: &Path) -> Result<IngestionResult, IngestionError> {
        if !dir.is_dir() {
            return Err(IngestionError::MissingInput(dir.to_path_buf()));
        }

        let files = hand_history_files(dir);
        if files.is_empty() {
            warn!(dir = %dir.display(), "no hand history files found");
        }

        let mut total = IngestionResult::default();
        for path in files {
            let file_result = self.ingest_file(&path).await?;
            total.merge(&file_result);
        }
        Ok(total)
    }
}

fn hand_history_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();
    files.sort();
    files
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionResult {
    pub files: usize,
    pub hands_parsed: usize,
    pub hands_inserted: usize,
    pub hands_skipped: usize,
    pub hands_rejected: usize,
    /// Truncated hands dropped by the parser.
    pub hands_discarded: usize,
    /// Sum of hero profit over newly inserted hands.
    pub total_profit: Decimal,
}

impl IngestionResult {
    pub fn merge(&mut self, other: &IngestionResult) {
        self.files += other.files;
        self.hands_parsed += other.hands_parsed;
        self.hands_inserted += other.hands_inserted;
        self.hands_skipped += other.hands_skipped;
        self.hands_rejected += other.hands_rejected;
        self.hands_discarded += other.hands_discarded;
        self.total_profit += other.total_profit;
    }
}

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("input directory does not exist: {0}")]
    MissingInput(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockHandStore;
    use crate::domain::{GameType, HandResult, PerStreet, Position, Stage};
    use crate::parser::{HandFormat, ParserOptions};
    use tempfile::TempDir;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn parser() -> HandParser {
        HandParser::new(HandFormat::new("Hero").unwrap(), ParserOptions::default())
    }

    fn make_hand(hand_id: &str, profit: &str) -> HandRecord {
        HandRecord {
            hand_id: hand_id.to_string(),
            start_time: "2024/01/15 20:11:32".to_string(),
            game_type: GameType::CashGame,
            small_blind: d("0.02"),
            big_blind: d("0.05"),
            hero_position: Position::BB,
            hero_hole_cards: String::new(),
            flop_cards: String::new(),
            turn_card: String::new(),
            river_card: String::new(),
            hero_investment: PerStreet::default(),
            hero_actions: PerStreet::default(),
            pot_amount: Decimal::zero(),
            jackpot_amount: Decimal::zero(),
            hero_profit: d(profit),
            hero_rake: Decimal::zero(),
            hand_result: HandResult::NoShowdownLoss,
            final_stage: Stage::Preflop,
        }
    }

    #[tokio::test]
    async fn test_store_hands_inserts_new_and_skips_existing() {
        let store = Arc::new(MockHandStore::new().with_hand(make_hand("A", "1")));
        let ingestor = Ingestor::new(store.clone(), parser());

        let result = ingestor
            .store_hands(&[make_hand("A", "1"), make_hand("B", "-0.50")])
            .await
            .unwrap();

        assert_eq!(result.hands_parsed, 2);
        assert_eq!(result.hands_inserted, 1);
        assert_eq!(result.hands_skipped, 1);
        assert_eq!(result.total_profit, d("-0.50"));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_reported_by_insert_is_a_skip() {
        let store = Arc::new(MockHandStore::new().with_racing_writer(make_hand("A", "1")));
        let ingestor = Ingestor::new(store.clone(), parser());

        let result = ingestor.store_hands(&[make_hand("A", "1")]).await.unwrap();

        assert_eq!(result.hands_inserted, 0);
        assert_eq!(result.hands_skipped, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_hand_rejected_before_storage() {
        let store = Arc::new(MockHandStore::new());
        let ingestor = Ingestor::new(store.clone(), parser());

        let result = ingestor.store_hands(&[make_hand("", "1")]).await.unwrap();

        assert_eq!(result.hands_rejected, 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_storage_error_propagates_after_partial_progress() {
        let store = Arc::new(MockHandStore::new().failing_after(1));
        let ingestor = Ingestor::new(store.clone(), parser());

        let err = ingestor
            .store_hands(&[make_hand("A", "1"), make_hand("B", "1")])
            .await
            .unwrap_err();

        assert!(matches!(err, IngestionError::Store(StoreError::Unavailable(_))));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let ingestor = Ingestor::new(Arc::new(MockHandStore::new()), parser());
        let err = ingestor
            .ingest_directory(Path::new("/definitely/not/here"))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestionError::MissingInput(_)));
    }

    #[test]
    fn test_only_txt_files_are_collected_sorted() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        std::fs::write(tmp.path().join("b.txt"), "").unwrap();
        std::fs::write(tmp.path().join("nested").join("a.TXT"), "").unwrap();
        std::fs::write(tmp.path().join("notes.md"), "").unwrap();

        let files = hand_history_files(tmp.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(tmp.path()).unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["b.txt".to_string(), "nested/a.TXT".to_string()]);
    }
}
