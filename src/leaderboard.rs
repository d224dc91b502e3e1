use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::GameError;
use crate::hooks::{RunRecorder, RunSummary};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Days,
    Items,
    Fish,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Days, Category::Items, Category::Fish];

    pub fn label(self) -> &'static str {
        match self {
            Category::Days => "Days Survived",
            Category::Items => "Items Collected",
            Category::Fish => "Fish Caught",
        }
    }

    fn score(self, summary: &RunSummary) -> u32 {
        match self {
            Category::Days => summary.day,
            Category::Items => summary.total_items_collected,
            Category::Fish => summary.fish_caught,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

/// The three top lists, each sorted best first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTables {
    #[serde(default)]
    pub days: Vec<ScoreEntry>,
    #[serde(default)]
    pub items: Vec<ScoreEntry>,
    #[serde(default)]
    pub fish: Vec<ScoreEntry>,
}

impl ScoreTables {
    pub fn table(&self, category: Category) -> &[ScoreEntry] {
        match category {
            Category::Days => &self.days,
            Category::Items => &self.items,
            Category::Fish => &self.fish,
        }
    }

    fn table_mut(&mut self, category: Category) -> &mut Vec<ScoreEntry> {
        match category {
            Category::Days => &mut self.days,
            Category::Items => &mut self.items,
            Category::Fish => &mut self.fish,
        }
    }

    /// Positive and either room left or better than the current last place.
    pub fn qualifies(&self, category: Category, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        let table = self.table(category);
        table.len() < config::LEADERBOARD_MAX_ENTRIES || table.last().is_some_and(|e| score > e.score)
    }

    /// Insert a qualifying score. Returns its 0-based rank.
    pub fn submit(&mut self, category: Category, name: &str, score: u32) -> Option<usize> {
        if !self.qualifies(category, score) {
            return None;
        }
        let table = self.table_mut(category);
        // Ties keep the older entry ahead.
        let rank = table.iter().position(|e| score > e.score).unwrap_or(table.len());
        table.insert(
            rank,
            ScoreEntry {
                name: name.to_string(),
                score,
            },
        );
        table.truncate(config::LEADERBOARD_MAX_ENTRIES);
        Some(rank)
    }

    fn normalize(&mut self) {
        for category in Category::ALL {
            let table = self.table_mut(category);
            table.sort_by(|a, b| b.score.cmp(&a.score));
            table.truncate(config::LEADERBOARD_MAX_ENTRIES);
        }
    }
}

/// JSON-file backed high scores.
#[derive(Clone, Debug)]
pub struct Leaderboard {
    path: PathBuf,
    pub player_name: String,
    pub tables: ScoreTables,
    /// Placements earned by the most recent run.
    pub last_placements: Vec<(Category, usize)>,
}

impl Leaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            player_name: "Survivor".to_string(),
            tables: ScoreTables::default(),
            last_placements: Vec::new(),
        }
    }

    /// Load from `path`, starting empty when the file is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut board = Self::new(path);
        match Self::load(&board.path) {
            Ok(tables) => board.tables = tables,
            Err(e) => log::error!("leaderboard not loaded, starting empty: {e}"),
        }
        board
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(path: &Path) -> Result<ScoreTables, GameError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ScoreTables::default()),
            Err(source) => {
                return Err(GameError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let mut tables: ScoreTables = serde_json::from_str(&text).map_err(|source| GameError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tables.normalize();
        Ok(tables)
    }

    pub fn save(&self) -> Result<(), GameError> {
        let json = serde_json::to_string_pretty(&self.tables).map_err(|source| GameError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|source| GameError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Submit a run to every table it qualifies for.
    pub fn submit_run(&mut self, summary: &RunSummary) -> Vec<(Category, usize)> {
        let name = self.player_name.clone();
        Category::ALL
            .into_iter()
            .filter_map(|c| self.tables.submit(c, &name, c.score(summary)).map(|rank| (c, rank)))
            .collect()
    }
}

impl RunRecorder for Leaderboard {
    fn record_run(&mut self, summary: RunSummary) {
        self.last_placements = self.submit_run(&summary);
        if self.last_placements.is_empty() {
            return;
        }
        match self.save() {
            Ok(()) => log::info!(
                "leaderboard updated ({} placements) at {}",
                self.last_placements.len(),
                self.path.display()
            ),
            Err(e) => log::error!("could not save leaderboard: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file(name: &str) -> PathBuf {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        std::env::temp_dir().join(format!("{name}_{nanos}.json"))
    }

    fn run(day: u32, items: u32, fish: u32) -> RunSummary {
        RunSummary {
            day,
            total_items_collected: items,
            fish_caught: fish,
        }
    }

    #[test]
    fn zero_never_qualifies() {
        let tables = ScoreTables::default();
        assert!(!tables.qualifies(Category::Fish, 0));
        assert!(tables.qualifies(Category::Fish, 1));
    }

    #[test]
    fn full_table_needs_to_beat_last_place() {
        let mut tables = ScoreTables::default();
        for score in 1..=10 {
            tables.submit(Category::Days, "a", score);
        }
        assert_eq!(tables.days.len(), 10);
        assert!(!tables.qualifies(Category::Days, 1));
        assert!(tables.qualifies(Category::Days, 2));

        assert_eq!(tables.submit(Category::Days, "b", 7), Some(4));
        assert_eq!(tables.days.len(), 10);
        assert_eq!(tables.days.last().map(|e| e.score), Some(2));
        let scores: Vec<u32> = tables.days.iter().map(|e| e.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn run_lands_in_each_category_separately() {
        let mut board = Leaderboard::new(temp_file("ld_categories"));
        let placements = board.submit_run(&run(3, 120, 0));
        assert_eq!(placements, vec![(Category::Days, 0), (Category::Items, 0)]);
        assert!(board.tables.fish.is_empty());
        assert_eq!(board.tables.items[0].name, "Survivor");
    }

    #[test]
    fn missing_file_loads_empty() {
        let tables = Leaderboard::load(&temp_file("ld_missing")).unwrap();
        assert_eq!(tables, ScoreTables::default());
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let path = temp_file("ld_bad");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Leaderboard::load(&path).unwrap_err();
        assert!(matches!(err, GameError::Json { .. }));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn recorded_runs_persist_to_disk() {
        let path = temp_file("ld_persist");
        let mut board = Leaderboard::open(&path);
        board.record_run(run(5, 300, 4));
        board.record_run(run(2, 10, 0));

        let reloaded = Leaderboard::open(&path);
        assert_eq!(reloaded.tables, board.tables);
        assert_eq!(reloaded.tables.days.iter().map(|e| e.score).collect::<Vec<_>>(), vec![5, 2]);
        assert_eq!(reloaded.tables.fish.len(), 1);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn loading_sorts_and_trims_hand_edited_tables() {
        let path = temp_file("ld_unsorted");
        let entries: Vec<String> = (0..12).map(|i| format!(r#"{{"name":"n","score":{i}}}"#)).collect();
        std::fs::write(&path, format!(r#"{{"items":[{}]}}"#, entries.join(","))).unwrap();

        let tables = Leaderboard::load(&path).unwrap();
        assert_eq!(tables.items.len(), 10);
        assert_eq!(tables.items[0].score, 11);
        assert!(tables.days.is_empty());
        std::fs::remove_file(&path).ok();
    }
}
