use crate::highlight::Highlight;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Persisted highlights for one book: a JSON file plus an in-memory
/// by-chapter lookup. The core consumers only ever see immutable snapshots
/// of the list; every mutation goes through here and saves eagerly.
pub struct HighlightStore {
    pub file_path: PathBuf,
    highlights: Vec<Highlight>,
    // (book_id, chapter) -> highlight indices, insertion order
    by_chapter: HashMap<(String, u32), Vec<usize>>,
}

impl HighlightStore {
    pub fn open(book_id: &str, highlights_dir: Option<&Path>) -> Result<Self> {
        let resolved_dir = match highlights_dir {
            Some(dir) => {
                if !dir.exists() {
                    fs::create_dir_all(dir)?;
                }
                dir.to_path_buf()
            }
            None => Self::default_dir()?,
        };
        let book_hash = format!("{:x}", md5::compute(book_id.as_bytes()));
        let file_path = resolved_dir.join(format!("book_{book_hash}.json"));
        Self::open_with_path(file_path)
    }

    fn open_with_path(file_path: PathBuf) -> Result<Self> {
        let highlights = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            Vec::new()
        };

        let mut store = Self {
            file_path,
            highlights: Vec::new(),
            by_chapter: HashMap::new(),
        };

        for highlight in highlights {
            store.add_to_index(&highlight);
            store.highlights.push(highlight);
        }

        Ok(store)
    }

    pub fn add(&mut self, highlight: Highlight) -> Result<()> {
        self.add_to_index(&highlight);
        self.highlights.push(highlight);
        self.save_to_disk()
    }

    /// Full replacement keyed by id; there is no partial field update.
    pub fn update(&mut self, highlight: Highlight) -> Result<()> {
        let idx = self
            .find_index(highlight.id)
            .context("Highlight not found")?;
        self.highlights[idx] = highlight;
        self.rebuild_index();
        self.save_to_disk()
    }

    pub fn delete(&mut self, id: Uuid) -> Result<()> {
        let idx = self.find_index(id).context("Highlight not found")?;
        self.highlights.remove(idx);
        self.rebuild_index();
        self.save_to_disk()
    }

    pub fn get(&self, id: Uuid) -> Option<&Highlight> {
        self.find_index(id).map(|idx| &self.highlights[idx])
    }

    /// Highlights touching one chapter, in insertion order. Overlay
    /// precedence is list order, so this order is load-bearing.
    pub fn chapter_highlights(&self, book_id: &str, chapter: u32) -> Vec<&Highlight> {
        self.by_chapter
            .get(&(book_id.to_string(), chapter))
            .map(|indices| indices.iter().map(|&i| &self.highlights[i]).collect())
            .unwrap_or_default()
    }

    pub fn all(&self) -> &[Highlight] {
        &self.highlights
    }

    fn default_dir() -> Result<PathBuf> {
        let dir = if let Ok(custom_dir) = std::env::var("VERSEMARK_HIGHLIGHTS_DIR") {
            PathBuf::from(custom_dir)
        } else {
            std::env::current_dir()
                .context("Could not determine current directory")?
                .join(".versemark_highlights")
        };

        if !dir.exists() {
            fs::create_dir_all(&dir).context("Failed to create highlights directory")?;
        }

        Ok(dir)
    }

    fn load_from_file(file_path: &Path) -> Result<Vec<Highlight>> {
        let content = fs::read_to_string(file_path).context("Failed to read highlights file")?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).context("Failed to parse highlights JSON")
    }

    fn save_to_disk(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.highlights)
            .context("Failed to serialize highlights")?;

        fs::write(&self.file_path, json).context("Failed to write highlights file")?;

        Ok(())
    }

    fn find_index(&self, id: Uuid) -> Option<usize> {
        self.highlights.iter().position(|h| h.id == id)
    }

    fn add_to_index(&mut self, highlight: &Highlight) {
        let idx = self.highlights.len();
        self.by_chapter
            .entry((highlight.range.book_id.clone(), highlight.range.chapter))
            .or_default()
            .push(idx);
    }

    fn rebuild_index(&mut self) {
        self.by_chapter.clear();
        for (idx, highlight) in self.highlights.iter().enumerate() {
            self.by_chapter
                .entry((highlight.range.book_id.clone(), highlight.range.chapter))
                .or_default()
                .push(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::HighlightColor;
    use crate::position::VerseRange;
    use tempfile::TempDir;

    fn create_store() -> (TempDir, HighlightStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = HighlightStore::open("john", Some(temp_dir.path())).unwrap();
        (temp_dir, store)
    }

    fn verse_highlight(chapter: u32, verse: u32, color: HighlightColor) -> Highlight {
        Highlight::verse_level(VerseRange::single("john", chapter, verse), color)
    }

    #[test]
    fn test_add_and_lookup() {
        let (_temp_dir, mut store) = create_store();

        let highlight = verse_highlight(3, 16, HighlightColor::Yellow);
        store.add(highlight.clone()).unwrap();

        let found = store.chapter_highlights("john", 3);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, highlight.id);
        assert!(store.chapter_highlights("john", 4).is_empty());
        assert!(store.chapter_highlights("mark", 3).is_empty());
    }

    #[test]
    fn test_update_is_full_replacement() {
        let (_temp_dir, mut store) = create_store();

        let highlight = verse_highlight(3, 16, HighlightColor::Yellow);
        store.add(highlight.clone()).unwrap();

        let mut replacement = highlight.clone();
        replacement.color = HighlightColor::Pink;
        replacement.note = Some("for later".to_string());
        store.update(replacement).unwrap();

        let found = store.get(highlight.id).unwrap();
        assert_eq!(found.color, HighlightColor::Pink);
        assert_eq!(found.note.as_deref(), Some("for later"));
    }

    #[test]
    fn test_update_unknown_id_fails() {
        let (_temp_dir, mut store) = create_store();
        let orphan = verse_highlight(1, 1, HighlightColor::Blue);
        assert!(store.update(orphan).is_err());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, mut store) = create_store();

        let highlight = verse_highlight(3, 16, HighlightColor::Green);
        store.add(highlight.clone()).unwrap();
        store.delete(highlight.id).unwrap();

        assert!(store.get(highlight.id).is_none());
        assert!(store.chapter_highlights("john", 3).is_empty());
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let highlight = verse_highlight(10, 11, HighlightColor::Orange).with_note("shepherd");

        {
            let mut store = HighlightStore::open("john", Some(temp_dir.path())).unwrap();
            store.add(highlight.clone()).unwrap();
        }

        let store = HighlightStore::open("john", Some(temp_dir.path())).unwrap();
        assert_eq!(store.all(), &[highlight]);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let (_temp_dir, mut store) = create_store();

        let first = verse_highlight(3, 16, HighlightColor::Yellow);
        let second = verse_highlight(3, 16, HighlightColor::Blue);
        store.add(first.clone()).unwrap();
        store.add(second.clone()).unwrap();

        let found = store.chapter_highlights("john", 3);
        assert_eq!(found[0].id, first.id);
        assert_eq!(found[1].id, second.id);
    }

    #[test]
    fn test_books_hash_to_distinct_files() {
        let temp_dir = TempDir::new().unwrap();
        let john = HighlightStore::open("john", Some(temp_dir.path())).unwrap();
        let mark = HighlightStore::open("mark", Some(temp_dir.path())).unwrap();
        assert_ne!(john.file_path, mark.file_path);
    }
}
