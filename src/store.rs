//! Per-document highlight persistence.
//!
//! One YAML file per document, named by the md5 of the document's file
//! name, kept under `PAGEMARK_HIGHLIGHTS_DIR` (or `.pagemark_highlights`
//! in the current directory). The page index is rebuilt on every
//! mutation; reads hand out borrowed views.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::highlight::Highlight;

pub struct DocumentHighlights {
    pub file_path: PathBuf,
    highlights: Vec<Highlight>,
    // page_number -> highlight indices
    by_page: HashMap<u32, Vec<usize>>,
}

impl DocumentHighlights {
    pub fn open(document_path: &Path, highlights_dir: Option<&Path>) -> Result<Self> {
        let document_hash = Self::compute_document_hash(document_path);
        let resolved_dir = match highlights_dir {
            Some(dir) => {
                if !dir.exists() {
                    fs::create_dir_all(dir)?;
                }
                dir.to_path_buf()
            }
            None => Self::default_dir()?,
        };
        let file_path = resolved_dir.join(format!("doc_{document_hash}.yaml"));
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
            highlights,
            by_page: HashMap::new(),
        };
        store.sort_highlights();
        Ok(store)
    }

    pub fn add(&mut self, highlight: Highlight) -> Result<()> {
        self.highlights.push(highlight);
        self.sort_highlights();
        self.save_to_disk()
    }

    /// Geometry fields never change after creation; the note is the only
    /// in-place mutation.
    pub fn update_note(&mut self, id: Uuid, note: String) -> Result<()> {
        let idx = self.find_index(id).context("Highlight not found")?;
        self.highlights[idx].note = note;
        self.save_to_disk()
    }

    pub fn delete(&mut self, id: Uuid) -> Result<()> {
        let idx = self.find_index(id).context("Highlight not found")?;
        self.highlights.remove(idx);
        self.rebuild_index();
        self.save_to_disk()
    }

    /// Highlights on one page, in stored order.
    pub fn page_highlights(&self, page: u32) -> Vec<&Highlight> {
        self.by_page
            .get(&page)
            .map(|indices| indices.iter().map(|&i| &self.highlights[i]).collect())
            .unwrap_or_default()
    }

    pub fn all(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn get(&self, id: Uuid) -> Option<&Highlight> {
        self.find_index(id).map(|i| &self.highlights[i])
    }

    fn compute_document_hash(document_path: &Path) -> String {
        let filename = document_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_else(|| document_path.to_str().unwrap_or("unknown"));

        let digest = md5::compute(filename.as_bytes());
        format!("{digest:x}")
    }

    fn default_dir() -> Result<PathBuf> {
        let dir = if let Ok(custom_dir) = std::env::var("PAGEMARK_HIGHLIGHTS_DIR") {
            PathBuf::from(custom_dir)
        } else {
            std::env::current_dir()
                .context("Could not determine current directory")?
                .join(".pagemark_highlights")
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

        serde_yaml::from_str(&content).context("Failed to parse highlights YAML")
    }

    fn save_to_disk(&self) -> Result<()> {
        let yaml =
            serde_yaml::to_string(&self.highlights).context("Failed to serialize highlights")?;
        fs::write(&self.file_path, yaml).context("Failed to write highlights file")?;
        Ok(())
    }

    fn find_index(&self, id: Uuid) -> Option<usize> {
        self.highlights.iter().position(|h| h.id == id)
    }

    fn sort_highlights(&mut self) {
        self.highlights
            .sort_by(|a, b| {
                a.page_number
                    .cmp(&b.page_number)
                    .then(a.created_at.cmp(&b.created_at))
            });
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.by_page.clear();
        for (idx, highlight) in self.highlights.iter().enumerate() {
            self.by_page
                .entry(highlight.page_number)
                .or_default()
                .push(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PixelRect;
    use tempfile::TempDir;

    fn create_test_env() -> (TempDir, PathBuf, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let doc_path = temp_dir.path().join("thesis.pdf");
        fs::write(&doc_path, "fake pdf content").unwrap();

        let highlights_dir = temp_dir.path().join("highlights");
        fs::create_dir_all(&highlights_dir).unwrap();

        (temp_dir, doc_path, highlights_dir)
    }

    fn create_highlight(page: u32, text: &str) -> Highlight {
        Highlight::capture(
            "thesis.pdf",
            page,
            50,
            text,
            PixelRect::new(180.0, 150.0, 160.0, 20.0),
            PixelRect::new(100.0, 50.0, 800.0, 1000.0),
        )
        .unwrap()
    }

    #[test]
    fn add_and_list_by_page() {
        let (_temp_dir, doc_path, dir) = create_test_env();
        let mut store = DocumentHighlights::open(&doc_path, Some(&dir)).unwrap();

        store.add(create_highlight(3, "first")).unwrap();
        store.add(create_highlight(7, "second")).unwrap();

        let page3 = store.page_highlights(3);
        assert_eq!(page3.len(), 1);
        assert_eq!(page3[0].text, "first");
        assert!(store.page_highlights(4).is_empty());
    }

    #[test]
    fn ordering_is_page_then_creation_time() {
        let (_temp_dir, doc_path, dir) = create_test_env();
        let mut store = DocumentHighlights::open(&doc_path, Some(&dir)).unwrap();

        store.add(create_highlight(7, "late page")).unwrap();
        store.add(create_highlight(2, "early page")).unwrap();
        store.add(create_highlight(7, "late page again")).unwrap();

        let all = store.all();
        assert_eq!(all[0].text, "early page");
        assert_eq!(all[1].text, "late page");
        assert_eq!(all[2].text, "late page again");
    }

    #[test]
    fn update_note_leaves_geometry_alone() {
        let (_temp_dir, doc_path, dir) = create_test_env();
        let mut store = DocumentHighlights::open(&doc_path, Some(&dir)).unwrap();

        let highlight = create_highlight(1, "passage");
        let id = highlight.id;
        let rect = highlight.rect;
        store.add(highlight).unwrap();

        store.update_note(id, "important".to_string()).unwrap();

        let stored = store.get(id).unwrap();
        assert_eq!(stored.note, "important");
        assert_eq!(stored.rect, rect);
    }

    #[test]
    fn delete_removes_from_page_index() {
        let (_temp_dir, doc_path, dir) = create_test_env();
        let mut store = DocumentHighlights::open(&doc_path, Some(&dir)).unwrap();

        let highlight = create_highlight(5, "delete me");
        let id = highlight.id;
        store.add(highlight).unwrap();

        store.delete(id).unwrap();
        assert!(store.page_highlights(5).is_empty());
        assert!(store.get(id).is_none());
    }

    #[test]
    fn reopen_reads_back_saved_highlights() {
        let (_temp_dir, doc_path, dir) = create_test_env();
        let id;
        {
            let mut store = DocumentHighlights::open(&doc_path, Some(&dir)).unwrap();
            let highlight = create_highlight(4, "survives restart");
            id = highlight.id;
            store.add(highlight).unwrap();
        }

        let reopened = DocumentHighlights::open(&doc_path, Some(&dir)).unwrap();
        let stored = reopened.get(id).unwrap();
        assert_eq!(stored.text, "survives restart");
        assert_eq!(stored.page_number, 4);
    }

    #[test]
    fn empty_file_loads_as_empty_store() {
        let (_temp_dir, doc_path, dir) = create_test_env();
        let store = DocumentHighlights::open(&doc_path, Some(&dir)).unwrap();
        fs::write(&store.file_path, "  \n").unwrap();

        let reopened = DocumentHighlights::open_with_path(store.file_path.clone()).unwrap();
        assert!(reopened.all().is_empty());
    }

    #[test]
    fn same_document_name_maps_to_same_file() {
        let (_temp_dir, doc_path, dir) = create_test_env();
        let a = DocumentHighlights::open(&doc_path, Some(&dir)).unwrap();
        let b = DocumentHighlights::open(&doc_path, Some(&dir)).unwrap();
        assert_eq!(a.file_path, b.file_path);
    }
}
