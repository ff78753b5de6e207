use std::sync::Mutex;

use tracing::info;

use super::validation;

/// Default cap on stored suggestions.
pub const DEFAULT_MAX_ENTRIES: usize = 200;

/// In-memory suggestion store with case-insensitive de-duplication. The
/// list is unpersisted; the embedder seeds it and drains it.
pub struct SuggestionBox {
    entries: Mutex<Vec<String>>,
    max_entries: usize,
}

impl SuggestionBox {
    pub fn new(max_entries: usize) -> Self {
        Self::with_entries(max_entries, Vec::new())
    }

    pub fn with_entries(max_entries: usize, entries: Vec<String>) -> Self {
        Self {
            entries: Mutex::new(entries),
            max_entries,
        }
    }

    /// Add a suggestion. Rejects blank or oversized entries,
    /// case-insensitive duplicates, and additions beyond the capacity.
    pub fn add(&self, entry: &str) -> Result<(), String> {
        validation::validate_suggestion(entry)?;
        let needle = entry.to_lowercase();

        let mut entries = self.entries.lock().unwrap();
        if entries.iter().any(|e| e.to_lowercase() == needle) {
            return Err("Suggestion already exists".into());
        }
        if entries.len() >= self.max_entries {
            return Err(format!(
                "Suggestion list is full (max {} entries)",
                self.max_entries
            ));
        }
        entries.push(entry.to_string());
        info!(total = entries.len(), "suggestion added");
        Ok(())
    }

    /// Remove a suggestion by case-insensitive match. The matched element is
    /// removed, whatever its original casing.
    pub fn remove(&self, entry: &str) -> Result<(), String> {
        let needle = entry.to_lowercase();

        let mut entries = self.entries.lock().unwrap();
        let Some(index) = entries.iter().position(|e| e.to_lowercase() == needle) else {
            return Err("No matching suggestion".into());
        };
        entries.remove(index);
        info!(total = entries.len(), "suggestion removed");
        Ok(())
    }

    /// Current suggestions, oldest first.
    pub fn list(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}
