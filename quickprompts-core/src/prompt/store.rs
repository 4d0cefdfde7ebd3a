use std::collections::HashSet;
use std::sync::Mutex;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

use crate::ai::types::CategorySuggestion;
use crate::prompt::types::{default_name, Prompt, PromptDraft, DEFAULT_COLOR, DEFAULT_ICON};
use crate::storage::error::StorageError;
use crate::storage::prompts::PromptStorage;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid prompt: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// What a mutation did. `NotFound` and `AtBoundary` are tolerated no-ops:
/// nothing was written and the collection is unchanged.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    NotFound,
    AtBoundary,
}

/// The prompt collection: an in-memory ordered list backed by a
/// [`PromptStorage`], with a watch channel publishing the collection to
/// observers after every successful persist.
///
/// Every mutation takes the inner lock for its whole read-modify-write, so
/// overlapping calls are serialized rather than racing on a stale snapshot.
/// In-memory state only changes after the write succeeds; on a storage
/// failure the last persisted collection remains what callers observe.
pub struct PromptStore {
    storage: PromptStorage,
    inner: Mutex<Vec<Prompt>>,
    observers: watch::Sender<Vec<Prompt>>,
}

impl PromptStore {
    /// Load the persisted collection and build a store around it.
    pub fn open(storage: PromptStorage) -> Result<Self, StoreError> {
        let prompts = storage.load_all()?;
        debug!(count = prompts.len(), "loaded prompt collection");
        let (observers, _) = watch::channel(prompts.clone());
        Ok(Self {
            storage,
            inner: Mutex::new(prompts),
            observers,
        })
    }

    /// Snapshot of the collection in display order.
    pub fn prompts(&self) -> Vec<Prompt> {
        self.inner.lock().unwrap().clone()
    }

    pub fn get(&self, id: &str) -> Option<Prompt> {
        self.inner.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }

    /// Observe the collection. The receiver holds the latest successfully
    /// persisted state and updates after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Prompt>> {
        self.observers.subscribe()
    }

    pub fn create(&self, draft: PromptDraft) -> Result<Prompt, StoreError> {
        validate_text(&draft.text)?;

        let mut guard = self.inner.lock().unwrap();
        let name = if draft.name.trim().is_empty() {
            default_name(&draft.text)
        } else {
            draft.name.trim().to_string()
        };
        let prompt = Prompt {
            id: allocate_id(&guard),
            name,
            text: draft.text,
            category: draft.category,
            color: draft.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            icon: draft.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
        };

        let mut next = guard.clone();
        next.push(prompt.clone());
        self.commit(&mut guard, next)?;
        Ok(prompt)
    }

    pub fn update(&self, updated: Prompt) -> Result<MutationOutcome, StoreError> {
        validate_text(&updated.text)?;

        let mut guard = self.inner.lock().unwrap();
        let Some(index) = guard.iter().position(|p| p.id == updated.id) else {
            debug!(id = %updated.id, "update target not found");
            return Ok(MutationOutcome::NotFound);
        };

        let mut next = guard.clone();
        next[index] = updated;
        self.commit(&mut guard, next)?;
        Ok(MutationOutcome::Applied)
    }

    pub fn remove(&self, id: &str) -> Result<MutationOutcome, StoreError> {
        let mut guard = self.inner.lock().unwrap();
        let Some(index) = guard.iter().position(|p| p.id == id) else {
            debug!(id, "remove target not found");
            return Ok(MutationOutcome::NotFound);
        };

        let mut next = guard.clone();
        next.remove(index);
        self.commit(&mut guard, next)?;
        Ok(MutationOutcome::Applied)
    }

    /// Swap a prompt with its immediate neighbor in the given direction.
    pub fn reorder(&self, id: &str, direction: Direction) -> Result<MutationOutcome, StoreError> {
        let mut guard = self.inner.lock().unwrap();
        let Some(index) = guard.iter().position(|p| p.id == id) else {
            return Ok(MutationOutcome::NotFound);
        };
        let neighbor = match direction {
            Direction::Up => {
                if index == 0 {
                    return Ok(MutationOutcome::AtBoundary);
                }
                index - 1
            }
            Direction::Down => {
                if index + 1 == guard.len() {
                    return Ok(MutationOutcome::AtBoundary);
                }
                index + 1
            }
        };

        let mut next = guard.clone();
        next.swap(index, neighbor);
        self.commit(&mut guard, next)?;
        Ok(MutationOutcome::Applied)
    }

    /// Discard the current collection and persist `prompts` in its place.
    pub fn replace_all(&self, prompts: Vec<Prompt>) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().unwrap();
        self.commit(&mut guard, prompts)
    }

    /// Append imported prompts whose id is not already present. Returns how
    /// many were appended; 0 means nothing to merge and nothing was written.
    pub fn merge_unique(&self, imported: Vec<Prompt>) -> Result<usize, StoreError> {
        let mut guard = self.inner.lock().unwrap();
        let fresh: Vec<Prompt> = {
            let existing: HashSet<&str> = guard.iter().map(|p| p.id.as_str()).collect();
            imported
                .into_iter()
                .filter(|p| !existing.contains(p.id.as_str()))
                .collect()
        };

        if fresh.is_empty() {
            debug!("merge found no new prompts");
            return Ok(0);
        }

        let count = fresh.len();
        let mut next = guard.clone();
        next.extend(fresh);
        self.commit(&mut guard, next)?;
        Ok(count)
    }

    /// Set the category of each prompt named by a suggestion, in one write.
    /// Suggestions for unknown ids are skipped; returns how many prompts
    /// actually changed.
    pub fn apply_categories(
        &self,
        suggestions: &[CategorySuggestion],
    ) -> Result<usize, StoreError> {
        let mut guard = self.inner.lock().unwrap();
        let mut next = guard.clone();
        let mut changed = 0;
        for suggestion in suggestions {
            let Some(prompt) = next.iter_mut().find(|p| p.id == suggestion.prompt_id) else {
                continue;
            };
            if prompt.category != suggestion.category {
                prompt.category = suggestion.category.clone();
                changed += 1;
            }
        }

        if changed == 0 {
            return Ok(0);
        }
        self.commit(&mut guard, next)?;
        Ok(changed)
    }

    /// Persist `next`, then make it the in-memory state and publish it.
    fn commit(&self, current: &mut Vec<Prompt>, next: Vec<Prompt>) -> Result<(), StoreError> {
        self.storage.save_all(&next)?;
        *current = next;
        self.observers.send_replace(current.clone());
        Ok(())
    }
}

fn validate_text(text: &str) -> Result<(), StoreError> {
    if text.trim().is_empty() {
        return Err(StoreError::Validation(
            "prompt text cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Millisecond timestamp, bumped past any id already in the collection so
/// back-to-back creates in the same millisecond still get distinct ids.
fn allocate_id(existing: &[Prompt]) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    while existing.iter().any(|p| p.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}
