//! Bulk question editing.
//!
//! Operates over an ordered question list with a selection. Selection is a
//! set of stable entry ids, not array positions: positions shift under
//! deletes and moves, ids never do. Deletion is two-phase (stage, then
//! confirm) and clears the selection afterwards.

use std::collections::BTreeSet;

use crate::models::{Question, QuestionDifficulty, Subject};

/// Stable identity of one entry for the lifetime of the editor.
pub type EntryId = u64;

const DEFAULT_MARKS: i32 = 4;
const DEFAULT_NEGATIVE_MARKS: i32 = -1;

/// A bulk operation applied to every selected entry. The marks variants
/// take the raw form input; non-numeric input falls back to the platform
/// defaults (+4 / -1).
#[derive(Debug, Clone)]
pub enum BulkAction<'a> {
    Marks(&'a str),
    NegativeMarks(&'a str),
    Difficulty(QuestionDifficulty),
    Subject(Subject),
}

#[derive(Debug, Clone)]
struct Entry {
    id: EntryId,
    question: Question,
}

/// The bulk editor.
#[derive(Debug, Clone)]
pub struct BulkEditor {
    entries: Vec<Entry>,
    selection: BTreeSet<EntryId>,
    next_id: EntryId,
    pending_deletion: bool,
}

impl BulkEditor {
    pub fn new(questions: Vec<Question>) -> Self {
        let entries = questions
            .into_iter()
            .enumerate()
            .map(|(i, question)| Entry {
                id: i as EntryId,
                question,
            })
            .collect::<Vec<_>>();
        let next_id = entries.len() as EntryId;
        Self {
            entries,
            selection: BTreeSet::new(),
            next_id,
            pending_deletion: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in current display order.
    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn question(&self, id: EntryId) -> Option<&Question> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.question)
    }

    /// The questions in current order, for saving back to the server.
    pub fn questions(&self) -> Vec<Question> {
        self.entries.iter().map(|e| e.question.clone()).collect()
    }

    pub fn add(&mut self, question: Question) -> EntryId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry { id, question });
        id
    }

    /// Replace one question in place (after a single-question edit).
    pub fn replace(&mut self, id: EntryId, question: Question) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.question = question;
                true
            }
            None => false,
        }
    }

    // --- selection ---

    pub fn selected(&self) -> &BTreeSet<EntryId> {
        &self.selection
    }

    pub fn toggle_select(&mut self, id: EntryId) {
        if self.entries.iter().all(|e| e.id != id) {
            return;
        }
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
    }

    /// Toggle between empty and full selection: anything less than a full
    /// selection becomes full, a full selection becomes empty.
    pub fn select_all(&mut self) {
        if self.selection.len() == self.entries.len() && !self.entries.is_empty() {
            self.selection.clear();
        } else {
            self.selection = self.entries.iter().map(|e| e.id).collect();
        }
    }

    // --- bulk mutation ---

    /// Apply `action` to every selected entry; unselected entries are
    /// untouched. Selection survives (ids are stable, nothing moved).
    pub fn apply_bulk(&mut self, action: BulkAction<'_>) {
        for entry in self
            .entries
            .iter_mut()
            .filter(|e| self.selection.contains(&e.id))
        {
            match &action {
                BulkAction::Marks(input) => {
                    entry.question.marks = input.trim().parse().unwrap_or(DEFAULT_MARKS);
                }
                BulkAction::NegativeMarks(input) => {
                    // Clamp to non-positive; the invariant is enforced here,
                    // not left to form input.
                    entry.question.negative_marks =
                        input.trim().parse().unwrap_or(DEFAULT_NEGATIVE_MARKS).min(0);
                }
                BulkAction::Difficulty(difficulty) => {
                    entry.question.difficulty = *difficulty;
                }
                BulkAction::Subject(subject) => {
                    entry.question.subject = *subject;
                }
            }
        }
    }

    /// Move the entry at `from` to position `to`, shifting the rest.
    pub fn move_entry(&mut self, from: usize, to: usize) {
        if from >= self.entries.len() || to >= self.entries.len() || from == to {
            return;
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
    }

    /// Renumber `qno` to match current array order: exactly 1..=N. This is a
    /// destructive renumbering; any external reference to an old qno is
    /// stale afterwards.
    pub fn renumber(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.question.qno = (i + 1) as u32;
        }
    }

    // --- two-phase deletion ---

    /// Stage deletion of the selected entries. Returns how many would go;
    /// nothing is removed until [`confirm_deletion`](Self::confirm_deletion).
    pub fn stage_deletion(&mut self) -> usize {
        self.pending_deletion = !self.selection.is_empty();
        self.selection.len()
    }

    pub fn deletion_pending(&self) -> bool {
        self.pending_deletion
    }

    pub fn cancel_deletion(&mut self) {
        self.pending_deletion = false;
    }

    /// Remove every staged entry. Selection is cleared afterwards since the
    /// entries it named no longer exist.
    pub fn confirm_deletion(&mut self) -> usize {
        if !self.pending_deletion {
            return 0;
        }
        let before = self.entries.len();
        let selection = std::mem::take(&mut self.selection);
        self.entries.retain(|e| !selection.contains(&e.id));
        self.pending_deletion = false;
        before - self.entries.len()
    }
}
