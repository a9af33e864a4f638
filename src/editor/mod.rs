pub mod bulk_editor;
pub mod question_editor;

pub use bulk_editor::{BulkAction, BulkEditor, EntryId};
pub use question_editor::QuestionEditor;
