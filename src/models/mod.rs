pub mod loaders;
pub mod question;
pub mod subject;

pub use loaders::{load_all_draft_files, load_draft_file, DraftFile};
pub use question::{
    CorrectAnswer, FieldError, Question, QuestionDifficulty, QuestionType,
};
pub use subject::Subject;
pub use test::{
    ExamType, TabSwitchPolicy, TestDifficulty, TestDraft, TestSettings, Visibility,
};
