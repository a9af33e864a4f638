//! Single-question form.
//!
//! Holds a working copy of one question; `save` is all-or-nothing. Either
//! every validation rule passes and the question is handed back, or the
//! field-level errors are returned and nothing is saved.

use crate::models::{
    CorrectAnswer, FieldError, Question, QuestionDifficulty, QuestionType, Subject,
};

/// Question form state.
#[derive(Debug, Clone)]
pub struct QuestionEditor {
    draft: Question,
}

impl Default for QuestionEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionEditor {
    /// Create mode: qno 1, Physics MCQ, +4/-1, medium.
    pub fn new() -> Self {
        Self {
            draft: Question::default(),
        }
    }

    /// Edit mode, seeded from an existing question.
    pub fn edit(question: Question) -> Self {
        Self { draft: question }
    }

    pub fn draft(&self) -> &Question {
        &self.draft
    }

    pub fn set_qno(&mut self, qno: u32) -> &mut Self {
        self.draft.qno = qno;
        self
    }

    pub fn set_subject(&mut self, subject: Subject) -> &mut Self {
        self.draft.subject = subject;
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.draft.text = text.into();
        self
    }

    /// Overwrite one option slot. Out-of-range indices are ignored; the form
    /// renders exactly the slots that exist.
    pub fn set_option(&mut self, index: usize, text: impl Into<String>) -> &mut Self {
        if let Some(slot) = self.draft.options.get_mut(index) {
            *slot = text.into();
        }
        self
    }

    pub fn set_correct_option(&mut self, index: usize) -> &mut Self {
        self.draft.correct = CorrectAnswer::OptionIndex(index);
        self
    }

    pub fn set_integer_answer(&mut self, value: i64) -> &mut Self {
        self.draft.correct = CorrectAnswer::Integer(value);
        self
    }

    pub fn set_marks(&mut self, marks: i32) -> &mut Self {
        self.draft.marks = marks;
        self
    }

    pub fn set_negative_marks(&mut self, negative_marks: i32) -> &mut Self {
        self.draft.negative_marks = negative_marks;
        self
    }

    /// Switching type reshapes the answer fields: choice types get their
    /// four option slots back, Integer drops options and switches the
    /// answer to a literal.
    pub fn set_question_type(&mut self, question_type: QuestionType) -> &mut Self {
        if question_type == self.draft.question_type {
            return self;
        }
        self.draft.question_type = question_type;
        if question_type.has_options() {
            if self.draft.options.is_empty() {
                self.draft.options = vec![String::new(); 4];
            }
            self.draft.correct = CorrectAnswer::OptionIndex(0);
        } else {
            self.draft.options.clear();
            self.draft.correct = CorrectAnswer::Integer(0);
        }
        self
    }

    pub fn set_difficulty(&mut self, difficulty: QuestionDifficulty) -> &mut Self {
        self.draft.difficulty = difficulty;
        self
    }

    pub fn set_explanation(&mut self, explanation: Option<String>) -> &mut Self {
        self.draft.explanation = explanation;
        self
    }

    pub fn set_image_url(&mut self, image_url: Option<String>) -> &mut Self {
        self.draft.image_url = image_url;
        self
    }

    /// Validate and hand the question back. No partial save: on any error
    /// the editor state is untouched and nothing is returned.
    pub fn save(&self) -> Result<Question, Vec<FieldError>> {
        let errors = self.draft.validate();
        if errors.is_empty() {
            Ok(self.draft.clone())
        } else {
            Err(errors)
        }
    }
}
