//! Question record and its validation rules.

use serde::{Deserialize, Serialize};

use crate::models::subject::Subject;

/// Question type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "MCQ")]
    Mcq,
    #[serde(rename = "MSQ")]
    Msq,
    Integer,
}

impl QuestionType {
    /// MCQ and MSQ carry option lists; Integer questions have none.
    pub fn has_options(self) -> bool {
        matches!(self, QuestionType::Mcq | QuestionType::Msq)
    }
}

/// Per-question difficulty (distinct from the test-level scale, which has
/// a `Mixed` level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionDifficulty {
    Easy,
    Medium,
    Hard,
}

/// Correct answer, typed by question kind. On the wire both variants are one
/// integer field (`correctOptionIndex`); which one it means depends on
/// `questionType`. The source overloaded a single integer for both and that
/// ambiguity is exactly what this enum removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectAnswer {
    /// Zero-based index into `options` (MCQ/MSQ).
    OptionIndex(usize),
    /// Literal integer answer (Integer type).
    Integer(i64),
}

impl CorrectAnswer {
    fn to_wire(self) -> i64 {
        match self {
            CorrectAnswer::OptionIndex(i) => i as i64,
            CorrectAnswer::Integer(v) => v,
        }
    }

    fn from_wire(value: i64, question_type: QuestionType) -> Self {
        if question_type.has_options() {
            CorrectAnswer::OptionIndex(value.max(0) as usize)
        } else {
            CorrectAnswer::Integer(value)
        }
    }
}

/// One question of a test.
///
/// `qno` is 1-based, unique within a test, and order-significant; after a
/// renumber it is contiguous 1..N.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "QuestionWire", into = "QuestionWire")]
pub struct Question {
    pub qno: u32,
    pub subject: Subject,
    pub text: String,
    /// 0-4 option strings; empty for Integer questions.
    pub options: Vec<String>,
    pub correct: CorrectAnswer,
    pub marks: i32,
    pub negative_marks: i32,
    pub question_type: QuestionType,
    pub difficulty: QuestionDifficulty,
    pub explanation: Option<String>,
    pub image_url: Option<String>,
}

/// Wire shape: camelCase field names, correct answer as a bare integer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionWire {
    #[serde(default = "default_qno")]
    qno: u32,
    subject: Subject,
    text: String,
    #[serde(default)]
    options: Vec<String>,
    correct_option_index: i64,
    marks: i32,
    negative_marks: i32,
    question_type: QuestionType,
    difficulty: QuestionDifficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
}

fn default_qno() -> u32 {
    1
}

impl From<QuestionWire> for Question {
    fn from(w: QuestionWire) -> Self {
        Self {
            qno: w.qno,
            subject: w.subject,
            text: w.text,
            options: w.options,
            correct: CorrectAnswer::from_wire(w.correct_option_index, w.question_type),
            marks: w.marks,
            negative_marks: w.negative_marks,
            question_type: w.question_type,
            difficulty: w.difficulty,
            explanation: w.explanation,
            image_url: w.image_url,
        }
    }
}

impl From<Question> for QuestionWire {
    fn from(q: Question) -> Self {
        Self {
            qno: q.qno,
            subject: q.subject,
            text: q.text,
            options: q.options,
            correct_option_index: q.correct.to_wire(),
            marks: q.marks,
            negative_marks: q.negative_marks,
            question_type: q.question_type,
            difficulty: q.difficulty,
            explanation: q.explanation,
            image_url: q.image_url,
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Default for Question {
    /// Create-mode defaults: first question, Physics MCQ worth +4/-1,
    /// medium difficulty.
    fn default() -> Self {
        Self {
            qno: 1,
            subject: Subject::Physics,
            text: String::new(),
            options: vec![String::new(); 4],
            correct: CorrectAnswer::OptionIndex(0),
            marks: 4,
            negative_marks: -1,
            question_type: QuestionType::Mcq,
            difficulty: QuestionDifficulty::Medium,
            explanation: None,
            image_url: None,
        }
    }
}

impl Question {
    /// All-or-nothing validation. Every failing field is reported; an empty
    /// result means the question is safe to save.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.text.trim().is_empty() {
            errors.push(FieldError::new("text", "question text must not be empty"));
        }

        if self.question_type.has_options() {
            for (i, option) in self.options.iter().enumerate() {
                if option.trim().is_empty() {
                    errors.push(FieldError::new(
                        "options",
                        format!("option {} must not be empty", i + 1),
                    ));
                }
            }
            match self.correct {
                CorrectAnswer::OptionIndex(i) if i >= self.options.len() => {
                    errors.push(FieldError::new(
                        "correctOptionIndex",
                        format!(
                            "index {} is out of range (have {} options)",
                            i,
                            self.options.len()
                        ),
                    ));
                }
                CorrectAnswer::OptionIndex(_) => {}
                CorrectAnswer::Integer(_) => {
                    errors.push(FieldError::new(
                        "correctOptionIndex",
                        "choice questions need an option index, not an integer answer",
                    ));
                }
            }
        } else if let CorrectAnswer::OptionIndex(_) = self.correct {
            errors.push(FieldError::new(
                "correctOptionIndex",
                "integer questions need an integer answer, not an option index",
            ));
        }

        if self.marks <= 0 {
            errors.push(FieldError::new("marks", "marks must be positive"));
        }
        if self.negative_marks > 0 {
            errors.push(FieldError::new(
                "negativeMarks",
                "negative marks must be zero or below",
            ));
        }

        errors
    }
}
