//! The four sequential stages of test creation.

/// Workflow stage. Numbering is 1-based and user-facing ("Step 2 of 4").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    BasicInfo = 1,
    UploadQuestions = 2,
    UploadAnswerKey = 3,
    ReviewPublish = 4,
}

impl Stage {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::BasicInfo => "Basic Info",
            Stage::UploadQuestions => "Upload Questions",
            Stage::UploadAnswerKey => "Upload Answer Key",
            Stage::ReviewPublish => "Review & Publish",
        }
    }

    /// The stage one step back, if any.
    pub fn previous(self) -> Option<Stage> {
        match self {
            Stage::BasicInfo => None,
            Stage::UploadQuestions => Some(Stage::BasicInfo),
            Stage::UploadAnswerKey => Some(Stage::UploadQuestions),
            Stage::ReviewPublish => Some(Stage::UploadAnswerKey),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}/4)", self.label(), self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_numbered_one_to_four() {
        assert_eq!(Stage::BasicInfo.number(), 1);
        assert_eq!(Stage::ReviewPublish.number(), 4);
    }

    #[test]
    fn previous_walks_backward_and_stops() {
        assert_eq!(Stage::ReviewPublish.previous(), Some(Stage::UploadAnswerKey));
        assert_eq!(Stage::UploadQuestions.previous(), Some(Stage::BasicInfo));
        assert_eq!(Stage::BasicInfo.previous(), None);
    }
}
