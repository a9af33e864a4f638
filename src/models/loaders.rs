//! Draft-file loading.
//!
//! One TOML file per test: the draft metadata plus the paths of the two PDFs
//! to upload. The publish run scans a folder of these.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::fs;

use crate::error::{AppResult, FileError};
use crate::models::test::TestDraft;

/// One draft TOML file, ready to be pushed through the publish workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftFile {
    pub test: TestDraft,
    /// Path of the questions PDF, relative to the draft file's folder
    /// unless absolute.
    pub questions_pdf: PathBuf,
    /// Path of the answer key PDF, same resolution rule.
    pub answer_key_pdf: PathBuf,
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
}

impl DraftFile {
    /// Resolve a PDF path against the folder the draft file came from.
    fn resolve(&self, pdf: &Path) -> PathBuf {
        if pdf.is_absolute() {
            return pdf.to_path_buf();
        }
        match self.file_path.as_ref().and_then(|p| p.parent()) {
            Some(folder) => folder.join(pdf),
            None => pdf.to_path_buf(),
        }
    }

    pub fn questions_pdf_path(&self) -> PathBuf {
        self.resolve(&self.questions_pdf)
    }

    pub fn answer_key_pdf_path(&self) -> PathBuf {
        self.resolve(&self.answer_key_pdf)
    }
}

/// Load a single draft TOML file.
pub async fn load_draft_file(path: &Path) -> AppResult<DraftFile> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| FileError::read_failed(path.display().to_string(), e))?;

    let mut draft: DraftFile = toml::from_str(&content).map_err(|e| FileError::TomlParseFailed {
        path: path.display().to_string(),
        source: e,
    })?;

    draft.file_path = Some(path.to_path_buf());
    Ok(draft)
}

/// Load every `.toml` file in the folder. Files that fail to parse are
/// logged and skipped so one bad draft cannot block a batch.
pub async fn load_all_draft_files(folder_path: &str) -> AppResult<Vec<DraftFile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(FileError::FolderNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut drafts = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| FileError::read_failed(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FileError::read_failed(folder_path, e))?
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            tracing::info!(
                "loading draft: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_draft_file(&path).await {
                Ok(draft) => {
                    tracing::info!("loaded \"{}\"", draft.test.title);
                    drafts.push(draft);
                }
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_file_parses() {
        let toml_src = r#"
            questions_pdf = "mock12_questions.pdf"
            answer_key_pdf = "mock12_answers.pdf"

            [test]
            title = "JEE Main Mock 12"
            description = "Full syllabus mock"
            examType = "main"
            subjects = ["Physics", "Chemistry", "Mathematics"]
            durationMins = 180
            totalMarks = 300
            totalQuestions = 75
            difficulty = "Mixed"
            isPaid = false
            price = 0
            visibility = "private"
        "#;

        let draft: DraftFile = toml::from_str(toml_src).unwrap();
        assert_eq!(draft.test.title, "JEE Main Mock 12");
        assert_eq!(draft.test.duration_mins, 180);
        assert!(draft.test.validate().is_ok());
    }

    #[test]
    fn relative_pdf_paths_resolve_against_draft_folder() {
        let draft = DraftFile {
            test: TestDraft::default(),
            questions_pdf: PathBuf::from("q.pdf"),
            answer_key_pdf: PathBuf::from("/abs/a.pdf"),
            file_path: Some(PathBuf::from("/drafts/mock12.toml")),
        };
        assert_eq!(draft.questions_pdf_path(), PathBuf::from("/drafts/q.pdf"));
        assert_eq!(draft.answer_key_pdf_path(), PathBuf::from("/abs/a.pdf"));
    }
}
