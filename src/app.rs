//! Application orchestration: scan the drafts folder and push every draft
//! through the publish workflow, in batches.

use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::clients::ApiClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{load_all_draft_files, DraftFile};
use crate::session::Session;
use crate::utils::logging;
use crate::workflow::PublishFlow;

/// The publisher application.
pub struct App {
    config: Config,
    api: Arc<ApiClient>,
}

impl App {
    pub fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config.api_base_url, config.max_concurrent_drafts);

        let session = Arc::new(Session::with_expired_hook(
            config.admin_token.clone(),
            || error!("session expired: the admin token was rejected, log in again"),
        ));
        let api = Arc::new(ApiClient::new(&config, session)?);

        Ok(Self { config, api })
    }

    /// Load all drafts and publish them. Per-draft failures are counted,
    /// never fatal to the run.
    pub async fn run(&self) -> Result<()> {
        let all_drafts = load_all_draft_files(&self.config.drafts_folder).await?;

        if all_drafts.is_empty() {
            warn!("⚠️ no draft TOML files found in {}", self.config.drafts_folder);
            return Ok(());
        }

        let total = all_drafts.len();
        logging::log_drafts_loaded(total, self.config.max_concurrent_drafts);

        let stats = self.process_all_drafts(all_drafts).await?;

        logging::print_final_stats(
            stats.success,
            stats.failed,
            total,
            &self.config.output_log_file,
        );
        Ok(())
    }

    async fn process_all_drafts(&self, all_drafts: Vec<DraftFile>) -> Result<ProcessingStats> {
        let batch_size = self.config.max_concurrent_drafts.max(1);
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total = all_drafts.len();
        let total_batches = total.div_ceil(batch_size);
        let mut stats = ProcessingStats::default();

        let mut drafts = all_drafts.into_iter().enumerate();
        for batch_num in 1..=total_batches {
            let batch: Vec<_> = drafts.by_ref().take(batch_size).collect();
            let start = (batch_num - 1) * batch_size + 1;
            let end = start + batch.len() - 1;
            logging::log_batch_start(batch_num, total_batches, start, end, total);

            let mut handles = Vec::new();
            for (idx, draft) in batch {
                let draft_index = idx + 1;
                let api = self.api.clone();
                let config = self.config.clone();
                let permit = semaphore.clone().acquire_owned().await?;

                handles.push(tokio::spawn(async move {
                    let _permit = permit;
                    match publish_draft(api, &config, draft, draft_index).await {
                        Ok(()) => true,
                        Err(e) => {
                            error!("[draft {}] ❌ {}", draft_index, e.user_message());
                            let _ = logging::append_run_log(
                                &config.output_log_file,
                                &format!("draft {} FAILED: {}", draft_index, e),
                            );
                            false
                        }
                    }
                }));
            }

            let mut batch_success = 0usize;
            let batch_total = handles.len();
            for result in join_all(handles).await {
                match result {
                    Ok(true) => {
                        stats.success += 1;
                        batch_success += 1;
                    }
                    Ok(false) => stats.failed += 1,
                    Err(e) => {
                        error!("task failed: {}", e);
                        stats.failed += 1;
                    }
                }
            }
            logging::log_batch_complete(batch_num, batch_success, batch_total);
        }

        Ok(stats)
    }
}

#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
}

/// Run the full four-stage workflow for one draft file.
async fn publish_draft(
    api: Arc<ApiClient>,
    config: &Config,
    draft: DraftFile,
    draft_index: usize,
) -> AppResult<()> {
    let title = draft.test.title.clone();
    info!("[draft {}] 📝 \"{}\"", draft_index, title);

    let questions_pdf_path = draft.questions_pdf_path();
    let answer_key_pdf_path = draft.answer_key_pdf_path();

    let questions_pdf = tokio::fs::read(&questions_pdf_path)
        .await
        .map_err(|e| {
            crate::error::FileError::read_failed(questions_pdf_path.display().to_string(), e)
        })?;
    let answer_key_pdf = tokio::fs::read(&answer_key_pdf_path)
        .await
        .map_err(|e| {
            crate::error::FileError::read_failed(answer_key_pdf_path.display().to_string(), e)
        })?;

    let log_file = config.output_log_file.clone();
    let mut flow = PublishFlow::new(api, draft.test).on_complete(move |test_id| {
        let _ = logging::append_run_log(&log_file, &format!("published {}", test_id));
    });

    let test_id = flow.create_test().await?;
    info!("[draft {}] ✓ created test {}", draft_index, test_id);

    let parsed = flow
        .upload_questions(
            questions_pdf,
            &file_name(&questions_pdf_path),
        )
        .await?;
    info!("[draft {}] ✓ {} questions parsed", draft_index, parsed);

    if config.verbose_logging {
        if let Some(first) = flow.state().questions.first() {
            info!(
                "[draft {}]   q1: {}",
                draft_index,
                logging::truncate_text(&first.text, 80)
            );
        }
    }

    flow.upload_answer_key(answer_key_pdf, &file_name(&answer_key_pdf_path))
        .await?;
    info!("[draft {}] ✓ answer key uploaded", draft_index);

    flow.publish().await?;
    info!("[draft {}] ✅ \"{}\" published", draft_index, title);
    Ok(())
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.pdf".to_string())
}
