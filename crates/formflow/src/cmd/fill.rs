use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use formflow_editor::EditorSession;
use formflow_runtime::{Advance, Navigator};
use formflow_spec::memory::MemorySubmissions;
use formflow_spec::{AnswerMap, Submission, SubmissionService};
use serde::Serialize;
use tracing::info;

use crate::cmd::load_form;
use crate::config::FormflowConfig;
use crate::fs_store::FsSubmissions;

#[derive(Args, Debug, Clone)]
pub struct FillArgs {
    /// Form document (JSON)
    #[arg(value_name = "FORM")]
    pub form: PathBuf,
    /// Answers keyed by question id (string, list of strings or number)
    #[arg(long = "answers", value_name = "answers.json")]
    pub answers: PathBuf,
    /// Do not record the submission
    #[arg(long = "dry-run", default_value_t = false)]
    pub dry_run: bool,
    /// Submissions directory (overrides `submissions_dir` from the config)
    #[arg(long = "submissions-dir", value_name = "DIR")]
    pub submissions_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FillOutput {
    pages: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<String>,
    submission: Submission,
}

pub async fn run(args: FillArgs, config: &FormflowConfig) -> Result<()> {
    let form = load_form(&args.form)?;
    let report = EditorSession::from_form(form.clone()).validate();
    if report.has_errors {
        bail!(
            "form has {} validation error(s); run `formflow validate` for details",
            report.error_count()
        );
    }
    let raw = fs::read_to_string(&args.answers)
        .with_context(|| format!("failed to read answers {}", args.answers.display()))?;
    let answers: AnswerMap = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse answers {}", args.answers.display()))?;

    let mut navigator = Navigator::new(form);
    walk(&mut navigator, &answers)?;

    let submission = navigator.submission();
    let pages = navigator
        .history()
        .iter()
        .copied()
        .filter(|page| *page < navigator.form().page_count())
        .collect();
    let receipt = if args.dry_run {
        submit(&mut navigator, &MemorySubmissions::new()).await?;
        None
    } else {
        let dir = args
            .submissions_dir
            .unwrap_or_else(|| config.submissions_dir());
        Some(submit(&mut navigator, &FsSubmissions::new(dir)).await?)
    };

    let output = FillOutput {
        pages,
        receipt,
        submission,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Enters the known answers page by page until the submission state.
fn walk(navigator: &mut Navigator, answers: &AnswerMap) -> Result<()> {
    // Validated forms only jump forward, so every step visits a new page.
    for _ in 0..=navigator.form().page_count() {
        let ids: Vec<String> = match navigator.current_page() {
            Some(page) => page.questions.iter().map(|q| q.id.clone()).collect(),
            None => return Ok(()),
        };
        for id in ids {
            if let Some(answer) = answers.get(&id) {
                navigator.enter(&id, answer);
            }
        }
        match navigator.advance() {
            Advance::Moved(page) => info!(page, "moved"),
            Advance::Completed => return Ok(()),
            Advance::Blocked(failures) => {
                let details: Vec<String> = failures
                    .iter()
                    .map(|(id, check)| format!("{id}: {}", check.messages().join("; ")))
                    .collect();
                bail!(
                    "page {} is incomplete: {}",
                    navigator.current_page_index() + 1,
                    details.join(", ")
                );
            }
        }
    }
    bail!("navigation did not reach the submission page")
}

async fn submit<S>(navigator: &mut Navigator, service: &S) -> Result<String>
where
    S: SubmissionService + ?Sized,
{
    navigator
        .submit(service)
        .await
        .context("failed to submit answers")
}
