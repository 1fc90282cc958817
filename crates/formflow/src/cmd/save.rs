use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use formflow_editor::{EditorSession, SaveError};

use crate::cmd::load_form;
use crate::config::FormflowConfig;
use crate::fs_store::FsFormStore;

#[derive(Args, Debug, Clone)]
pub struct SaveArgs {
    /// Form document (JSON)
    #[arg(value_name = "FORM")]
    pub form: PathBuf,
    /// Store directory (overrides `store_dir` from the config)
    #[arg(long = "store-dir", value_name = "DIR")]
    pub store_dir: Option<PathBuf>,
}

pub async fn run(args: SaveArgs, config: &FormflowConfig) -> Result<()> {
    let store = FsFormStore::new(args.store_dir.unwrap_or_else(|| config.store_dir()));
    let mut session = EditorSession::from_form(load_form(&args.form)?);
    match session.save(&store).await {
        Ok(id) => {
            println!("{id}");
            Ok(())
        }
        Err(SaveError::Invalid(report)) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            bail!("form has {} validation error(s)", report.error_count());
        }
        Err(err) => Err(err.into()),
    }
}
