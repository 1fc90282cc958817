use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use formflow_editor::EditorSession;

use crate::cmd::load_form;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Form document (JSON)
    #[arg(value_name = "FORM")]
    pub form: PathBuf,
}

pub fn run(args: &ValidateArgs) -> Result<()> {
    let session = EditorSession::from_form(load_form(&args.form)?);
    let report = session.validate();
    println!("{}", serde_json::to_string_pretty(&report)?);
    if report.has_errors {
        bail!("form has {} validation error(s)", report.error_count());
    }
    Ok(())
}
