use anyhow::Result;
use formflow_spec::FormDocument;

pub fn run() -> Result<()> {
    let schema = schemars::schema_for!(FormDocument);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
