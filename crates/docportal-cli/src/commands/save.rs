//! Save command

use crate::app::{DocumentArgs, OutputFormat};
use anyhow::Result;

pub async fn run(args: DocumentArgs, format: OutputFormat) -> Result<()> {
    let (handler, saved) = super::store(&args.file, &args.session)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "session_id": handler.session_id(),
                "path": saved,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Cli => {
            println!("Session:  {}", handler.session_id());
            println!("Saved:    {}", saved.display());
        }
    }
    Ok(())
}
