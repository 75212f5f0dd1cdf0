//! Read command

use crate::app::{DocumentArgs, OutputFormat};
use anyhow::Result;

pub async fn run(args: DocumentArgs, format: OutputFormat) -> Result<()> {
    let (handler, saved) = super::store(&args.file, &args.session)?;
    let text = handler.read_text(&saved)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "session_id": handler.session_id(),
                "path": saved,
                "text": text,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Cli => println!("{}", text),
    }
    Ok(())
}
