//! Chat command

use crate::app::{ChatArgs, OutputFormat};
use anyhow::Result;
use std::path::Path;

pub async fn run(args: ChatArgs, config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let llm = super::loader(config, args.provider.as_deref())?.load_llm()?;
    let prompt = args.prompt.join(" ");
    let reply = llm.invoke(&prompt).await?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "provider": llm.provider(),
                "model": llm.model_name(),
                "response": reply,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Cli => println!("{}", reply),
    }
    Ok(())
}
