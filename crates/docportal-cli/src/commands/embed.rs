//! Embed command

use crate::app::{EmbedArgs, OutputFormat};
use anyhow::Result;
use std::path::Path;

pub async fn run(args: EmbedArgs, config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let embedder = super::loader(config, None)?.load_embeddings()?;

    let embeddings = match args.texts.as_slice() {
        [single] => vec![embedder.embed(single).await?],
        texts => embedder.embed_batch(texts).await?,
    };

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = args
                .texts
                .iter()
                .zip(&embeddings)
                .map(|(text, embedding)| serde_json::json!({ "text": text, "embedding": embedding }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Cli => {
            println!("Model: {} ({})", embedder.model_name(), embedder.provider());
            for (text, embedding) in args.texts.iter().zip(&embeddings) {
                println!("  {} dimensions  {}", embedding.len(), text);
            }
        }
    }
    Ok(())
}
