//! Analyze command

use crate::app::{AnalyzeArgs, OutputFormat};
use anyhow::Result;
use docportal_core::{DocumentAnalyzer, Metadata};
use std::path::Path;

pub async fn run(args: AnalyzeArgs, config: Option<&Path>, format: OutputFormat) -> Result<()> {
    // Validate credentials and config before touching the filesystem
    let loader = super::loader(config, args.provider.as_deref())?;
    let analyzer = DocumentAnalyzer::from_loader(&loader)?;

    let (handler, saved) = super::store(&args.document.file, &args.document.session)?;
    let text = handler.read_text(&saved)?;
    let metadata = analyzer.analyze(&text).await?;

    match format {
        OutputFormat::Json => println!("{}", metadata.to_json_pretty()?),
        OutputFormat::Cli => print_metadata(&metadata),
    }
    Ok(())
}

fn print_metadata(metadata: &Metadata) {
    println!("Title:          {}", metadata.title);
    println!("Author:         {}", metadata.author.join(", "));
    println!("Created:        {}", metadata.date_created);
    println!("Modified:       {}", metadata.last_modified_date);
    println!("Publisher:      {}", metadata.publisher);
    println!("Language:       {}", metadata.language);
    println!("Pages:          {}", metadata.page_count);
    println!("Sentiment:      {}", metadata.sentiment_tone);
    if !metadata.summary.is_empty() {
        println!();
        println!("Summary:");
        for point in &metadata.summary {
            println!("  - {}", point);
        }
    }
}
