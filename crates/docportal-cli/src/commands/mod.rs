//! CLI command handlers

pub mod analyze;
pub mod chat;
pub mod embed;
pub mod read;
pub mod save;

use crate::app::SessionArgs;
use anyhow::Result;
use docportal_core::{DocumentHandler, ModelLoader, TracingSink, UploadedFile};
use std::path::{Path, PathBuf};

/// Open the session described by the arguments and store `file` in it
fn store(file: &Path, session: &SessionArgs) -> Result<(DocumentHandler, PathBuf)> {
    let handler = DocumentHandler::new(
        session.data_dir.clone(),
        session.session.clone(),
        TracingSink::shared(),
    )?;
    let upload = UploadedFile::from_path(file)?;
    let saved = handler.save(&upload)?;
    Ok((handler, saved))
}

/// Startup sequence shared by commands that talk to a model
fn loader(config: Option<&Path>, provider: Option<&str>) -> Result<ModelLoader> {
    let loader = ModelLoader::from_env(config, TracingSink::shared())?;
    Ok(match provider {
        Some(key) => loader.with_provider_key(key),
        None => loader,
    })
}
