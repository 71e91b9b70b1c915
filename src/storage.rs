use crate::model::Project;
use crate::store::ProjectStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The durable slice of the store. The open project and the undo/redo
/// stacks are session state and never written.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct PersistedState {
    #[serde(default)]
    pub projects: Vec<Project>,
}

pub fn load_store(path: &Path) -> Result<ProjectStore> {
    if !path.exists() {
        tracing::info!("no project file at {:?}, starting empty", path);
        return Ok(ProjectStore::new());
    }
    let data = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let state: PersistedState =
        serde_json::from_str(&data).with_context(|| format!("parsing {:?}", path))?;
    tracing::info!(count = state.projects.len(), "loaded projects from {:?}", path);
    Ok(ProjectStore::from_projects(state.projects))
}

pub fn save_store(path: &Path, store: &ProjectStore) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
        }
    }
    let state = PersistedState {
        projects: store.projects().to_vec(),
    };
    let serialized = serde_json::to_string_pretty(&state).context("serializing projects")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serialized).with_context(|| format!("writing {:?}", tmp))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {:?}", path))?;
    tracing::info!(count = state.projects.len(), "wrote projects to {:?}", path);
    Ok(())
}
