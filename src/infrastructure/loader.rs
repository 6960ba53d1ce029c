//! Reading topic documents and action scripts from disk

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::application::Script;
use crate::domain::walker::normalize_topic_side;
use crate::domain::TopicNode;
use crate::infrastructure::{InfraError, InfraResult};

/// Load a topic tree from a TOML file and normalize its sides.
pub fn load_document(path: &Path) -> InfraResult<TopicNode> {
    let content = fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("read document {}", path.display()), e))?;
    let mut root: TopicNode = toml::from_str(&content).map_err(|e| InfraError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    normalize_topic_side(&mut root);
    debug!(path = %path.display(), topics = root.size(), "document loaded");
    Ok(root)
}

/// Load an action script from a TOML file.
pub fn load_script(path: &Path) -> InfraResult<Script> {
    let content = fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("read script {}", path.display()), e))?;
    let script = Script::parse(&content).map_err(|e| InfraError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), steps = script.steps.len(), "script loaded");
    Ok(script)
}
