//! Replayable action scripts
//!
//! A script is a TOML list of steps fed one by one through
//! [`DocumentStore::dispatch`]. `@root` stands for the id of the current root.
//!
//! ```toml
//! [[step]]
//! action = "append-child"
//! parent = "@root"
//! title = "Idea"
//! id = "idea"
//!
//! [[step]]
//! action = "undo"
//! ```

use serde::Deserialize;
use tracing::debug;

use crate::application::services::{Action, DocumentStore};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::walker::create_topic;
use crate::domain::{Side, TopicId, TopicNode, TopicPatch};

pub const ROOT_ALIAS: &str = "@root";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ScriptStep {
    AppendChild {
        parent: String,
        title: String,
        #[serde(default)]
        id: Option<String>,
    },
    DeleteNode {
        id: String,
    },
    UpdateNode {
        id: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        side: Option<Side>,
    },
    MoveNode {
        id: String,
        parent: String,
    },
    Undo,
    Redo,
    SaveSnapshot,
}

impl Script {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Dispatch every step in order. Returns the number of steps dispatched.
    ///
    /// Steps referring to unknown topics are dispatched anyway and ignored by
    /// the store; only malformed steps abort the replay.
    pub fn replay(&self, store: &mut DocumentStore) -> ApplicationResult<usize> {
        for (index, step) in self.steps.iter().enumerate() {
            let action = step.to_action(&store.current().id).map_err(|message| {
                ApplicationError::Script { index, message }
            })?;
            debug!(index, action = action.name(), "replaying step");
            store.dispatch(action);
        }
        Ok(self.steps.len())
    }
}

impl ScriptStep {
    /// Build the store action, resolving `@root` against `root`.
    pub fn to_action(&self, root: &TopicId) -> Result<Action, String> {
        let resolve = |raw: &str| -> Result<TopicId, String> {
            match raw {
                "" => Err("empty topic id".to_string()),
                ROOT_ALIAS => Ok(root.clone()),
                other => Ok(TopicId::from(other)),
            }
        };

        Ok(match self {
            ScriptStep::AppendChild { parent, title, id } => {
                let node = match id {
                    Some(id) => TopicNode::new(resolve(id)?, title.clone()),
                    None => create_topic(title.clone()),
                };
                Action::AppendChild {
                    parent: resolve(parent)?,
                    node,
                }
            }
            ScriptStep::DeleteNode { id } => Action::DeleteNode(resolve(id)?),
            ScriptStep::UpdateNode { id, title, side } => Action::UpdateNode {
                id: resolve(id)?,
                patch: TopicPatch {
                    title: title.clone(),
                    side: *side,
                },
            },
            ScriptStep::MoveNode { id, parent } => Action::MoveNode {
                id: resolve(id)?,
                parent: resolve(parent)?,
            },
            ScriptStep::Undo => Action::Undo,
            ScriptStep::Redo => Action::Redo,
            ScriptStep::SaveSnapshot => Action::SaveSnapshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_toml_steps_when_parsing_then_all_kinds_are_recognized() {
        let script = Script::parse(
            r#"
[[step]]
action = "append-child"
parent = "@root"
title = "Idea"
id = "idea"

[[step]]
action = "update-node"
id = "idea"
title = "Better idea"

[[step]]
action = "move-node"
id = "idea"
parent = "@root"

[[step]]
action = "delete-node"
id = "idea"

[[step]]
action = "undo"

[[step]]
action = "redo"
"#,
        )
        .expect("parse script");
        assert_eq!(script.steps.len(), 6);
        assert_eq!(script.steps[4], ScriptStep::Undo);
    }

    #[test]
    fn given_root_alias_when_converting_then_resolves_to_root_id() {
        let step = ScriptStep::DeleteNode {
            id: ROOT_ALIAS.to_string(),
        };
        let root = TopicId::from("the-root");
        assert_eq!(step.to_action(&root), Ok(Action::DeleteNode(root.clone())));
    }

    #[test]
    fn given_empty_id_when_replaying_then_reports_step_index() {
        let script = Script {
            steps: vec![
                ScriptStep::Undo,
                ScriptStep::DeleteNode { id: String::new() },
            ],
        };
        let mut store = DocumentStore::default();
        let err = script.replay(&mut store).expect_err("empty id is malformed");
        assert!(matches!(err, ApplicationError::Script { index: 1, .. }));
    }
}
