use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Descriptive header of a campaign pack (`meta` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub pack_version: i64,
    /// Stable identifier the loader uses to find this pack.
    pub id: String,
    pub title: String,
    pub description: String,
}

/// A labeled edge out of a scene.
///
/// A missing or `null` `nextSceneId` marks a choice that leads nowhere,
/// typically an ending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub label: String,
    #[serde(default)]
    pub next_scene_id: Option<String>,
}

impl Choice {
    /// The scene this choice navigates to, if any.
    pub fn target(&self) -> Option<&str> {
        self.next_scene_id.as_deref()
    }
}

/// A node of the narrative graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl Scene {
    /// Returns true if no choice in this scene leads anywhere.
    pub fn is_ending(&self) -> bool {
        self.choices.iter().all(|c| c.target().is_none())
    }
}

/// A complete unit of narrative content: metadata plus the scene graph.
///
/// Instances are only produced from documents that passed validation
/// (see [`crate::core::validator`]), so downstream code can rely on the
/// shape without re-checking it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPack {
    pub meta: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_scene_id: Option<String>,
    pub scenes: Vec<Scene>,
}

impl CampaignPack {
    /// The scene a session begins in: `startSceneId` when set and
    /// non-empty, otherwise the first declared scene.
    pub fn start_scene_id(&self) -> Option<&str> {
        match self.start_scene_id.as_deref() {
            Some(id) if !id.is_empty() => Some(id),
            _ => self.scenes.first().map(|s| s.id.as_str()),
        }
    }
}

/// Listing entry for a discoverable pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSummary {
    pub id: String,
    pub title: String,
    #[serde(skip)]
    pub path: PathBuf,
}
