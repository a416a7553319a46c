/// Narrative session state — the player's position in a pack's scene graph.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::schema::pack::{CampaignPack, Choice, Scene};

/// Navigable session over one loaded pack.
///
/// States are the scene ids of the loaded pack plus an implicit
/// "nothing loaded" state. Navigation to an unknown id is ignored rather
/// than reported: the player simply stays where they are.
#[derive(Debug, Clone, Default)]
pub struct NarrativeState {
    pack: Option<Arc<CampaignPack>>,
    /// Scene id → position in `pack.scenes`. Later duplicates overwrite
    /// earlier ones.
    scene_index: FxHashMap<String, usize>,
    current_scene_id: Option<String>,
}

impl NarrativeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any previously loaded pack and move to its start scene.
    pub fn load_pack(&mut self, pack: impl Into<Arc<CampaignPack>>) {
        let pack = pack.into();

        let mut scene_index = FxHashMap::default();
        for (position, scene) in pack.scenes.iter().enumerate() {
            scene_index.insert(scene.id.clone(), position);
        }

        self.current_scene_id = pack.start_scene_id().map(str::to_string);
        tracing::debug!(
            pack = %pack.meta.id,
            scenes = scene_index.len(),
            start = ?self.current_scene_id,
            "loaded pack"
        );
        self.scene_index = scene_index;
        self.pack = Some(pack);
    }

    /// The loaded pack, if any.
    pub fn pack(&self) -> Option<&CampaignPack> {
        self.pack.as_deref()
    }

    /// Shared handle to the loaded pack.
    pub fn shared_pack(&self) -> Option<Arc<CampaignPack>> {
        self.pack.clone()
    }

    pub fn current_scene_id(&self) -> Option<&str> {
        self.current_scene_id.as_deref()
    }

    /// Look up a scene of the loaded pack by id.
    pub fn scene(&self, scene_id: &str) -> Option<&Scene> {
        let pack = self.pack.as_ref()?;
        let position = *self.scene_index.get(scene_id)?;
        pack.scenes.get(position)
    }

    /// The scene the player is in, or `None` when nothing is loaded.
    pub fn current_scene(&self) -> Option<&Scene> {
        self.current_scene_id
            .as_deref()
            .and_then(|id| self.scene(id))
    }

    /// Choices available from the current scene; empty when nothing is
    /// current or the scene offers none.
    pub fn choices(&self) -> &[Choice] {
        self.current_scene()
            .map(|scene| scene.choices.as_slice())
            .unwrap_or_default()
    }

    /// True when the current scene exists but offers no navigable choice.
    pub fn is_at_ending(&self) -> bool {
        self.current_scene().is_some_and(Scene::is_ending)
    }

    /// Move to `scene_id` if it exists in the loaded pack.
    ///
    /// Unknown ids leave the state untouched. Returns whether the player
    /// moved (self-loops count as moves).
    pub fn goto_scene(&mut self, scene_id: &str) -> bool {
        if !self.scene_index.contains_key(scene_id) {
            tracing::debug!(target_scene = scene_id, "ignoring navigation to unknown scene");
            return false;
        }
        self.current_scene_id = Some(scene_id.to_string());
        true
    }

    /// Follow a choice by passing its target to [`Self::goto_scene`].
    /// Choices without a target never move the player.
    pub fn follow(&mut self, choice: &Choice) -> bool {
        match choice.target() {
            Some(target) => self.goto_scene(target),
            None => false,
        }
    }

    /// Follow the `index`-th choice of the current scene.
    pub fn choose(&mut self, index: usize) -> bool {
        let target = match self.choices().get(index).and_then(Choice::target) {
            Some(target) => target.to_string(),
            None => return false,
        };
        self.goto_scene(&target)
    }
}
