//! WASM bindings for campaign-engine — the API a web presentation layer
//! calls into.
//!
//! Values cross the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use campaign_engine::core::dice::DiceRoller;
use campaign_engine::core::state::NarrativeState;
use campaign_engine::schema::pack::{CampaignPack, Choice};
use campaign_engine::schema::roll::DiceFormula;

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct SceneView<'a> {
    id: &'a str,
    title: &'a str,
    text: &'a str,
    choices: Vec<ChoiceView<'a>>,
    ending: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ChoiceView<'a> {
    label: &'a str,
    next_scene_id: Option<&'a str>,
}

#[derive(serde::Serialize)]
struct PackInfo<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
}

fn choice_view(choice: &Choice) -> ChoiceView<'_> {
    ChoiceView {
        label: &choice.label,
        next_scene_id: choice.target(),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// CampaignSession — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct CampaignSession {
    state: NarrativeState,
    dice: DiceRoller,
}

#[wasm_bindgen]
impl CampaignSession {
    /// Create an empty session. A seed makes dice rolls reproducible.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>) -> CampaignSession {
        let dice = match seed {
            Some(s) => DiceRoller::seeded(s),
            None => DiceRoller::new(),
        };
        CampaignSession {
            state: NarrativeState::new(),
            dice,
        }
    }

    /// Validate and load a pack from its JSON text, replacing any current
    /// pack. On error nothing changes.
    pub fn load_pack(&mut self, pack_json: &str) -> Result<(), JsError> {
        let pack = CampaignPack::from_json_str(pack_json)
            .map_err(|e| JsError::new(&format!("Pack load error: {e}")))?;
        self.state.load_pack(pack);
        Ok(())
    }

    /// JSON `{id, title, description}` of the loaded pack, or `null`.
    pub fn pack_info(&self) -> Result<String, JsError> {
        let info = self.state.pack().map(|p| PackInfo {
            id: &p.meta.id,
            title: &p.meta.title,
            description: &p.meta.description,
        });
        to_json(&info)
    }

    /// JSON view of the current scene with its choices, or `null` when
    /// nothing is loaded.
    pub fn current_scene(&self) -> Result<String, JsError> {
        let view = self.state.current_scene().map(|scene| SceneView {
            id: &scene.id,
            title: &scene.title,
            text: &scene.text,
            choices: scene.choices.iter().map(choice_view).collect(),
            ending: scene.is_ending(),
        });
        to_json(&view)
    }

    /// JSON array of the current scene's choices (empty when none).
    pub fn choices(&self) -> Result<String, JsError> {
        let views: Vec<ChoiceView<'_>> = self.state.choices().iter().map(choice_view).collect();
        to_json(&views)
    }

    /// Navigate to a scene; unknown ids are ignored. Returns whether the
    /// player moved.
    pub fn goto_scene(&mut self, scene_id: &str) -> bool {
        self.state.goto_scene(scene_id)
    }

    /// Follow the `index`-th choice of the current scene.
    pub fn choose(&mut self, index: usize) -> bool {
        self.state.choose(index)
    }

    /// Roll a dice formula. Returns JSON `{formula, rolls, modifier, total}`.
    pub fn roll(&mut self, formula: &str) -> Result<String, JsError> {
        let result = self
            .dice
            .roll(formula)
            .map_err(|e| JsError::new(&format!("Dice error: {e}")))?;
        to_json(&result)
    }

    /// Canonical form of a formula without rolling it.
    pub fn normalize_formula(formula: &str) -> Result<String, JsError> {
        DiceFormula::parse(formula)
            .map(|f| f.to_string())
            .map_err(|e| JsError::new(&format!("Dice error: {e}")))
    }

    /// Reseed the dice.
    pub fn reseed(&mut self, seed: u64) {
        self.dice = DiceRoller::seeded(seed);
    }
}
