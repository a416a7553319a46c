/// Structural validation of raw pack documents.
///
/// Documents arrive as untyped `serde_json::Value` trees (JSON and RON
/// sources both decode into this shape). Validation is fail-fast: the
/// first violation is reported and the document is rejected in full.

use rustc_hash::FxHashSet;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::schema::pack::CampaignPack;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("pack must be an object")]
    NotAnObject,
    #[error("{context}: missing required key '{key}'")]
    MissingKey { context: String, key: String },
    #[error("{context}: key '{key}' must be {expected}")]
    WrongType {
        context: String,
        key: String,
        expected: &'static str,
    },
    #[error("pack must contain at least 1 scene")]
    NoScenes,
    #[error("scenes[{index}]: each scene must be an object")]
    SceneNotObject { index: usize },
    #[error("scene '{scene}': choices must be a list")]
    ChoicesNotList { scene: String },
    #[error("scene '{scene}': choice {index} must be an object")]
    ChoiceNotObject { scene: String, index: usize },
    #[error("scene '{scene}': choice {index} nextSceneId must be a string or null")]
    BadNextScene { scene: String, index: usize },
    #[error("start scene '{0}' does not exist in scenes")]
    UnknownStartScene(String),
}

#[derive(Clone, Copy)]
enum Kind {
    Object,
    Array,
    String,
    Integer,
}

impl Kind {
    fn matches(self, value: &Value) -> bool {
        match self {
            Kind::Object => value.is_object(),
            Kind::Array => value.is_array(),
            Kind::String => value.is_string(),
            Kind::Integer => value.is_i64(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Kind::Object => "an object",
            Kind::Array => "a list",
            Kind::String => "a string",
            Kind::Integer => "an integer",
        }
    }
}

fn require<'a>(
    obj: &'a Map<String, Value>,
    context: &str,
    key: &str,
    kind: Kind,
) -> Result<&'a Value, ValidationError> {
    let value = obj.get(key).ok_or_else(|| ValidationError::MissingKey {
        context: context.to_string(),
        key: key.to_string(),
    })?;
    if !kind.matches(value) {
        return Err(ValidationError::WrongType {
            context: context.to_string(),
            key: key.to_string(),
            expected: kind.describe(),
        });
    }
    Ok(value)
}

/// Check a decoded document against the campaign pack format.
///
/// Order of checks: document shape, `meta`, `scenes` (non-empty), each
/// scene and its choices, then the effective start scene. Choice targets
/// are not checked against the scene set, and duplicate scene ids are
/// accepted; see [`crate::core::lint`] for advisory reporting of both.
pub fn validate(document: &Value) -> Result<(), ValidationError> {
    let pack = document.as_object().ok_or(ValidationError::NotAnObject)?;

    let meta = require(pack, "pack", "meta", Kind::Object)?;
    if let Value::Object(meta) = meta {
        require(meta, "meta", "packVersion", Kind::Integer)?;
        require(meta, "meta", "id", Kind::String)?;
        require(meta, "meta", "title", Kind::String)?;
        require(meta, "meta", "description", Kind::String)?;
    }

    let scenes: &[Value] = require(pack, "pack", "scenes", Kind::Array)?
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default();
    if scenes.is_empty() {
        return Err(ValidationError::NoScenes);
    }

    let mut scene_ids: FxHashSet<&str> = FxHashSet::default();
    for (index, scene) in scenes.iter().enumerate() {
        let scene = scene
            .as_object()
            .ok_or(ValidationError::SceneNotObject { index })?;
        let context = format!("scenes[{}]", index);
        let id = require(scene, &context, "id", Kind::String)?
            .as_str()
            .unwrap_or_default();
        scene_ids.insert(id);
        require(scene, &context, "title", Kind::String)?;
        require(scene, &context, "text", Kind::String)?;

        validate_choices(id, scene.get("choices"))?;
    }

    let start = match pack.get("startSceneId") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => {
            return Err(ValidationError::WrongType {
                context: "pack".to_string(),
                key: "startSceneId".to_string(),
                expected: "a string",
            })
        }
    };
    // The first scene's id was checked above.
    let start = start.unwrap_or_else(|| {
        scenes[0]
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
    });
    if !scene_ids.contains(start) {
        return Err(ValidationError::UnknownStartScene(start.to_string()));
    }

    Ok(())
}

fn validate_choices(scene_id: &str, choices: Option<&Value>) -> Result<(), ValidationError> {
    let choices = match choices {
        None => return Ok(()),
        Some(Value::Array(choices)) => choices,
        Some(_) => {
            return Err(ValidationError::ChoicesNotList {
                scene: scene_id.to_string(),
            })
        }
    };

    for (index, choice) in choices.iter().enumerate() {
        let choice = choice
            .as_object()
            .ok_or_else(|| ValidationError::ChoiceNotObject {
                scene: scene_id.to_string(),
                index,
            })?;
        let context = format!("scene '{}': choice {}", scene_id, index);
        require(choice, &context, "label", Kind::String)?;
        match choice.get("nextSceneId") {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => {
                return Err(ValidationError::BadNextScene {
                    scene: scene_id.to_string(),
                    index,
                })
            }
        }
    }
    Ok(())
}

/// Errors from turning an untyped document into a [`CampaignPack`].
#[derive(Debug, Error)]
pub enum PackDocumentError {
    #[error("invalid pack: {0}")]
    Validation(#[from] ValidationError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CampaignPack {
    /// Validate a decoded document and convert it into typed records.
    pub fn from_value(document: Value) -> Result<CampaignPack, PackDocumentError> {
        validate(&document)?;
        Ok(serde_json::from_value(document)?)
    }

    /// Parse, validate and convert a JSON pack.
    pub fn from_json_str(input: &str) -> Result<CampaignPack, PackDocumentError> {
        let document: Value = serde_json::from_str(input)?;
        Self::from_value(document)
    }
}
