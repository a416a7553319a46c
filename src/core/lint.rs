/// Advisory checks for content authors.
///
/// Validation accepts duplicate scene ids and choices pointing at scenes
/// that do not exist. These checks surface such issues without changing
/// what loads.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::fmt;

use crate::schema::pack::CampaignPack;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintWarning {
    /// A scene id is declared more than once; the last declaration wins.
    DuplicateSceneId { scene: String, occurrences: usize },
    /// A choice targets a scene id that no scene declares.
    DanglingChoice {
        scene: String,
        choice: usize,
        target: String,
    },
    /// No chain of choices leads from the start scene to this scene.
    UnreachableScene { scene: String },
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintWarning::DuplicateSceneId { scene, occurrences } => write!(
                f,
                "scene id '{}' is declared {} times (last declaration wins)",
                scene, occurrences
            ),
            LintWarning::DanglingChoice {
                scene,
                choice,
                target,
            } => write!(
                f,
                "scene '{}': choice {} points to missing scene '{}'",
                scene, choice, target
            ),
            LintWarning::UnreachableScene { scene } => {
                write!(f, "scene '{}' is unreachable from the start scene", scene)
            }
        }
    }
}

/// Collect advisory warnings for a pack, in declaration order.
pub fn lint_pack(pack: &CampaignPack) -> Vec<LintWarning> {
    let mut warnings = Vec::new();

    let mut occurrences: FxHashMap<&str, usize> = FxHashMap::default();
    for scene in &pack.scenes {
        *occurrences.entry(scene.id.as_str()).or_insert(0) += 1;
    }
    let mut reported = FxHashSet::default();
    for scene in &pack.scenes {
        let count = occurrences[scene.id.as_str()];
        if count > 1 && reported.insert(scene.id.as_str()) {
            warnings.push(LintWarning::DuplicateSceneId {
                scene: scene.id.clone(),
                occurrences: count,
            });
        }
    }

    for scene in &pack.scenes {
        for (index, choice) in scene.choices.iter().enumerate() {
            if let Some(target) = choice.target() {
                if !occurrences.contains_key(target) {
                    warnings.push(LintWarning::DanglingChoice {
                        scene: scene.id.clone(),
                        choice: index,
                        target: target.to_string(),
                    });
                }
            }
        }
    }

    // Walk the graph as the session would see it: last declaration wins.
    let mut by_id = FxHashMap::default();
    for scene in &pack.scenes {
        by_id.insert(scene.id.as_str(), scene);
    }
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut queue = VecDeque::new();
    if let Some(start) = pack.start_scene_id() {
        if by_id.contains_key(start) {
            visited.insert(start);
            queue.push_back(start);
        }
    }
    while let Some(id) = queue.pop_front() {
        for target in by_id[id].choices.iter().filter_map(|c| c.target()) {
            if by_id.contains_key(target) && visited.insert(target) {
                queue.push_back(target);
            }
        }
    }
    let mut reported = FxHashSet::default();
    for scene in &pack.scenes {
        let id = scene.id.as_str();
        if !visited.contains(id) && reported.insert(id) {
            warnings.push(LintWarning::UnreachableScene {
                scene: scene.id.clone(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::pack::{Choice, Metadata, Scene};

    fn scene(id: &str, targets: &[&str]) -> Scene {
        Scene {
            id: id.to_string(),
            title: id.to_string(),
            text: String::new(),
            choices: targets
                .iter()
                .map(|t| Choice {
                    label: format!("to {}", t),
                    next_scene_id: Some(t.to_string()),
                })
                .collect(),
        }
    }

    fn pack(scenes: Vec<Scene>) -> CampaignPack {
        CampaignPack {
            meta: Metadata {
                pack_version: 1,
                id: "lint".to_string(),
                title: "Lint".to_string(),
                description: String::new(),
            },
            start_scene_id: None,
            scenes,
        }
    }

    #[test]
    fn clean_pack_has_no_warnings() {
        let p = pack(vec![scene("a", &["b"]), scene("b", &["a"])]);
        assert!(lint_pack(&p).is_empty());
    }

    #[test]
    fn reports_dangling_choice() {
        let p = pack(vec![scene("a", &["b", "ghost"]), scene("b", &[])]);
        assert_eq!(
            lint_pack(&p),
            vec![LintWarning::DanglingChoice {
                scene: "a".to_string(),
                choice: 1,
                target: "ghost".to_string(),
            }]
        );
    }

    #[test]
    fn reports_duplicate_once() {
        let p = pack(vec![scene("a", &[]), scene("a", &[]), scene("a", &[])]);
        let warnings = lint_pack(&p);
        assert_eq!(
            warnings,
            vec![LintWarning::DuplicateSceneId {
                scene: "a".to_string(),
                occurrences: 3,
            }]
        );
    }

    #[test]
    fn reports_unreachable_scene() {
        let p = pack(vec![scene("a", &["b"]), scene("b", &[]), scene("island", &["a"])]);
        let warnings = lint_pack(&p);
        assert_eq!(
            warnings,
            vec![LintWarning::UnreachableScene {
                scene: "island".to_string()
            }]
        );
        assert_eq!(
            warnings[0].to_string(),
            "scene 'island' is unreachable from the start scene"
        );
    }

    #[test]
    fn reachability_follows_last_declaration() {
        // The first "a" links to "b", but the session indexes the second one.
        let p = pack(vec![scene("a", &["b"]), scene("b", &[]), scene("a", &[])]);
        let warnings = lint_pack(&p);
        assert!(warnings.contains(&LintWarning::UnreachableScene {
            scene: "b".to_string()
        }));
    }
}
