//! Raw response shapes and their conversion into domain types.
//!
//! Every field is optional at the serde level so that one parse serves both
//! response policies: strict conversion rejects anything missing or out of
//! shape, lenient conversion fills gaps with empty values.

use serde::Deserialize;
use std::collections::HashSet;
use storyboard_core::{
    Character, DevelopedStory, Page, PageBuilder, ResponsePolicy, Scene, SceneBuilder,
    StoryboardData,
};
use storyboard_error::{PipelineError, StoryboardError, StoryboardResult};
use tracing::warn;

const DEVELOP: &str = "develop";
const STRUCTURE: &str = "structure";

/// `{story, screenplay}` as returned by the concept stage.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConceptWire {
    #[serde(default)]
    story: Option<String>,
    #[serde(default)]
    screenplay: Option<String>,
}

impl ConceptWire {
    pub(crate) fn into_story(self, policy: ResponsePolicy) -> StoryboardResult<DevelopedStory> {
        match policy {
            ResponsePolicy::Strict => {
                let story = required_text(self.story, "story", DEVELOP)?;
                let screenplay = required_text(self.screenplay, "screenplay", DEVELOP)?;
                Ok(DevelopedStory::new(story, screenplay))
            }
            ResponsePolicy::Lenient => Ok(DevelopedStory::new(
                self.story.unwrap_or_default(),
                self.screenplay.unwrap_or_default(),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CharacterWire {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SceneWire {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    scene_number: Option<u32>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    time_of_day: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    dialogue: Option<String>,
    #[serde(default)]
    visual_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageWire {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    page_number: Option<u32>,
    #[serde(default, alias = "layoutDescription")]
    page_layout_description: Option<String>,
    #[serde(default)]
    scenes: Vec<SceneWire>,
}

/// `{title, characters[], pages[]}` as returned by the structure stage.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoryboardWire {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    characters: Vec<CharacterWire>,
    #[serde(default)]
    pages: Vec<PageWire>,
}

/// The grid a structure response must fill.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Grid {
    pub(crate) pages: u32,
    pub(crate) panels_per_page: u32,
}

impl StoryboardWire {
    pub(crate) fn into_storyboard(
        self,
        grid: Grid,
        policy: ResponsePolicy,
    ) -> StoryboardResult<StoryboardData> {
        match policy {
            ResponsePolicy::Strict => self.into_strict(grid),
            ResponsePolicy::Lenient => Ok(self.into_lenient()),
        }
    }

    fn into_strict(self, grid: Grid) -> StoryboardResult<StoryboardData> {
        let title = required_text(self.title, "title", STRUCTURE)?;

        let mut character_ids = HashSet::new();
        let mut characters = Vec::with_capacity(self.characters.len());
        for raw in self.characters {
            let id = required_text(raw.id, "character id", STRUCTURE)?;
            if !character_ids.insert(id.clone()) {
                return Err(shape(format!("duplicate character id '{id}'")));
            }
            let name = required_text(raw.name, "character name", STRUCTURE)?;
            let description = raw.description.unwrap_or_default();
            characters.push(Character::new(id, name, description));
        }

        if self.pages.len() != grid.pages as usize {
            return Err(shape(format!(
                "expected {} pages, got {}",
                grid.pages,
                self.pages.len()
            )));
        }

        let mut raw_pages = self.pages;
        raw_pages.sort_by_key(|page| page.page_number.unwrap_or(u32::MAX));

        let mut page_ids = HashSet::new();
        let mut scene_ids = HashSet::new();
        let mut pages = Vec::with_capacity(raw_pages.len());

        for (index, raw_page) in raw_pages.into_iter().enumerate() {
            let expected_number = index as u32 + 1;
            let page_number = raw_page
                .page_number
                .ok_or_else(|| shape("page is missing pageNumber"))?;
            if page_number != expected_number {
                return Err(shape(format!(
                    "pages must be numbered 1..{}, found {page_number} at position {expected_number}",
                    grid.pages
                )));
            }
            let page_id = required_text(raw_page.id, "page id", STRUCTURE)?;
            if !page_ids.insert(page_id.clone()) {
                return Err(shape(format!("duplicate page id '{page_id}'")));
            }

            if raw_page.scenes.len() != grid.panels_per_page as usize {
                return Err(shape(format!(
                    "page {page_number} has {} scenes, expected {}",
                    raw_page.scenes.len(),
                    grid.panels_per_page
                )));
            }

            let mut raw_scenes = raw_page.scenes;
            raw_scenes.sort_by_key(|scene| scene.scene_number.unwrap_or(u32::MAX));

            let mut scenes = Vec::with_capacity(raw_scenes.len());
            for (scene_index, raw_scene) in raw_scenes.into_iter().enumerate() {
                let expected_scene = scene_index as u32 + 1;
                let scene_number = raw_scene.scene_number.ok_or_else(|| {
                    shape(format!("a scene on page {page_number} is missing sceneNumber"))
                })?;
                if scene_number != expected_scene {
                    return Err(shape(format!(
                        "scenes on page {page_number} must be numbered 1..{}, found {scene_number} at position {expected_scene}",
                        grid.panels_per_page
                    )));
                }
                let scene_id = required_text(raw_scene.id, "scene id", STRUCTURE)?;
                if !scene_ids.insert(scene_id.clone()) {
                    return Err(shape(format!("duplicate scene id '{scene_id}'")));
                }
                let action = required_text(raw_scene.action, "scene action", STRUCTURE)?;
                let visual_prompt = required_text(
                    raw_scene.visual_prompt,
                    "scene visualPrompt",
                    STRUCTURE,
                )?;
                scenes.push(build_scene(
                    scene_id,
                    scene_number,
                    raw_scene.location.unwrap_or_default(),
                    raw_scene.time_of_day.unwrap_or_default(),
                    action,
                    raw_scene.dialogue,
                    visual_prompt,
                )?);
            }

            pages.push(build_page(
                page_id,
                page_number,
                raw_page.page_layout_description.unwrap_or_default(),
                scenes,
            )?);
        }

        Ok(StoryboardData::new(title, characters, pages))
    }

    /// Keeps whatever arrived. Missing or repeated ids are replaced with
    /// positional ones and numbering follows the order received.
    fn into_lenient(self) -> StoryboardData {
        let mut character_ids = HashSet::new();
        let characters = self
            .characters
            .into_iter()
            .enumerate()
            .map(|(i, raw)| {
                Character::new(
                    unique_id(raw.id, format!("character-{}", i + 1), &mut character_ids),
                    raw.name.unwrap_or_default(),
                    raw.description.unwrap_or_default(),
                )
            })
            .collect();

        let mut raw_pages = self.pages;
        raw_pages.sort_by_key(|page| page.page_number.unwrap_or(u32::MAX));

        let mut page_ids = HashSet::new();
        let mut scene_ids = HashSet::new();
        let mut pages = Vec::with_capacity(raw_pages.len());

        for (i, raw_page) in raw_pages.into_iter().enumerate() {
            let page_number = i as u32 + 1;
            let mut raw_scenes = raw_page.scenes;
            raw_scenes.sort_by_key(|scene| scene.scene_number.unwrap_or(u32::MAX));

            let mut scenes = Vec::with_capacity(raw_scenes.len());
            for (j, raw_scene) in raw_scenes.into_iter().enumerate() {
                let scene_number = j as u32 + 1;
                let id = unique_id(
                    raw_scene.id,
                    format!("p{page_number}-s{scene_number}"),
                    &mut scene_ids,
                );
                if let Ok(scene) = build_scene(
                    id,
                    scene_number,
                    raw_scene.location.unwrap_or_default(),
                    raw_scene.time_of_day.unwrap_or_default(),
                    raw_scene.action.unwrap_or_default(),
                    raw_scene.dialogue,
                    raw_scene.visual_prompt.unwrap_or_default(),
                ) {
                    scenes.push(scene);
                }
            }

            let id = unique_id(raw_page.id, format!("page-{page_number}"), &mut page_ids);
            if let Ok(page) = build_page(
                id,
                page_number,
                raw_page.page_layout_description.unwrap_or_default(),
                scenes,
            ) {
                pages.push(page);
            }
        }

        StoryboardData::new(self.title.unwrap_or_default(), characters, pages)
    }
}

/// Returns `candidate` unless it is blank or already taken, in which case the
/// positional `fallback` is used (suffixed until free).
fn unique_id(candidate: Option<String>, fallback: String, seen: &mut HashSet<String>) -> String {
    let id = match candidate {
        Some(id) if !id.trim().is_empty() && !seen.contains(&id) => id,
        Some(id) => {
            if !id.trim().is_empty() {
                warn!(id = %id, replacement = %fallback, "Repeated id in response, renaming");
            }
            free_id(fallback, seen)
        }
        None => free_id(fallback, seen),
    };
    seen.insert(id.clone());
    id
}

fn free_id(fallback: String, seen: &HashSet<String>) -> String {
    let mut id = fallback.clone();
    let mut suffix = 2;
    while seen.contains(&id) {
        id = format!("{fallback}-{suffix}");
        suffix += 1;
    }
    id
}

fn build_scene(
    id: String,
    scene_number: u32,
    location: String,
    time_of_day: String,
    action: String,
    dialogue: Option<String>,
    visual_prompt: String,
) -> StoryboardResult<Scene> {
    let dialogue = dialogue.filter(|line| !line.trim().is_empty());
    SceneBuilder::default()
        .id(id)
        .scene_number(scene_number)
        .location(location)
        .time_of_day(time_of_day)
        .action(action)
        .dialogue(dialogue)
        .visual_prompt(visual_prompt)
        .build()
        .map_err(|e| storyboard_error::BuilderError::from_builder(e).into())
}

fn build_page(
    id: String,
    page_number: u32,
    layout_description: String,
    scenes: Vec<Scene>,
) -> StoryboardResult<Page> {
    PageBuilder::default()
        .id(id)
        .page_number(page_number)
        .layout_description(layout_description)
        .scenes(scenes)
        .build()
        .map_err(|e| storyboard_error::BuilderError::from_builder(e).into())
}

fn required_text(
    value: Option<String>,
    field: &str,
    operation: &'static str,
) -> StoryboardResult<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(PipelineError::invalid_shape(operation, format!("{field} is empty")).into()),
        None => Err(PipelineError::invalid_shape(operation, format!("missing {field}")).into()),
    }
}

#[track_caller]
fn shape(message: impl Into<String>) -> StoryboardError {
    PipelineError::invalid_shape(STRUCTURE, message).into()
}

/// Parses `text` as `T`, applying the response policy to unparseable input.
pub(crate) fn parse_response<T>(
    text: &str,
    operation: &'static str,
    policy: ResponsePolicy,
) -> StoryboardResult<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    let parsed = crate::extract_json_object(text)
        .ok_or_else(|| "response contains no JSON object".to_string())
        .and_then(|json| serde_json::from_str::<T>(json).map_err(|e| e.to_string()));

    match (parsed, policy) {
        (Ok(value), _) => Ok(value),
        (Err(message), ResponsePolicy::Strict) => {
            Err(PipelineError::invalid_shape(operation, message).into())
        }
        (Err(message), ResponsePolicy::Lenient) => {
            warn!(operation, error = %message, "Unparseable response, using empty result");
            Ok(T::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storyboard_error::PipelineErrorKind;

    fn grid(pages: u32, panels_per_page: u32) -> Grid {
        Grid {
            pages,
            panels_per_page,
        }
    }

    fn scene_json(page: u32, number: u32) -> serde_json::Value {
        json!({
            "id": format!("p{page}-s{number}"),
            "sceneNumber": number,
            "location": "Cliff",
            "timeOfDay": "Night",
            "action": format!("Beat {page}.{number}"),
            "visualPrompt": format!("Panel {page}.{number}")
        })
    }

    fn board_json(pages: u32, panels: u32) -> serde_json::Value {
        json!({
            "title": "The Bottle",
            "characters": [{"id": "keeper", "name": "Keeper", "description": "Grey mannequin"}],
            "pages": (1..=pages).map(|p| json!({
                "id": format!("page-{p}"),
                "pageNumber": p,
                "pageLayoutDescription": "Even grid",
                "scenes": (1..=panels).map(|s| scene_json(p, s)).collect::<Vec<_>>()
            })).collect::<Vec<_>>()
        })
    }

    fn strict(value: serde_json::Value, g: Grid) -> StoryboardResult<StoryboardData> {
        serde_json::from_value::<StoryboardWire>(value)
            .unwrap()
            .into_storyboard(g, ResponsePolicy::Strict)
    }

    fn shape_message(result: StoryboardResult<StoryboardData>) -> String {
        match result.unwrap_err().pipeline_kind() {
            Some(PipelineErrorKind::InvalidResponseShape { message, .. }) => message.clone(),
            other => panic!("expected invalid shape, got {other:?}"),
        }
    }

    #[test]
    fn strict_accepts_exact_grid() {
        let board = strict(board_json(3, 4), grid(3, 4)).unwrap();
        assert_eq!(board.pages().len(), 3);
        assert_eq!(board.panel_count(), 12);
        assert!(board.pages().iter().all(Page::has_contiguous_numbering));
        assert_eq!(board.pages()[1].layout_description(), "Even grid");
    }

    #[test]
    fn strict_reorders_scenes_before_checking() {
        let mut value = board_json(1, 4);
        value["pages"][0]["scenes"] = json!([
            scene_json(1, 3),
            scene_json(1, 1),
            scene_json(1, 4),
            scene_json(1, 2)
        ]);
        let board = strict(value, grid(1, 4)).unwrap();
        let numbers: Vec<u32> = board.pages()[0]
            .scenes()
            .iter()
            .map(|s| *s.scene_number())
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(board.pages()[0].scenes()[2].action(), "Beat 1.3");
    }

    #[test]
    fn strict_rejects_wrong_page_count() {
        let message = shape_message(strict(board_json(2, 4), grid(3, 4)));
        assert!(message.contains("expected 3 pages"));
    }

    #[test]
    fn strict_rejects_short_page() {
        let message = shape_message(strict(board_json(2, 4), grid(2, 5)));
        assert!(message.contains("expected 5"));
    }

    #[test]
    fn strict_rejects_gap_in_scene_numbers() {
        let mut value = board_json(1, 4);
        value["pages"][0]["scenes"][3]["sceneNumber"] = json!(7);
        let message = shape_message(strict(value, grid(1, 4)));
        assert!(message.contains("numbered"));
    }

    #[test]
    fn strict_rejects_duplicate_scene_ids_across_pages() {
        let mut value = board_json(2, 4);
        value["pages"][1]["scenes"][0]["id"] = json!("p1-s1");
        let message = shape_message(strict(value, grid(2, 4)));
        assert!(message.contains("duplicate scene id"));
    }

    #[test]
    fn strict_rejects_blank_visual_prompt() {
        let mut value = board_json(1, 4);
        value["pages"][0]["scenes"][2]["visualPrompt"] = json!("  ");
        let message = shape_message(strict(value, grid(1, 4)));
        assert!(message.contains("visualPrompt"));
    }

    #[test]
    fn strict_rejects_duplicate_characters() {
        let mut value = board_json(1, 4);
        value["characters"] = json!([
            {"id": "a", "name": "A", "description": ""},
            {"id": "a", "name": "B", "description": ""}
        ]);
        let message = shape_message(strict(value, grid(1, 4)));
        assert!(message.contains("duplicate character id"));
    }

    #[test]
    fn lenient_keeps_partial_boards() {
        let value = json!({
            "pages": [{"scenes": [{"action": "Only beat"}]}]
        });
        let board = serde_json::from_value::<StoryboardWire>(value)
            .unwrap()
            .into_storyboard(grid(5, 4), ResponsePolicy::Lenient)
            .unwrap();
        assert_eq!(board.title(), "");
        assert_eq!(board.pages().len(), 1);
        assert_eq!(board.pages()[0].id(), "page-1");
        assert_eq!(board.pages()[0].scenes()[0].id(), "p1-s1");
    }

    #[test]
    fn lenient_renames_repeated_ids() {
        let mut value = board_json(2, 4);
        for p in 0..2 {
            value["pages"][p]["id"] = json!("page");
            for s in 0..4 {
                value["pages"][p]["scenes"][s]["id"] = json!(format!("scene-{}", s + 1));
            }
        }
        // Taken by the first page, so the positional form for page 2 collides too.
        value["pages"][0]["scenes"][3]["id"] = json!("p2-s1");

        let board = serde_json::from_value::<StoryboardWire>(value)
            .unwrap()
            .into_storyboard(grid(2, 4), ResponsePolicy::Lenient)
            .unwrap();

        let page_ids: Vec<&str> = board.pages().iter().map(|p| p.id().as_str()).collect();
        assert_eq!(page_ids, vec!["page", "page-2"]);

        let scene_ids: Vec<&str> = board
            .pages()
            .iter()
            .flat_map(|p| p.scenes())
            .map(|s| s.id().as_str())
            .collect();
        assert_eq!(
            scene_ids,
            vec![
                "scene-1", "scene-2", "scene-3", "p2-s1", "p2-s1-2", "p2-s2", "p2-s3", "scene-4"
            ]
        );
    }

    #[test]
    fn blank_dialogue_is_dropped() {
        let mut value = board_json(1, 4);
        value["pages"][0]["scenes"][0]["dialogue"] = json!("");
        value["pages"][0]["scenes"][1]["dialogue"] = json!("Who's there?");
        let board = strict(value, grid(1, 4)).unwrap();
        let scenes = board.pages()[0].scenes();
        assert_eq!(scenes[0].dialogue(), &None);
        assert_eq!(scenes[1].dialogue().as_deref(), Some("Who's there?"));
    }

    #[test]
    fn concept_policies() {
        let wire = ConceptWire {
            story: Some("A story".into()),
            screenplay: None,
        };
        assert!(wire.clone().into_story(ResponsePolicy::Strict).is_err());
        let lenient = wire.into_story(ResponsePolicy::Lenient).unwrap();
        assert_eq!(lenient.story, "A story");
        assert_eq!(lenient.screenplay, "");
    }

    #[test]
    fn unparseable_text_follows_policy() {
        let strict: StoryboardResult<ConceptWire> =
            parse_response("not json", DEVELOP, ResponsePolicy::Strict);
        assert!(matches!(
            strict.unwrap_err().pipeline_kind(),
            Some(PipelineErrorKind::InvalidResponseShape { .. })
        ));

        let lenient: ConceptWire =
            parse_response("not json", DEVELOP, ResponsePolicy::Lenient).unwrap();
        assert!(lenient.story.is_none());
    }
}
