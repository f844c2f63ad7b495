//! Canned responses and domain values.

use serde_json::{Value, json};
use storyboard_core::{Character, Page, PageBuilder, Scene, SceneBuilder, StoryboardData};

/// The seed idea used by the end-to-end tests.
pub const LIGHTHOUSE_IDEA: &str =
    "A lonely lighthouse keeper finds a message in a bottle that predicts tomorrow's storm.";

/// A concept response with `beats` numbered screenplay lines.
pub fn concept_value(beats: u32) -> Value {
    let screenplay = (1..=beats)
        .map(|n| format!("{n}. The keeper does thing {n}."))
        .collect::<Vec<_>>()
        .join("\n");
    json!({
        "story": "A keeper reads a warning from the sea and saves a ship.",
        "screenplay": screenplay,
    })
}

/// A structure response holding an exact `pages` x `panels` grid.
///
/// Scene ids are `pN-sM`; the keeper is mentioned in every first panel.
pub fn storyboard_value(title: &str, pages: u32, panels: u32) -> Value {
    let pages_json = (1..=pages)
        .map(|p| {
            let scenes = (1..=panels)
                .map(|s| {
                    let action = if s == 1 {
                        format!("The Keeper looks out on page {p}.")
                    } else {
                        format!("Waves roll in, beat {p}.{s}.")
                    };
                    json!({
                        "id": format!("p{p}-s{s}"),
                        "sceneNumber": s,
                        "location": "Lighthouse gallery",
                        "timeOfDay": "Dusk",
                        "action": action,
                        "visualPrompt": format!("Wide shot of the gallery, beat {p}.{s}"),
                    })
                })
                .collect::<Vec<_>>();
            json!({
                "id": format!("page-{p}"),
                "pageNumber": p,
                "pageLayoutDescription": "Even grid",
                "scenes": scenes,
            })
        })
        .collect::<Vec<_>>();

    json!({
        "title": title,
        "characters": [
            {"id": "keeper", "name": "Keeper", "description": "Tall grey mannequin in a long coat"},
            {"id": "gull", "name": "Gull", "description": "Small white bird silhouette"}
        ],
        "pages": pages_json,
    })
}

/// A scene with predictable content.
pub fn scene(page: u32, number: u32) -> Scene {
    SceneBuilder::default()
        .id(format!("p{page}-s{number}"))
        .scene_number(number)
        .location("Lighthouse gallery")
        .time_of_day("Dusk")
        .action(format!("Beat {page}.{number}"))
        .visual_prompt(format!("Panel {page}.{number}"))
        .build()
        .unwrap()
}

/// A page of `panels` predictable scenes.
pub fn page(number: u32, panels: u32) -> Page {
    PageBuilder::default()
        .id(format!("page-{number}"))
        .page_number(number)
        .scenes((1..=panels).map(|s| scene(number, s)).collect::<Vec<_>>())
        .build()
        .unwrap()
}

/// A `pages` x `panels` storyboard built directly, without a driver.
pub fn storyboard(pages: u32, panels: u32) -> StoryboardData {
    StoryboardData::new(
        "Fixture Board",
        vec![Character::new("keeper", "Keeper", "Tall grey mannequin")],
        (1..=pages).map(|p| page(p, panels)).collect(),
    )
}
