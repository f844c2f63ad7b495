//! Prompt text for every stage.

use storyboard_core::{Character, Page, PanelGrid, Scene};

/// Rendering style fixed across every page so the board looks consistent.
pub const SKETCH_STYLE: &str = "Monochrome technical storyboard sketch: clean black pencil \
linework on white paper, light grey tonal shading, no color, no text, no speech bubbles, \
no captions. Characters are drawn as simple mannequin figures or silhouettes.";

pub(crate) const CONCEPT_SYSTEM: &str = "You are a story developer for a film storyboard \
studio. You turn short ideas into tight visual screenplays. Every beat you write must be a \
concrete, drawable action: what the camera sees, not what characters think.";

pub(crate) const STRUCTURE_SYSTEM: &str = "You are a storyboard supervisor. You break \
screenplays into pages of panels for a sketch artist. You describe characters only as \
minimalist silhouettes or mannequins so every artist draws them the same way.";

/// User prompt for the concept stage.
pub(crate) fn concept_prompt(idea: &str, panel_count: u32) -> String {
    format!(
        "Develop the following idea into a short story and a screenplay.\n\n\
         IDEA:\n{idea}\n\n\
         Requirements:\n\
         - `story`: a narrative summary of two to four sentences.\n\
         - `screenplay`: exactly {panel_count} beats, one per line, numbered 1 to {panel_count}.\n\
         - The beats must be sequential and logically contiguous; each follows directly from the one before.\n\
         - Phrase every beat as a single concrete visual action that can be drawn as one panel.\n\
         - Do not add beats for titles, credits or transitions."
    )
}

/// User prompt for the structure stage.
pub(crate) fn structure_prompt(screenplay: &str, pages: u32, panels_per_page: u32) -> String {
    let grid = PanelGrid::for_panels(panels_per_page);
    let total = pages * panels_per_page;
    format!(
        "Structure the screenplay below into a storyboard.\n\n\
         SCREENPLAY:\n{screenplay}\n\n\
         Layout:\n\
         - Exactly {pages} pages, numbered 1 to {pages}.\n\
         - Exactly {panels_per_page} scenes on every page, numbered 1 to {panels_per_page} within the page ({total} panels in total).\n\
         - Each page is a grid of {columns} columns by {rows} rows. Panels read strictly left-to-right, then top-to-bottom: \
           scene i sits in row ceil(i / {columns}) and column ((i - 1) mod {columns}) + 1.\n\
         - Choose the content of each slot so the story reads correctly in that order.\n\n\
         Identifiers:\n\
         - Character ids are short lowercase slugs and unique.\n\
         - Page ids are \"page-N\"; scene ids are \"pN-sM\" and unique across the whole storyboard.\n\n\
         Characters:\n\
         - List every recurring character once.\n\
         - Describe each one as a generic minimalist figure (silhouette or mannequin), naming only shape, \
           posture and one or two distinguishing props. No facial detail.\n\n\
         Scenes:\n\
         - `action` is the beat shown in the panel. `dialogue` is optional.\n\
         - `visualPrompt` must be self-contained: it restates setting, time of day, framing and the \
           characters' silhouette descriptions so the panel can be drawn on its own.",
        columns = grid.columns(),
        rows = grid.rows(),
    )
}

/// Characters mentioned by name in any of `texts`, in roster order. Falls
/// back to the whole roster when none are mentioned.
pub fn referenced_characters<'a, I, S>(texts: I, characters: &'a [Character]) -> Vec<&'a Character>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let haystack = texts
        .into_iter()
        .map(|text| text.as_ref().to_lowercase())
        .collect::<Vec<_>>()
        .join("\n");

    let mentioned: Vec<&Character> = characters
        .iter()
        .filter(|c| {
            let name = c.name().trim().to_lowercase();
            !name.is_empty() && haystack.contains(&name)
        })
        .collect();

    if mentioned.is_empty() {
        characters.iter().collect()
    } else {
        mentioned
    }
}

fn scene_texts(scene: &Scene) -> impl Iterator<Item = &str> {
    [
        Some(scene.action().as_str()),
        Some(scene.visual_prompt().as_str()),
        Some(scene.location().as_str()),
        scene.dialogue().as_deref(),
    ]
    .into_iter()
    .flatten()
}

fn character_block(characters: &[&Character]) -> String {
    if characters.is_empty() {
        return "CHARACTERS: none.".to_string();
    }
    let lines = characters
        .iter()
        .map(|c| format!("- {}: {}", c.name(), c.description()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("CHARACTERS (draw exactly as described, identical in every panel):\n{lines}")
}

/// Composite prompt asking for one image of a whole page.
///
/// # Examples
///
/// ```
/// use storyboard_core::{Character, PageBuilder, SceneBuilder};
/// use storyboard_pipeline::compose_page_prompt;
///
/// let scenes = (1..=4u32)
///     .map(|n| {
///         SceneBuilder::default()
///             .id(format!("p1-s{n}"))
///             .scene_number(n)
///             .location("Lighthouse")
///             .time_of_day("Night")
///             .action(format!("The Keeper climbs step {n}"))
///             .visual_prompt(format!("Spiral stair, step {n}"))
///             .build()
///             .unwrap()
///     })
///     .collect::<Vec<_>>();
/// let page = PageBuilder::default()
///     .id("page-1")
///     .page_number(1u32)
///     .scenes(scenes)
///     .build()
///     .unwrap();
/// let roster = vec![Character::new("keeper", "Keeper", "Tall grey mannequin")];
///
/// let prompt = compose_page_prompt(&page, &roster);
/// assert!(prompt.contains("4 panels"));
/// assert!(prompt.contains("Tall grey mannequin"));
/// assert!(prompt.contains("Panel 3 (row 2, column 1)"));
/// ```
pub fn compose_page_prompt(page: &Page, characters: &[Character]) -> String {
    let scenes = page.scenes();
    let grid = PanelGrid::for_panels(scenes.len() as u32);
    let cast = referenced_characters(scenes.iter().flat_map(scene_texts), characters);

    let panels = scenes
        .iter()
        .enumerate()
        .map(|(i, scene)| {
            let index = i as u32 + 1;
            let cell = grid
                .position(index)
                .map(|cell| format!(" (row {}, column {})", cell.row, cell.column))
                .unwrap_or_default();
            format!(
                "Panel {index}{cell}: {}\n  Action: {}",
                scene.visual_prompt(),
                scene.action()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let layout = if page.layout_description().trim().is_empty() {
        String::new()
    } else {
        format!("Layout notes: {}\n", page.layout_description())
    };

    format!(
        "Storyboard page {number}: a single image containing {count} panels arranged as a grid of \
         {columns} columns by {rows} rows, separated by thin white gutters with a black border \
         around each panel. Read the panels strictly left-to-right, then top-to-bottom; \
         panel 1 is top-left.\n{layout}\n\
         STYLE: {SKETCH_STYLE}\n\n\
         {characters}\n\n\
         PANELS:\n{panels}",
        number = page.page_number(),
        count = scenes.len(),
        columns = grid.columns(),
        rows = grid.rows(),
        characters = character_block(&cast),
    )
}

/// Prompt for a single panel drawn on its own.
pub fn compose_scene_prompt(scene: &Scene, characters: &[Character]) -> String {
    let cast = referenced_characters(scene_texts(scene), characters);
    format!(
        "A single storyboard panel.\n\
         STYLE: {SKETCH_STYLE}\n\n\
         {characters}\n\n\
         SETTING: {location}, {time}\n\
         SHOT: {prompt}\n\
         ACTION: {action}",
        characters = character_block(&cast),
        location = scene.location(),
        time = scene.time_of_day(),
        prompt = scene.visual_prompt(),
        action = scene.action(),
    )
}
