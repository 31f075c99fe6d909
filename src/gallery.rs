//! Gallery unlock table
//!
//! One illustration per stage, unlocked by clearing that stage. The art and
//! text come from the content pipeline; this is read-only data.

use serde::Serialize;

/// An unlockable gallery illustration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryEntry {
    /// Stage that unlocks this entry (1-based)
    pub stage: u32,
    /// Image path relative to the asset root
    pub image_file: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Shown in place of the image while locked
    pub unlock_condition: &'static str,
}

/// All entries, ordered by stage
pub static GALLERY: [GalleryEntry; 9] = [
    GalleryEntry {
        stage: 1,
        image_file: "images/gallery/stage1.png",
        display_name: "First Meeting",
        description: "Misaki introduces herself after class and challenges you to a match.",
        unlock_condition: "Clear Stage 1",
    },
    GalleryEntry {
        stage: 2,
        image_file: "images/gallery/stage2.png",
        display_name: "Lunch Break Rematch",
        description: "She insists the first game was a fluke and brings her lunch to the rooftop.",
        unlock_condition: "Clear Stage 2",
    },
    GalleryEntry {
        stage: 3,
        image_file: "images/gallery/stage3.png",
        display_name: "Library Whispers",
        description: "A quiet game between the shelves, with the librarian watching closely.",
        unlock_condition: "Clear Stage 3",
    },
    GalleryEntry {
        stage: 4,
        image_file: "images/gallery/stage4.png",
        display_name: "Rainy Afternoon",
        description: "Stuck under the station awning, Misaki suggests a game to pass the time.",
        unlock_condition: "Clear Stage 4",
    },
    GalleryEntry {
        stage: 5,
        image_file: "images/gallery/stage5.png",
        display_name: "Festival Stalls",
        description: "Between the food stands of the summer festival, the stakes get higher.",
        unlock_condition: "Clear Stage 5",
    },
    GalleryEntry {
        stage: 6,
        image_file: "images/gallery/stage6.png",
        display_name: "Beach Day",
        description: "Sand, sun and a best-of-three that neither of you wants to lose.",
        unlock_condition: "Clear Stage 6",
    },
    GalleryEntry {
        stage: 7,
        image_file: "images/gallery/stage7.png",
        display_name: "Culture Festival",
        description: "Misaki's class runs a game booth, and she saves the final round for you.",
        unlock_condition: "Clear Stage 7",
    },
    GalleryEntry {
        stage: 8,
        image_file: "images/gallery/stage8.png",
        display_name: "First Snow",
        description: "Walking home in the snow, she admits she has been practicing.",
        unlock_condition: "Clear Stage 8",
    },
    GalleryEntry {
        stage: 9,
        image_file: "images/gallery/stage9.png",
        display_name: "Final Match",
        description: "Graduation day. One last game under the cherry blossoms.",
        unlock_condition: "Clear Stage 9",
    },
];

/// All gallery entries in stage order
pub fn entries() -> &'static [GalleryEntry] {
    &GALLERY
}

/// Entry unlocked by `stage`, if any
pub fn entry_for_stage(stage: u32) -> Option<&'static GalleryEntry> {
    GALLERY.iter().find(|e| e.stage == stage)
}

/// Entries unlocked once `cleared_stage` has been cleared
pub fn unlocked_entries(cleared_stage: u32) -> impl Iterator<Item = &'static GalleryEntry> {
    GALLERY.iter().take_while(move |e| e.stage <= cleared_stage)
}
