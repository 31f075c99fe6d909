//! Misaki save inspector
//!
//! Native helper for looking at exported save bundles:
//! `misaki-save EXPORT.json` loads the bundle into an in-memory store and
//! prints the save menu summary. Without arguments it lists the gallery.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        print_gallery();
        return ExitCode::SUCCESS;
    };

    let blob = match std::fs::read_to_string(&path) {
        Ok(blob) => blob,
        Err(e) => {
            log::error!("Failed to read {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    match inspect_export(&blob) {
        Ok(report) => {
            print!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to import {}: {}", path, e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn print_gallery() {
    for entry in misaki_save::gallery::entries() {
        println!(
            "Stage {}: {} ({})\n    {}\n    Unlock: {}",
            entry.stage, entry.display_name, entry.image_file, entry.description, entry.unlock_condition
        );
    }
}

/// Import `blob` into a scratch store and render the slot table
#[cfg(not(target_arch = "wasm32"))]
fn inspect_export(blob: &str) -> Result<String, misaki_save::SaveError> {
    use std::fmt::Write;

    use misaki_save::{MemoryStorage, SaveSystem};

    let mut saves = SaveSystem::new(MemoryStorage::new());
    saves.import_game_data(blob)?;

    let now = chrono::Utc::now();
    let mut out = String::new();
    for info in saves.all_save_info() {
        let label = if info.is_autosave() {
            "Auto".to_string()
        } else {
            format!("{:>4}", info.slot)
        };
        if info.exists {
            let _ = writeln!(
                out,
                "{} | {:>3}% | {:<16} | {}",
                label,
                info.progress,
                info.scene.as_deref().unwrap_or("-"),
                info.saved_ago(now)
            );
        } else {
            let _ = writeln!(out, "{} | empty", label);
        }
    }

    let usage = saves.storage_usage()?;
    let settings = saves.load_settings();
    let _ = writeln!(
        out,
        "\n{} items, {} | language {} | text speed {}",
        usage.item_count,
        usage.formatted_size,
        settings.language(),
        settings.text_speed_preset().as_str()
    );
    Ok(out)
}
