mod ai;
mod game;
mod i18n;
mod sound;
mod storage;
mod ui;

use std::path::{Path, PathBuf};

use gtk4::prelude::*;
use gtk4::Application;

/// File every usable resources directory carries.
const RESOURCE_MARKER: &str = "en.ftl";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = Application::builder()
        .application_id("io.github.snakewatergun.SnakeWaterGun")
        .build();

    app.connect_activate(|app| {
        let res_dir = pick_resources_dir(&resource_candidates());
        log::debug!("resources in {}", res_dir.display());
        ui::app::build_ui(app, &res_dir);
    });

    app.run();
}

/// `resources/` under the working directory, then next to the executable.
fn resource_candidates() -> Vec<PathBuf> {
    let cwd = std::env::current_dir().ok();
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    cwd.into_iter()
        .chain(exe_dir)
        .map(|d| d.join("resources"))
        .collect()
}

/// First candidate holding the translations. Without one the UI still
/// runs, showing message ids in place of text.
fn pick_resources_dir(candidates: &[PathBuf]) -> PathBuf {
    match candidates.iter().find(|d| d.join(RESOURCE_MARKER).is_file()) {
        Some(dir) => dir.clone(),
        None => {
            log::warn!("no resources directory with {RESOURCE_MARKER} found");
            PathBuf::from("resources")
        }
    }
}
