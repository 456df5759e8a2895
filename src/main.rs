use anyhow::Context;
use flexi_logger::Logger;
use log::{error, info, warn};
use macroquad::prelude::*;
use pxpack_editor::render::backend::MacroquadCanvas;
use pxpack_editor::settings::{Settings, SETTINGS_FILE};
use pxpack_editor::ui::{EditorUi, Theme};
use pxpack_editor::{FrameInput, Session};
use std::path::PathBuf;

fn settings_path() -> PathBuf {
    PathBuf::from(SETTINGS_FILE)
}

// Window size comes from the saved settings
fn window_conf() -> Conf {
    let settings = Settings::load(&settings_path());
    Conf {
        window_title: "pxpack editor".into(),
        window_width: settings.width,
        window_height: settings.height,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let _logger = match Logger::try_with_env_or_str("info")
        .and_then(|l| l.start())
        .context("failed to start logging")
    {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("{e:#}");
            None
        }
    };

    if let Err(e) = run().await {
        error!("{e:#}");
    }
}

async fn run() -> anyhow::Result<()> {
    info!("Starting {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    let path = settings_path();
    let settings = Settings::load(&path);
    let mut session = Session::new(settings, path.clone());
    session.startup();

    prevent_quit();
    let mut canvas = MacroquadCanvas::new();
    let mut ui = EditorUi::new();
    let mut previous = Vec2::from(mouse_position());

    loop {
        let theme = Theme::for_style(session.settings().style);
        clear_background(theme.background);

        let input = FrameInput::poll(previous);
        previous = input.pointer;

        canvas.prune(session.tilesets());
        canvas.set_camera(*session.camera());
        if let Err(e) = session.draw(&mut canvas) {
            warn!("Draw failed: {e}");
        }

        let over_ui = ui.frame(&mut session);
        if !over_ui && !ui.is_modal() {
            session.update(&input);
        }

        if session.should_exit(is_quit_requested()) {
            break;
        }
        next_frame().await;
    }

    let settings = session.settings_mut();
    settings.width = screen_width() as i32;
    settings.height = screen_height() as i32;
    settings
        .save(&path)
        .with_context(|| format!("failed to save {}", path.display()))?;
    session.quit();
    info!("Bye");
    Ok(())
}
