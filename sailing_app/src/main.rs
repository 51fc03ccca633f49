//! Sailing demo application
//!
//! Runs the sailing game headlessly: a scripted sequence of key presses
//! drives the menu, sails the boat for a while, pauses, resumes and quits.
//!
//! Usage: `sailing_demo [config.toml|config.ron]`

mod sailing;

use sail_engine::foundation::logging;
use sail_engine::prelude::*;
use thiserror::Error;

use sailing::{build_engine, Boat};

/// Hard stop for the scripted run
const MAX_FRAMES: u32 = 60 * 30;

/// Wind speed used by the demo, units per second
const WIND_SPEED: f32 = 3.0;

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Failed to load configuration: {0}")]
    Config(#[from] sail_engine::config::ConfigError),
}

/// One scripted key event
#[derive(Debug, Clone, Copy)]
struct ScriptStep {
    frame: u32,
    key: KeyCode,
    down: bool,
}

impl ScriptStep {
    const fn press(frame: u32, key: KeyCode) -> Self {
        Self { frame, key, down: true }
    }

    const fn release(frame: u32, key: KeyCode) -> Self {
        Self { frame, key, down: false }
    }
}

/// Start, trim right for a second, sail, pause, resume, then quit from the pause menu
const SCRIPT: &[ScriptStep] = &[
    ScriptStep::press(30, KeyCode::Enter),
    ScriptStep::release(32, KeyCode::Enter),
    ScriptStep::press(120, KeyCode::Right),
    ScriptStep::release(180, KeyCode::Right),
    ScriptStep::press(400, KeyCode::Escape),
    ScriptStep::release(402, KeyCode::Escape),
    ScriptStep::press(460, KeyCode::Enter),
    ScriptStep::release(462, KeyCode::Enter),
    ScriptStep::press(700, KeyCode::Escape),
    ScriptStep::release(702, KeyCode::Escape),
    ScriptStep::press(720, KeyCode::Q),
];

fn load_config() -> Result<EngineConfig, AppError> {
    match std::env::args().nth(1) {
        Some(path) => Ok(EngineConfig::load_from_file(path)?),
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> Result<(), AppError> {
    let config = load_config()?;
    logging::init_with_filter(&config.logging.filter);

    log::info!("Creating sailing demo application...");
    let (mut engine, helm, boat) = build_engine(config, WIND_SPEED)?;

    let step = engine.config().simulation.fixed_timestep;
    let mut script = SCRIPT.iter().peekable();
    for frame in 0..MAX_FRAMES {
        while let Some(event) = script.next_if(|event| event.frame == frame) {
            engine.input_mut().handle_key_input(event.key, event.down);
        }

        let state_before = engine.current_state().to_string();
        engine.tick(step);
        if engine.current_state() != state_before {
            log::info!("Frame {}: {} -> {}", frame, state_before, engine.current_state());
        }

        if frame % 60 == 0 {
            if let Some(entity) = engine.world().entity(boat) {
                if let (Some(transform), Some(sail)) =
                    (entity.get_component::<TransformComponent>(), entity.get_component::<Boat>())
                {
                    log::info!(
                        "Boat at ({:.2}, {:.2}), sail {:.2} rad",
                        transform.position.x, transform.position.y, sail.sail_angle
                    );
                }
            }
        }

        if helm.exit_requested() {
            engine.quit();
            break;
        }
    }

    log::info!("Sailing demo finished after {} frames", engine.frame_count());
    Ok(())
}
