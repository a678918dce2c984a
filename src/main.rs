//! Coin Dash entry point
//!
//! Headless runner: loads settings and levels, then drives the scene machine
//! with a scripted input pattern at roughly 60 frames per second.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Coin Dash (headless) starting...");
    native::run(std::env::args().nth(1))
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives `SceneMachine` directly
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::Duration;

    use anyhow::{Context, bail};

    use coin_dash::audio::{AudioManager, LogBackend};
    use coin_dash::clock::SystemClock;
    use coin_dash::hud::{Frame, format_clock};
    use coin_dash::input::{Action, InputLatch};
    use coin_dash::levels::{LevelLibrary, demo_level};
    use coin_dash::{GameContext, PhaseKind, SceneMachine, Settings};

    const FRAMES: u32 = 900;
    const FRAME_TIME: Duration = Duration::from_millis(16);

    pub fn run(settings_path: Option<String>) -> anyhow::Result<()> {
        let settings = match settings_path {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };

        let mut levels = LevelLibrary::from_settings(&settings);
        if levels.is_empty() {
            log::info!("No level files configured, using the built-in demo level");
            levels
                .insert("demo", demo_level(), None)
                .context("built-in demo level is invalid")?;
        }
        if settings.characters.is_empty() {
            bail!("settings list no characters");
        }

        let ctx = GameContext::new(
            settings,
            levels,
            AudioManager::new(Box::new(LogBackend)),
            Box::new(SystemClock::new()),
        );
        let mut machine = SceneMachine::new(ctx);
        let mut latch = InputLatch::new();
        let mut last = Frame::new(PhaseKind::Start);

        for frame in 0..FRAMES {
            script(frame, machine.kind(), &mut latch);
            let input = latch.sample();
            last = machine.frame(&input);
            if matches!(last.phase, PhaseKind::GameOver | PhaseKind::Win) {
                break;
            }
            std::thread::sleep(FRAME_TIME);
        }

        match &last.hud {
            Some(hud) => log::info!(
                "Final HUD: {} left, {}/{} coins, {} balls ({})",
                format_clock(hud.remaining_ms),
                hud.coins,
                hud.total_coins,
                last.ball_count(),
                serde_json::to_string(hud)?
            ),
            None => log::info!("Finished in {:?}: {}", last.phase, serde_json::to_string(&last.sprites)?),
        }
        Ok(())
    }

    /// Scripted player: walk through the menus, then run right, jumping and
    /// kicking at a steady rhythm.
    fn script(frame: u32, phase: PhaseKind, latch: &mut InputLatch) {
        match phase {
            PhaseKind::Start | PhaseKind::CharacterSelect | PhaseKind::LevelSelect => {
                if frame % 10 == 0 {
                    latch.click();
                }
            }
            PhaseKind::Play => {
                latch.key_down(Action::Right);
                match frame % 45 {
                    0 => latch.key_down(Action::Jump),
                    12 => latch.key_up(Action::Jump),
                    _ => {}
                }
                match frame % 30 {
                    15 => latch.touch(Action::Kick, true),
                    20 => latch.touch(Action::Kick, false),
                    _ => {}
                }
            }
            PhaseKind::GameOver | PhaseKind::Win => {}
        }
    }
}
