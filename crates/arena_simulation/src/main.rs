//! Headless симуляция арены
//!
//! Загружает `config/arena.ron` (или путь из первого аргумента), крутит
//! матч с ручным fixed timestep и печатает HUD сообщения по мере изменения.
//!
//! Usage: arena_simulation [config.ron] [seed]

use std::io::ErrorKind;

use arena_simulation::{
    create_headless_app, log_error, log_info, log_warning, ArenaConfig, MatchHud, MatchPhase,
    MatchSetupError, RoundStateMachine, SimulationPlugin, SIMULATION_HZ,
};

const DEFAULT_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/arena.ron");
const DEFAULT_SEED: u64 = 42;

fn load_config(path: &str) -> Option<ArenaConfig> {
    match ArenaConfig::load(path) {
        Ok(config) => Some(config),
        Err(MatchSetupError::ConfigIo(err)) if err.kind() == ErrorKind::NotFound => {
            log_warning(&format!("{} not found, using default arena", path));
            Some(ArenaConfig::default())
        }
        Err(err) => {
            log_error(&format!("{}: {}", path, err));
            None
        }
    }
}

fn main() {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let seed = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    let mut app = create_headless_app(seed);

    let Some(config) = load_config(&config_path) else {
        std::process::exit(1);
    };

    // Timeout → restart → второй матч, с запасом
    let rules = &config.match_rules;
    let budget_secs = 2.0 * rules.max_game_time + rules.restart_delay + 10.0;
    let max_ticks = (budget_secs as f64 * SIMULATION_HZ) as u64;

    log_info(&format!(
        "Starting arena simulation (seed: {}, config: {})",
        seed, config_path
    ));
    app.add_plugins(SimulationPlugin::new(config));

    let mut last_message = String::new();
    for tick in 0..max_ticks {
        app.update();

        let world = app.world();
        if let Some(hud) = world.get_resource::<MatchHud>() {
            if hud.message != last_message {
                if !hud.message.is_empty() {
                    println!("[tick {} | {}]\n{}", tick, hud.timer_text, hud.message);
                }
                last_message = hud.message.clone();
            }
        }

        let Some(machine) = world.get_resource::<RoundStateMachine>() else {
            log_error("Match setup failed, nothing to simulate");
            std::process::exit(1);
        };
        if machine.phase() == MatchPhase::GameOver && !machine.is_restart_pending() {
            log_info(&format!("Match over after {} ticks ({:?})", tick, machine.end_reason()));
            return;
        }
    }

    log_warning(&format!("Tick budget ({}) exhausted", max_ticks));
}
