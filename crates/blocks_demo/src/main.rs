use anyhow::{Context, Result};
use blocks_engine::foundation::logging;
use blocks_engine::prelude::*;
use clap::{Arg, Command};
use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

mod console;
mod render;

use console::CommandConsole;
use render::TextRenderer;

const DEFAULT_LOG_LEVEL: &str = "info";

fn main() -> Result<()> {
    let matches = Command::new("blocks_demo")
        .about("Drive a blocks world grasper from the command line")
        .arg(
            Arg::new("scene")
                .short('s')
                .long("scene")
                .value_name("FILE")
                .help("Scene definition to load (.ron or .toml); defaults to the standard scene"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Controller configuration (.ron or .toml)"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log filter used when RUST_LOG is unset")
                .default_value(DEFAULT_LOG_LEVEL),
        )
        .get_matches();

    let log_level = matches
        .get_one::<String>("log-level")
        .map_or(DEFAULT_LOG_LEVEL, String::as_str);
    logging::init_with_level(log_level);

    let definition = match matches.get_one::<String>("scene") {
        Some(path) => SceneDefinition::load_from_file(path)
            .with_context(|| format!("Failed to load scene definition from {path}"))?,
        None => SceneDefinition::standard(),
    };
    let config = match matches.get_one::<String>("config") {
        Some(path) => ControllerConfig::load_from_file(path)
            .with_context(|| format!("Failed to load controller configuration from {path}"))?,
        None => ControllerConfig::default(),
    };

    let scene = Scene::from_definition(&definition, config.grasp_tolerance).context("Scene definition is inconsistent")?;
    let mut controller = Controller::new(scene, config).context("Failed to create controller")?;
    let mut console = CommandConsole::new();
    let renderer = TextRenderer::new();

    println!("Blocks world ready. Type `help` for commands.");
    print!("{}", renderer.render(&controller.snapshot()));
    prompt();

    for line in spawn_input_reader() {
        let before = controller.scene().clone();
        if let Some(reply) = console.respond(&mut controller, &line) {
            println!("{reply}");
        }
        if console.is_finished() {
            break;
        }
        if controller.scene() != &before {
            print!("{}", renderer.render(&controller.snapshot()));
        }
        prompt();
    }

    log::info!("Console closed");
    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

/// Forward stdin lines to the control loop until input ends
fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(line).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    log::error!("Failed to read input: {error}");
                    break;
                }
            }
        }
    });
    receiver
}
