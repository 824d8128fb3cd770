use std::env;
use std::io::{self, BufRead};
use std::path::Path;
use std::process::ExitCode;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use multiply_core::reconstitute;
use multiply_engine::{bind_store, serve_store, ReqwestRemoteSync, StateSlot, SyncBridge};
use sync_logging::{sync_error, sync_info, sync_warn};

use super::config::{apply_args, load_config, AppConfig, USAGE};
use super::logging;
use super::render::{parse_line, render, Input, HELP};

const TICK: Duration = Duration::from_millis(75);

pub fn run_app() -> ExitCode {
    let (config, config_error) = match load_config(Path::new(".")) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    let config = match apply_args(config, env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    logging::initialize(config.log_destination);
    if let Some(err) = config_error {
        sync_warn!("Using default configuration: {}", err);
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            sync_error!("Could not start runtime: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if config.serve {
        let listener = match runtime.block_on(bind_store(&config.bind)) {
            Ok(listener) => listener,
            Err(err) => {
                sync_error!("{}", err);
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        };
        runtime.spawn(async move {
            if let Err(err) = serve_store(listener, StateSlot::seeded()).await {
                sync_error!("{}", err);
            }
        });
    }

    let settings = config.sync_settings();
    let remote = match ReqwestRemoteSync::new(&settings) {
        Ok(remote) => Arc::new(remote),
        Err(err) => {
            sync_error!("Could not create store client: {}", err);
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    // The store's current record plays the part of the embedded snapshot.
    let embedded = match runtime.block_on(remote.fetch_snapshot()) {
        Ok(text) => Some(text),
        Err(err) => {
            sync_warn!("Could not load snapshot from {}: {}", settings.api_url, err);
            None
        }
    };
    let snapshot = reconstitute(embedded.as_deref());

    let mut bridge = if config.force_local {
        SyncBridge::local(snapshot)
    } else {
        SyncBridge::connect(snapshot, remote, &settings)
    };

    let input_rx = spawn_input_reader();
    println!("{HELP}");
    loop {
        match input_rx.recv_timeout(TICK) {
            Ok(Input::Edit(operand, text)) => {
                bridge.set_operand(operand, &text);
            }
            Ok(Input::Show) => println!("{}", render(bridge.view(), bridge.mode())),
            Ok(Input::Help) => println!("{HELP}"),
            Ok(Input::Quit) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }

        bridge.pump();
        if bridge.consume_dirty() {
            println!("{}", render(bridge.view(), bridge.mode()));
        }
    }

    bridge.shutdown();
    sync_info!("Session ended");
    ExitCode::SUCCESS
}

fn spawn_input_reader() -> mpsc::Receiver<Input> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(parse_line(&line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Input::Quit);
    });
    rx
}
