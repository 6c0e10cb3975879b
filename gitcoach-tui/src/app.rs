use crate::{keymap, screens, theme::Theme};
use crossterm::event::{self, Event, KeyEventKind};
use gitcoach_core::{
    action::Action,
    chain::run_chain,
    event::{AppEvent, EventSender},
    git::{self, CommandSpec, GitRunner},
    history,
    state::{AppState, Effect},
};
use ratatui::DefaultTerminal;
use std::{
    path::PathBuf,
    sync::{Arc, mpsc},
    thread,
    time::{Duration, Instant},
};

/// The session event loop: sole owner and mutator of `state`.
///
/// Background producers (the chain driver, stream readers, one-shot loaders)
/// only ever post [`AppEvent`]s through the channel; the loop applies them
/// and re-renders after every one. Quitting returns immediately without
/// waiting for in-flight work — late events land in a dropped receiver.
pub fn run(
    terminal: &mut DefaultTerminal,
    state: &mut AppState,
    runner: &Arc<dyn GitRunner>,
    theme: &Theme,
) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel::<AppEvent>();
    let sender = EventSender::new(tx);
    let spinner_start = Instant::now();

    if let Some(effect) = state.on_enter() {
        execute(effect, state, runner, &sender);
    }

    loop {
        terminal.draw(|f| screens::draw(f, state, theme, &spinner_start))?;

        // Check the background channel first (non-blocking)
        if let Ok(app_event) = rx.try_recv() {
            if let Some(effect) = state.handle_event(app_event) {
                execute(effect, state, runner, &sender);
            }
            continue;
        }

        // Poll terminal events with a timeout so the spinner keeps animating
        // and the channel gets re-checked between keystrokes
        if event::poll(Duration::from_millis(80))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = keymap::resolve_action(key, state) {
                    if action == Action::Quit {
                        return Ok(());
                    }
                    if let Some(effect) = state.handle_action(action) {
                        execute(effect, state, runner, &sender);
                    }
                    if state.exited {
                        return Ok(());
                    }
                }
            }
        }
    }
}

fn execute(effect: Effect, state: &AppState, runner: &Arc<dyn GitRunner>, sender: &EventSender) {
    match effect {
        Effect::RunChain(steps) => spawn_chain(runner, sender, steps),
        Effect::LoadStatus => spawn_status_load(runner, sender, state.dir.clone()),
        Effect::ScanHistory => spawn_history_scan(runner, sender, state.dir.clone()),
    }
}

fn spawn_chain(runner: &Arc<dyn GitRunner>, sender: &EventSender, steps: Vec<CommandSpec>) {
    log::debug!("starting chain of {} step(s)", steps.len());
    let runner = Arc::clone(runner);
    let sender = sender.clone();
    thread::spawn(move || run_chain(runner.as_ref(), &steps, &sender));
}

fn spawn_status_load(runner: &Arc<dyn GitRunner>, sender: &EventSender, dir: PathBuf) {
    let runner = Arc::clone(runner);
    let sender = sender.clone();
    thread::spawn(move || match runner.run_captured(&git::status_spec(&dir)) {
        Ok(captured) => sender.send(AppEvent::StatusLoaded(git::parse_status_porcelain(
            &captured.stdout,
        ))),
        Err(e) => sender.send(AppEvent::CommandFailed(format!("{e}"))),
    });
}

fn spawn_history_scan(runner: &Arc<dyn GitRunner>, sender: &EventSender, dir: PathBuf) {
    let runner = Arc::clone(runner);
    let sender = sender.clone();
    thread::spawn(
        move || match runner.run_captured(&history::history_scan_spec(&dir)) {
            Ok(captured) => sender.send(AppEvent::HistoryScanned(history::find_noisy_commits(
                &captured.stdout,
            ))),
            Err(e) => sender.send(AppEvent::CommandFailed(format!("{e}"))),
        },
    );
}
