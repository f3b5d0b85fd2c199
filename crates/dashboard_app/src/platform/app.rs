use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::Local;
use dashboard_core::{update, AppState, AppViewModel, Msg, QueryParams, SelectedFile};
use dashboard_engine::{ApiSettings, EngineError};
use dashboard_logging::{rag_debug, rag_info};

use super::effects::EffectRunner;
use super::ui;
use super::ui::commands::{parse_command, UserCommand, HELP_TEXT};
use super::ui::constants::{QUERY_BUSY_NOTICE, UPLOAD_BUSY_NOTICE};
use super::ui::render::RenderContext;

/// Everything the event loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Msg(Msg),
    Command(UserCommand),
    InputError(String),
    /// Input closed.
    Quit,
}

pub struct AppOptions {
    pub api: ApiSettings,
    pub api_url_degraded: bool,
    pub poll_interval: Duration,
    pub params: QueryParams,
}

pub fn run_app(options: AppOptions) -> Result<(), EngineError> {
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(&options.api, event_tx.clone())?;

    let mut session = Session {
        state: AppState::with_params(options.params),
        runner,
        ctx: RenderContext {
            api_url: options.api.base_url.to_string(),
            api_url_degraded: options.api_url_degraded,
            stats_updated: None,
        },
        poll_interval: options.poll_interval,
    };

    spawn_input_reader(event_tx);

    session.runner.check_health();
    session.runner.start_stats_polling(session.poll_interval);
    session.print_dashboard();
    println!("Type `help` for commands.");

    'outer: while let Ok(event) = event_rx.recv() {
        let mut inbox = vec![event];
        inbox.extend(event_rx.try_iter());
        for event in inbox {
            if !session.handle_event(event) {
                break 'outer;
            }
        }
        if session.state.consume_dirty() {
            session.print_dashboard();
        }
    }

    rag_info!("Shutting down");
    session.runner.shutdown();
    Ok(())
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    ctx: RenderContext,
    poll_interval: Duration,
}

impl Session {
    /// Returns `false` once the app should exit.
    fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Msg(msg) => self.dispatch_msg(msg),
            AppEvent::Command(command) => return self.handle_command(command),
            AppEvent::InputError(message) => println!("{message}"),
            AppEvent::Quit => return false,
        }
        true
    }

    fn handle_command(&mut self, command: UserCommand) -> bool {
        rag_debug!("Command {:?}", command);
        match plan_command(command, &self.state.view()) {
            CommandPlan::Dispatch { msgs, notice } => {
                if let Some(notice) = notice {
                    println!("{notice}");
                }
                for msg in msgs {
                    self.dispatch_msg(msg);
                }
            }
            // A fresh poller fetches on its first tick.
            CommandPlan::RestartStats => self.runner.start_stats_polling(self.poll_interval),
            CommandPlan::Show => self.print_dashboard(),
            CommandPlan::Help => println!("{HELP_TEXT}"),
            CommandPlan::Quit => return false,
        }
        true
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        if matches!(msg, Msg::StatsRefreshed(Ok(_))) {
            self.ctx.stats_updated = Some(Local::now());
        }
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn print_dashboard(&self) {
        let view = self.state.view();
        println!();
        for line in ui::render::render(&view, &self.ctx) {
            println!("{line}");
        }
    }
}

/// What one user command turns into, decided against the current view.
#[derive(Debug, PartialEq)]
enum CommandPlan {
    Dispatch {
        msgs: Vec<Msg>,
        notice: Option<&'static str>,
    },
    RestartStats,
    Show,
    Help,
    Quit,
}

fn plan_command(command: UserCommand, view: &AppViewModel) -> CommandPlan {
    let dispatch =
        |msgs: Vec<Msg>, notice: Option<&'static str>| CommandPlan::Dispatch { msgs, notice };
    let query_busy = view.query_in_flight.then_some(QUERY_BUSY_NOTICE);
    let upload_busy = view.upload_in_flight.then_some(UPLOAD_BUSY_NOTICE);
    match command {
        UserCommand::Select(path) => dispatch(
            vec![Msg::FileSelected(SelectedFile::from_path(path))],
            upload_busy,
        ),
        UserCommand::Upload(Some(path)) => {
            let file = SelectedFile::from_path(path);
            // A rejected path must not fall through to a previously chosen file.
            if file.is_supported() && !view.upload_in_flight {
                dispatch(vec![Msg::FileSelected(file), Msg::UploadClicked], None)
            } else {
                dispatch(vec![Msg::FileSelected(file)], upload_busy)
            }
        }
        UserCommand::Upload(None) => dispatch(vec![Msg::UploadClicked], upload_busy),
        UserCommand::Query(text) => dispatch(vec![Msg::QueryChanged(text)], None),
        UserCommand::Ask(text) => dispatch(
            vec![Msg::QueryChanged(text), Msg::QuerySubmitted],
            query_busy,
        ),
        UserCommand::Submit => dispatch(vec![Msg::QuerySubmitted], query_busy),
        UserCommand::Models => dispatch(vec![Msg::ModelsRequested], None),
        UserCommand::Stats => CommandPlan::RestartStats,
        UserCommand::Show => CommandPlan::Show,
        UserCommand::Help => CommandPlan::Help,
        UserCommand::Quit => CommandPlan::Quit,
    }
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let event = match parse_command(&line) {
                Ok(Some(command)) => AppEvent::Command(command),
                Ok(None) => continue,
                Err(err) => AppEvent::InputError(err.to_string()),
            };
            if event_tx.send(event).is_err() {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::Quit);
    });
}
