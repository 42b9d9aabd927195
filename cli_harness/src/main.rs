//! CLI harness for playing pingpong_core with two local players.

mod canvas;
mod keyboard;

use std::fmt;
use std::io::{stdout, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        poll, read, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, Clear, ClearType,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use fern::FormatCallback;
use pingpong_core::{Config, Game, HorizontalModel, ManualScheduler, Runner};
use time::format_description::well_known::Iso8601;

use crate::canvas::TerminalCanvas;
use crate::keyboard::{KeyForwarder, KeyboardMode};

/// Field size in terminal cells
const FIELD_COLS: usize = 60;
const FIELD_ROWS: usize = 35;

/// Pause between two host frames
const FRAME_PERIOD: Duration = Duration::from_millis(2);

#[derive(Parser)]
#[command(about, long_about = None)]
struct Cli {
    /// Simulation ticks per second.
    #[arg(long, default_value_t = 100)]
    tick_hz: u16,

    /// Velocity formula for paddle pushes.
    #[arg(value_enum, long, default_value_t = Model::Subtracted)]
    paddle_model: Model,

    /// Velocity formula for the lateral nudge a paddle gives the ball.
    #[arg(value_enum, long, default_value_t = Model::Gated)]
    ball_model: Model,

    /// Play with player one's paddle only.
    #[arg(long)]
    single_player: bool,

    /// File receiving the log; the terminal itself is busy drawing the game.
    #[arg(long, default_value = "pingpong.log", value_name = "PATH")]
    log_file: PathBuf,

    /// Most verbose level written to the log file.
    #[arg(long, default_value_t = log::LevelFilter::Info)]
    log_level: log::LevelFilter,
}

/// Horizontal velocity formula, as named on the command line
#[derive(Copy, Clone, ValueEnum)]
enum Model {
    /// Friction is subtracted from the push
    Subtracted,
    /// Friction only decides whether the push moves anything
    Gated,
}

impl From<Model> for HorizontalModel {
    fn from(model: Model) -> Self {
        match model {
            Model::Subtracted => HorizontalModel::FrictionSubtracted,
            Model::Gated => HorizontalModel::FrictionGated,
        }
    }
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            tick_hz: self.tick_hz,
            paddle_model: self.paddle_model.into(),
            ball_model: self.ball_model.into(),
            two_players: !self.single_player,
            ..Config::default()
        }
    }
}

/// CLI application state
struct CliApp {
    config: Config,
    runner: Runner<ManualScheduler>,
    canvas: TerminalCanvas,
    keys: KeyForwarder,
    clock: Instant,
    running: bool,
    show_help: bool,
    last_drawn: Option<u32>,
    last_event: Option<pingpong_core::Event>,
}

impl CliApp {
    fn new(config: Config, mode: KeyboardMode) -> Result<Self> {
        let game = Game::new(config.clone()).wrap_err("Invalid match configuration")?;
        let runner = Runner::new(game, ManualScheduler::new());
        let keys = KeyForwarder::new(mode, runner.input_sender());
        let canvas = TerminalCanvas::new(&config.arena, FIELD_COLS, FIELD_ROWS);

        log::info!("Input mode: {}", mode.description());

        Ok(Self {
            config,
            runner,
            canvas,
            keys,
            clock: Instant::now(),
            running: true,
            show_help: true,
            last_drawn: None,
            last_event: None,
        })
    }

    fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;

        let mut stdout = stdout();
        let enhanced = self.keys.mode() == KeyboardMode::Enhanced;

        if enhanced {
            queue!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                        | KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                )
            )?;
        }

        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

        self.runner.start();
        let result = self.main_loop();
        self.runner.clear_animation();

        if enhanced {
            queue!(stdout, PopKeyboardEnhancementFlags)?;
        }

        execute!(stdout, LeaveAlternateScreen, Show)?;
        disable_raw_mode()?;
        result
    }

    fn main_loop(&mut self) -> Result<()> {
        while self.running {
            self.handle_input()?;
            self.frame();

            if self.last_drawn != Some(self.runner.game().tick) {
                self.render()?;
                self.last_drawn = Some(self.runner.game().tick);
            }

            std::thread::sleep(FRAME_PERIOD);
        }
        Ok(())
    }

    fn handle_input(&mut self) -> Result<()> {
        while poll(Duration::from_millis(0))? {
            let Event::Key(event) = read()? else {
                continue;
            };

            if event.kind == KeyEventKind::Press {
                match event.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => self.running = false,
                    KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.running = false
                    }
                    KeyCode::Char('h') | KeyCode::Char('H') => {
                        self.show_help = !self.show_help;
                        self.last_drawn = None;
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => self.new_match()?,
                    _ => {}
                }
            }

            self.keys.handle(event, Instant::now());
        }

        self.keys.release_stale(Instant::now());
        Ok(())
    }

    /// Deliver the frame the runner asked for
    fn frame(&mut self) {
        if let Some(handle) = self.runner.scheduler_mut().take_due() {
            let events = self
                .runner
                .on_frame(handle, self.clock.elapsed(), &mut self.canvas);
            if let Some(event) = events.last() {
                self.last_event = Some(*event);
            }
        }
    }

    /// Start over with a fresh match; the score goes with the old one
    fn new_match(&mut self) -> Result<()> {
        let game = Game::new(self.config.clone()).wrap_err("Invalid match configuration")?;
        self.runner.replace_game(game);
        self.keys.reset();
        self.last_event = None;
        log::info!("New match started");
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let mut out = stdout();
        let game = self.runner.game();
        let mut row = 0;

        queue!(out, Clear(ClearType::All))?;

        queue!(
            out,
            MoveTo(0, row),
            SetForegroundColor(Color::Cyan),
            Print("PINGPONG CLI HARNESS"),
            ResetColor
        )?;
        row += 1;

        queue!(
            out,
            MoveTo(0, row),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Player one: {}  |  Player two: {}  |  {}",
                game.score.player_one,
                game.score.player_two,
                game.status_string()
            )),
            ResetColor
        )?;
        row += 1;

        row = self.canvas.present(&mut out, row)?;

        if self.show_help {
            self.render_help(&mut out, row)?;
        }

        out.flush()?;
        Ok(())
    }

    fn render_help<W: Write>(&self, out: &mut W, mut row: u16) -> Result<()> {
        let game = self.runner.game();
        let view = game.view();
        let lines = [
            "--- CONTROLS ---".to_string(),
            "Player one (bottom): ←/→ move, ↑ serve".to_string(),
            "Player two (top):    A/D move, S serve".to_string(),
            "R: New match  |  H: Toggle help  |  Q: Quit".to_string(),
            format!("Input mode: {}", self.keys.mode().description()),
            format!(
                "Tick: {} | Ball: ({:.1}, {:.1}) vel ({:.2}, {:.2}) | Last event: {}",
                view.tick,
                view.ball.x,
                view.ball.y,
                view.ball_velocity.0,
                view.ball_velocity.1,
                self.last_event
                    .map(|event| format!("{event:?}"))
                    .unwrap_or_else(|| "-".to_string())
            ),
            format!(
                "Field: {}x{} cells for {}x{} px",
                self.canvas.cols(),
                self.canvas.rows(),
                game.config.arena.width,
                game.config.arena.height
            ),
        ];

        row += 1;
        for line in lines {
            queue!(
                out,
                MoveTo(0, row),
                SetForegroundColor(Color::DarkGrey),
                Print(line),
                ResetColor
            )?;
            row += 1;
        }
        Ok(())
    }
}

fn detect_keyboard_mode() -> KeyboardMode {
    match supports_keyboard_enhancement() {
        Ok(true) => KeyboardMode::Enhanced,
        Ok(false) | Err(_) => KeyboardMode::HoldTimeout,
    }
}

/// Set up the global logger writing to the given file.
fn setup_logger(path: &Path, level: log::LevelFilter) -> Result<()> {
    let file = fern::log_file(path)
        .wrap_err_with(|| format!("Cannot open log file {}", path.display()))?;

    fern::Dispatch::new()
        .level(level)
        .format(format_log)
        .chain(file)
        .apply()
        .wrap_err("Logger already installed")?;
    Ok(())
}

/// The function given to the logging crate [`fern`] to format messages.
fn format_log(out: FormatCallback, message: &fmt::Arguments, record: &log::Record) {
    out.finish(format_args!(
        "[{} {} {}] {}",
        utc_now_wrapper(),
        record.level(),
        record.target(),
        message
    ))
}

/// Current UTC time, with a default in case of error.
fn utc_now_wrapper() -> String {
    time::OffsetDateTime::now_utc()
        .format(&Iso8601::DATE_TIME)
        .unwrap_or(String::from("invalid date"))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    setup_logger(&cli.log_file, cli.log_level)?;

    let mut app = CliApp::new(cli.config(), detect_keyboard_mode())?;

    // Restore the terminal if the process is interrupted from outside
    ctrlc::set_handler(move || {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, Show);
        std::process::exit(0);
    })
    .wrap_err("Error setting Ctrl-C handler")?;

    let result = app.run();
    log::info!("Harness stopped");
    result
}
