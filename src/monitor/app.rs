//! Main application loop for the terminal dashboard.

use crate::clock::{Clock, RuntimeClock};
use crate::config::Config;
use crate::controller::{ControllerState, IntervalController};
use crate::error::Result;
use crate::interval::IntervalSeconds;
use crate::monitor::chart::{bucket_color, FillChart};
use crate::monitor::input::{Action, InputHandler};
use crate::random::SeededRandom;
use crate::sample::FillBucket;
use crate::series::{label_format_or_default, TimeSeriesBuffer};
use crate::source::SimulatedSource;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Terminal;
use std::io::{self, stdout};
use std::time::Duration;

const COMPONENT: &str = "app";

/// Source type the dashboard samples from.
pub type DashboardSource = SimulatedSource<SeededRandom>;

const HELP_TEXT: &[(&str, &str)] = &[
    ("q / Esc", "quit"),
    ("+ / k / Up", "slower (interval +1s)"),
    ("- / j / Down", "faster (interval -1s)"),
    ("0", "reset interval"),
    ("r / F5", "sample now"),
    ("space / p", "pause / resume"),
    ("? / F1", "toggle help"),
];

/// The terminal dashboard.
pub struct App {
    /// Configuration.
    config: Config,
    /// Tick schedule and window.
    controller: IntervalController<DashboardSource, RuntimeClock>,
    /// Input handler.
    input: InputHandler,
    /// Help overlay visible.
    show_help: bool,
    /// Set by [`Action::Quit`].
    should_quit: bool,
}

impl App {
    /// Builds the window from `config` and starts ticking.
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be seeded or no runtime is
    /// active.
    pub fn new(config: Config) -> Result<Self> {
        let sampler = &config.sampler;
        let clock = RuntimeClock::new();
        let source = SimulatedSource::new(sampler.total_bins, sampler.random());
        let buffer = TimeSeriesBuffer::initialize(
            sampler.seed_sample(),
            sampler.interval_secs,
            sampler.window_size,
            source,
            clock.now(),
        )?;

        let controller = IntervalController::new(buffer, clock, sampler.interval_secs)?;
        controller.set_label_format(config.chart.label_format.clone());

        let mut app = Self {
            config,
            controller,
            input: InputHandler::default(),
            show_help: false,
            should_quit: false,
        };
        app.controller.start();
        Ok(app)
    }

    /// Runs the application main loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup or rendering fails.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        stdout().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        self.controller.stop();
        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let poll_timeout = Duration::from_millis(100);

        loop {
            terminal.draw(|frame| {
                self.render(frame);
            })?;

            if event::poll(poll_timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let action = self.input.handle_key(key);
                        self.handle_action(action);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Handles an input action.
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.show_help = !self.show_help,
            Action::SlowDown => {
                self.controller.set_interval(self.controller.interval().increment());
            }
            Action::SpeedUp => {
                self.controller.set_interval(self.controller.interval().decrement());
            }
            Action::ResetInterval => self.controller.set_interval(IntervalSeconds::DEFAULT),
            Action::SampleNow => self.controller.tick_now(),
            Action::TogglePause => match self.controller.state() {
                ControllerState::Running(_) => self.controller.stop(),
                ControllerState::Stopped => self.controller.start(),
            },
            Action::None => {}
        }
        crate::trace!(COMPONENT, "{:?} -> {:?}", action, self.controller.state());
    }

    /// Renders the application.
    fn render(&self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(8), Constraint::Length(1)])
            .split(area);

        frame.render_widget(self.status_panel(), chunks[0]);

        let projection = self.controller.project();
        let title = format!(" {} bins ", self.config.sampler.total_bins);
        frame.render_widget(FillChart::new(&projection).title(&title), chunks[1]);

        let footer = Paragraph::new(" q quit  +/- interval  r sample  space pause  ? help")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(footer, chunks[2]);

        if self.show_help {
            let popup = centered(area, 44, HELP_TEXT.len() as u16 + 2);
            frame.render_widget(Clear, popup);
            frame.render_widget(help_panel(), popup);
        }
    }

    fn status_panel(&self) -> Paragraph<'static> {
        let state = match self.controller.state() {
            ControllerState::Running(interval) => format!("every {interval}"),
            ControllerState::Stopped => format!("paused ({})", self.controller.interval()),
        };
        let header = Line::from(vec![
            Span::styled("Sampling ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(state),
            Span::raw(format!("  ticks {}", self.controller.tick_count())),
        ]);

        let counts = match self.controller.latest() {
            Some(latest) => {
                let format = label_format_or_default(&self.config.chart.label_format);
                let mut spans = vec![Span::raw(format!("{}  ", latest.timestamp.format(format)))];
                for bucket in FillBucket::ALL {
                    spans.push(Span::styled(
                        format!("{} {}  ", bucket.label(), latest.sample.count(bucket)),
                        Style::default().fg(bucket_color(bucket)),
                    ));
                }
                Line::from(spans)
            }
            None => Line::from("collecting..."),
        };

        Paragraph::new(vec![header, counts]).block(
            Block::default()
                .title(" binwatch ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
    }

    /// Returns whether the app should quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The controller behind the dashboard.
    #[must_use]
    pub fn controller(&self) -> &IntervalController<DashboardSource, RuntimeClock> {
        &self.controller
    }
}

fn help_panel() -> Paragraph<'static> {
    let lines: Vec<Line<'static>> = HELP_TEXT
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{keys:>14}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();
    Paragraph::new(lines).block(Block::default().title(" Help ").borders(Borders::ALL))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn config() -> Config {
        let mut config = Config::preset(crate::config::Preset::Overview);
        config.sampler.seed = Some(5);
        config
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal.backend().buffer().content().iter().map(ratatui::buffer::Cell::symbol).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_app_new_starts_running() {
        let app = App::new(config()).unwrap();
        assert!(!app.should_quit());
        assert_eq!(app.controller().state(), ControllerState::Running(IntervalSeconds::DEFAULT));
        assert_eq!(app.controller().snapshot().len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_app_handle_quit() {
        let mut app = App::new(config()).unwrap();
        app.handle_action(Action::Quit);
        assert!(app.should_quit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_app_handle_help() {
        let mut app = App::new(config()).unwrap();
        assert!(!app.show_help);

        app.handle_action(Action::Help);
        assert!(app.show_help);
        assert!(screen(&app).contains("toggle help"));

        app.handle_action(Action::Help);
        assert!(!app.show_help);
    }

    #[tokio::test(start_paused = true)]
    async fn test_app_interval_keys() {
        let mut app = App::new(config()).unwrap();

        app.handle_action(Action::SlowDown);
        assert_eq!(app.controller().interval().secs(), 11);

        app.handle_action(Action::SpeedUp);
        app.handle_action(Action::SpeedUp);
        assert_eq!(app.controller().interval().secs(), 9);

        app.handle_action(Action::ResetInterval);
        assert_eq!(app.controller().interval(), IntervalSeconds::DEFAULT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_app_pause_and_sample() {
        let mut app = App::new(config()).unwrap();

        app.handle_action(Action::TogglePause);
        assert_eq!(app.controller().state(), ControllerState::Stopped);

        app.handle_action(Action::SampleNow);
        assert_eq!(app.controller().tick_count(), 1);

        app.handle_action(Action::TogglePause);
        assert!(matches!(app.controller().state(), ControllerState::Running(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_app_render_status() {
        let mut app = App::new(config()).unwrap();
        let text = screen(&app);
        assert!(text.contains("binwatch"));
        assert!(text.contains("every 10s"));
        assert!(text.contains("100 bins"));

        app.handle_action(Action::TogglePause);
        assert!(screen(&app).contains("paused"));
    }

    #[test]
    fn test_centered_fits_area() {
        let area = Rect::new(0, 0, 20, 5);
        let popup = centered(area, 44, 9);
        assert_eq!(popup, area);

        let popup = centered(Rect::new(0, 0, 100, 30), 40, 10);
        assert_eq!((popup.x, popup.y), (30, 10));
    }
}
