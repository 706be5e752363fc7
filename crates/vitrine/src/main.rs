use std::cell::RefCell;
use std::io::stdout;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEvent, MouseEventKind,
};
use log::debug;
use ratatui::{
    DefaultTerminal, Frame,
    layout::Rect,
    style::Stylize,
    text::Line,
    widgets::Paragraph,
};
use vitrine_backgrounds::catalog;
use vitrine_core::BackgroundKind;
use vitrine_engine::{
    Engine, EngineError, HostEvents, LoopState, PIXELS_PER_COL, PIXELS_PER_ROW, TickScheduler,
};
use vitrine_config::Config;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();
    let config = Config::load();
    let terminal = ratatui::init();
    crossterm::execute!(stdout(), EnableMouseCapture)?;
    let result = App::new(config).run(terminal);
    let _ = crossterm::execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}

/// The showcase application: one mounted engine at a time, cycled through
/// the catalog with the arrow keys.
struct App {
    running: bool,
    config: Config,
    kind: BackgroundKind,
    engine: Option<Engine<TickScheduler>>,
    // One source per event stream, shared with every engine mounted over
    // the app's lifetime, so subscriber counts track the mounted engine.
    resize_events: Rc<RefCell<HostEvents>>,
    pointer_events: Rc<RefCell<HostEvents>>,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            running: false,
            kind: config.background,
            config,
            engine: None,
            resize_events: Rc::new(RefCell::new(HostEvents::new())),
            pointer_events: Rc::new(RefCell::new(HostEvents::new())),
        }
    }

    /// Run the application's main loop.
    fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let size = terminal.size()?;
        self.engine = Some(self.mount(size.width, size.height)?);
        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            let painted = self.engine.as_mut().is_some_and(|e| e.run_due_frame());
            let handled = self.handle_crossterm_events()?;
            if painted || handled {
                terminal.draw(|frame| self.render(frame))?;
            }
        }
        Ok(())
    }

    /// Bind a fresh engine for the current variant to the terminal area.
    fn mount(&self, cols: u16, rows: u16) -> Result<Engine<TickScheduler>, EngineError> {
        debug!("mounting {:?} at {cols}x{rows}", self.kind);
        Engine::mount(
            catalog(self.kind),
            cols,
            rows,
            self.config.speed,
            self.config.seed,
            TickScheduler::new(self.config.fps),
            Box::new(Rc::clone(&self.resize_events)),
            Box::new(Rc::clone(&self.pointer_events)),
        )
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        frame.render_widget(engine.surface().widget(), area);

        if area.height == 0 {
            return;
        }
        let paused = if engine.state() == LoopState::Stopped {
            "  [paused]"
        } else {
            ""
        };
        let status = Line::from(vec![
            format!(" {} ", self.kind.name()).bold().white(),
            format!("{paused}  ").red(),
            "←/→".bold().white(),
            " cycle  ".dark_gray(),
            "space".bold().white(),
            " pause  ".dark_gray(),
            "s".bold().white(),
            " speed  ".dark_gray(),
            "q".bold().white(),
            " quit ".dark_gray(),
        ]);
        let bottom = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
        frame.render_widget(Paragraph::new(status), bottom);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Returns whether an event was handled and the UI needs a repaint.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<bool> {
        let timeout = self
            .engine
            .as_ref()
            .and_then(|e| e.scheduler().until_due())
            .unwrap_or(Duration::from_millis(50));
        if !event::poll(timeout)? {
            return Ok(false);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key)?,
            Event::Mouse(mouse) => self.on_mouse_event(mouse),
            Event::Resize(cols, rows) => {
                if let Some(engine) = self.engine.as_mut() {
                    engine.notify_resize(cols, rows);
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) -> color_eyre::Result<()> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Right | KeyCode::Char('l')) => self.cycle(self.kind.next())?,
            (_, KeyCode::Left | KeyCode::Char('h')) => self.cycle(self.kind.prev())?,
            (_, KeyCode::Char(' ')) => self.toggle_pause(),
            (_, KeyCode::Char('s')) => self.cycle_speed(),
            _ => {}
        }
        Ok(())
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Moved {
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            // Cell coordinates to device pixels, centered in the cell.
            let x = mouse.column as f32 * PIXELS_PER_COL as f32 + 1.0;
            let y = mouse.row as f32 * PIXELS_PER_ROW as f32 + 2.0;
            engine.notify_pointer(x, y);
        }
    }

    /// Unmount the current engine and mount the next variant.
    fn cycle(&mut self, kind: BackgroundKind) -> color_eyre::Result<()> {
        let (cols, rows) = match self.engine.take() {
            Some(mut engine) => {
                engine.unmount();
                (engine.surface().cols(), engine.surface().rows())
            }
            None => (80, 24),
        };
        debug!(
            "unmounted {:?}; {} resize / {} pointer subscriptions remain",
            self.kind,
            self.resize_events.borrow().subscriber_count(),
            self.pointer_events.borrow().subscriber_count(),
        );
        self.kind = kind;
        self.engine = Some(self.mount(cols, rows)?);
        Ok(())
    }

    fn toggle_pause(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            match engine.state() {
                LoopState::Running => engine.stop(),
                LoopState::Stopped => engine.start(),
            }
        }
    }

    fn cycle_speed(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            let next = engine.speed().next();
            engine.set_speed(next);
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
