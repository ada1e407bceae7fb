//! Control panel state, key handling, and frame layout.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use hedgerow_report::{FanoutReporter, MemoryReporter, SharedReporter, TracingDiagnostics};
use hedgerow_tui::{Boundary, Component, Panel, RenderContext, render_root, styles};
use hedgerow_types::ui::UiOptions;

use crate::panels::{
    FaultMode, RegimenBook, RegimenList, SensorReadings, default_readings, hardware_settings,
    sample_regimens,
};

const PANEL_COUNT: usize = 3;

pub struct ControlPanel {
    book: Rc<RefCell<RegimenBook>>,
    fault_mode: Rc<Cell<FaultMode>>,
    boundaries: [Boundary; PANEL_COUNT],
    reports: Arc<MemoryReporter>,
    cx: RenderContext,
    quit: bool,
}

impl ControlPanel {
    /// Builds the panel. Every contained fault goes to `reporter` and to an
    /// in-memory counter shown in the status bar.
    pub fn new(reporter: SharedReporter, options: UiOptions) -> Self {
        let reports = Arc::new(MemoryReporter::new());
        let fanout = FanoutReporter::default()
            .with(reports.clone())
            .with(reporter);
        let cx = RenderContext::new(Arc::new(fanout), Arc::new(TracingDiagnostics))
            .with_options(options);

        let book = Rc::new(RefCell::new(RegimenBook::new(sample_regimens())));
        let fault_mode = Rc::new(Cell::new(FaultMode::Healthy));
        let boundaries = build_boundaries(&book, &fault_mode);

        Self {
            book,
            fault_mode,
            boundaries,
            reports,
            cx,
            quit: false,
        }
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    #[must_use]
    pub fn fault_mode(&self) -> FaultMode {
        self.fault_mode.get()
    }

    #[must_use]
    pub fn faulted_panels(&self) -> usize {
        self.boundaries.iter().filter(|b| b.has_fault()).count()
    }

    #[must_use]
    pub fn reported_faults(&self) -> usize {
        self.reports.len()
    }

    #[must_use]
    pub fn book(&self) -> &Rc<RefCell<RegimenBook>> {
        &self.book
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('f') => self.arm(FaultMode::Error),
            KeyCode::Char('p') => self.arm(FaultMode::Panic),
            KeyCode::Char('c') => {
                if self.book.borrow_mut().copy_selected().is_none() {
                    tracing::debug!("No regimen selected; nothing to copy");
                }
            }
            KeyCode::Char('r') => self.rebuild(),
            KeyCode::Up | KeyCode::Char('k') => self.book.borrow_mut().select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.book.borrow_mut().select_next(),
            _ => {}
        }
    }

    fn arm(&mut self, mode: FaultMode) {
        tracing::info!(?mode, "Sensor fault armed");
        self.fault_mode.set(mode);
    }

    /// Disarms the sensor fault and replaces every boundary with a fresh one.
    fn rebuild(&mut self) {
        self.fault_mode.set(FaultMode::Healthy);
        self.boundaries = build_boundaries(&self.book, &self.fault_mode);
        tracing::info!("Panels rebuilt");
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let [body, status] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        let columns: [Rect; PANEL_COUNT] = Layout::horizontal([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .areas(body);

        for (boundary, column) in self.boundaries.iter_mut().zip(columns) {
            render_root(boundary, column, buf, &mut self.cx);
        }

        self.render_status(status, buf);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let palette = self.cx.palette();
        let glyphs = self.cx.glyphs();
        let faulted = self.faulted_panels();
        let (icon, icon_style) = if faulted == 0 {
            (glyphs.status_ok, Style::default().fg(palette.success))
        } else {
            (glyphs.status_fault, Style::default().fg(palette.error))
        };

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), icon_style),
            Span::styled(
                format!("faults reported: {} ", self.reported_faults()),
                styles::header(&palette),
            ),
            Span::styled(
                "f fault  p panic  c copy  r rebuild  q quit",
                styles::muted(&palette),
            ),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

fn build_boundaries(
    book: &Rc<RefCell<RegimenBook>>,
    fault_mode: &Rc<Cell<FaultMode>>,
) -> [Boundary; PANEL_COUNT] {
    let hardware: Box<dyn Component> = Box::new(Panel::new("Hardware", hardware_settings()));
    let sensors: Box<dyn Component> = Box::new(Panel::new(
        "Sensors",
        SensorReadings::new(default_readings(), fault_mode.clone()),
    ));
    let regimens: Box<dyn Component> =
        Box::new(Panel::new("Regimens", RegimenList::new(book.clone())));
    [
        Boundary::new(hardware),
        Boundary::new(sensors),
        Boundary::new(regimens),
    ]
}
