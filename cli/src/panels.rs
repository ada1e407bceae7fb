//! Demo panels for the control panel screen.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use thiserror::Error;

use hedgerow_tui::{Component, RenderContext, SettingRow, SettingsList, fit_width, styles};
use hedgerow_types::{CopyCounter, NonEmptyString, Regimen, RegimenItem, RenderFault};

/// How the sensor panel misbehaves on its next render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FaultMode {
    #[default]
    Healthy,
    /// Return a `RenderFault`.
    Error,
    /// Panic mid-render.
    Panic,
}

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("no response from sensor on pin {pin}")]
    Disconnected { pin: u8 },
}

#[derive(Debug, Clone, Copy)]
pub struct Reading {
    pub label: &'static str,
    pub pin: u8,
    pub value: u16,
}

pub fn default_readings() -> Vec<Reading> {
    vec![
        Reading {
            label: "Soil moisture",
            pin: 59,
            value: 512,
        },
        Reading {
            label: "Tool verification",
            pin: 63,
            value: 1,
        },
    ]
}

/// Live sensor readings. Fails according to a shared [`FaultMode`].
pub struct SensorReadings {
    readings: Vec<Reading>,
    mode: Rc<Cell<FaultMode>>,
}

impl SensorReadings {
    pub fn new(readings: Vec<Reading>, mode: Rc<Cell<FaultMode>>) -> Self {
        Self { readings, mode }
    }
}

impl Component for SensorReadings {
    fn name(&self) -> &str {
        "SensorReadings"
    }

    fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        cx: &mut RenderContext,
    ) -> Result<(), RenderFault> {
        let pin = self.readings.first().map_or(0, |r| r.pin);
        match self.mode.get() {
            FaultMode::Healthy => {}
            FaultMode::Error => {
                return Err(RenderFault::with_cause(
                    "Sensor readings unavailable",
                    SensorError::Disconnected { pin },
                ));
            }
            FaultMode::Panic => {
                let missing = self.readings.len() + 1;
                panic!("reading index {missing} out of range for pin {pin}");
            }
        }

        let rows = self
            .readings
            .iter()
            .map(|r| SettingRow::text(format!("{} (pin {})", r.label, r.pin), r.value.to_string()))
            .collect();
        let mut list = SettingsList::new("Readings", rows);
        cx.render_child(&mut list, area, buf)
    }
}

pub fn hardware_settings() -> SettingsList {
    SettingsList::new(
        "Motors",
        vec![
            SettingRow::text("Max speed (x)", "800 mm/s"),
            SettingRow::text("Max speed (y)", "800 mm/s"),
            SettingRow::text("Max speed (z)", "400 mm/s"),
            SettingRow::toggle("Encoders", true),
            SettingRow::toggle("Invert motors (z)", false),
            SettingRow::text("Firmware", "arduino 6.4.2"),
        ],
    )
}

/// Regimens plus the counter that names their copies.
#[derive(Debug, Default)]
pub struct RegimenBook {
    regimens: Vec<Regimen>,
    selected: usize,
    copies: CopyCounter,
}

impl RegimenBook {
    pub fn new(regimens: Vec<Regimen>) -> Self {
        Self {
            regimens,
            selected: 0,
            copies: CopyCounter::new(),
        }
    }

    pub fn regimens(&self) -> &[Regimen] {
        &self.regimens
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.regimens.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Appends a copy of the selected regimen and selects it.
    pub fn copy_selected(&mut self) -> Option<&Regimen> {
        let copy = self
            .regimens
            .get(self.selected)?
            .copy_with(&mut self.copies);
        tracing::info!(name = %copy.name, "Regimen copied");
        self.regimens.push(copy);
        self.selected = self.regimens.len() - 1;
        self.regimens.last()
    }
}

pub fn sample_regimens() -> Vec<Regimen> {
    let mut regimens = Vec::new();
    for (name, color, sequences) in [
        ("Tomato season", "red", &["Water", "Photograph"][..]),
        ("Seedling care", "green", &["Mist", "Weed check", "Water"][..]),
    ] {
        let Ok(name) = NonEmptyString::new(name) else {
            continue;
        };
        let mut regimen = Regimen::new(name);
        regimen.color = color.to_string();
        for (day, sequence) in (0_u64..).zip(sequences) {
            if let Ok(sequence) = NonEmptyString::new(*sequence) {
                regimen.items.push(RegimenItem {
                    sequence,
                    time_offset_ms: day * 86_400_000,
                });
            }
        }
        regimens.push(regimen);
    }
    regimens
}

/// Selectable regimen list backed by a shared [`RegimenBook`].
pub struct RegimenList {
    book: Rc<RefCell<RegimenBook>>,
}

impl RegimenList {
    pub fn new(book: Rc<RefCell<RegimenBook>>) -> Self {
        Self { book }
    }
}

impl Component for RegimenList {
    fn name(&self) -> &str {
        "RegimenList"
    }

    fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        cx: &mut RenderContext,
    ) -> Result<(), RenderFault> {
        let book = self
            .book
            .try_borrow()
            .map_err(|_| RenderFault::new("Regimen list is being edited"))?;
        let palette = cx.palette();
        let glyphs = cx.glyphs();
        let width = usize::from(area.width);

        for (idx, regimen) in book.regimens().iter().enumerate() {
            let Ok(offset) = u16::try_from(idx) else {
                break;
            };
            if offset >= area.height {
                break;
            }
            let is_selected = idx == book.selected();
            let marker = if is_selected { glyphs.selected } else { " " };
            let summary = format!(
                "{} {} ({} items)",
                glyphs.bullet,
                regimen.name,
                regimen.items.len()
            );
            let name_style = if is_selected {
                styles::row_value(&palette).add_modifier(Modifier::BOLD)
            } else {
                styles::row_label(&palette)
            };
            let line = Line::from(vec![
                Span::styled(format!("{marker} "), Style::default().fg(palette.accent)),
                Span::styled(fit_width(&summary, width.saturating_sub(2)), name_style),
            ]);
            buf.set_line(area.x, area.y + offset, &line, area.width);
        }
        Ok(())
    }
}
