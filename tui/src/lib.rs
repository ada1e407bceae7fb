//! Fault-containing component rendering for Hedgerow using ratatui.

mod boundary;
mod component;
mod fallback;
mod theme;
mod widgets;

pub use boundary::{Boundary, render_root};
pub use component::{Component, FnComponent, RenderContext};
pub use fallback::{FALLBACK_NOTICE, Fallback};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};
pub use widgets::{Panel, RowValue, SettingRow, SettingsList, fit_width};
