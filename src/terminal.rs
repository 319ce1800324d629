// SPDX-License-Identifier: GPL-3.0-only

//! Terminal front-end
//!
//! Drives [`AppModel`] from the keyboard and renders both screens with
//! Unicode half-block characters, two vertical pixels per cell:
//!
//! ```text
//!  ┌──────────────────────────────┐   ┌───────────────┬──────────────┐
//!  │                              │   │ [x] Photo_1   │  ┌────────┐  │
//!  │        preview (▀▀▀)         │   │ [ ] Photo_2 ◀ │  │ ┌──┐   │  │
//!  │                              │   │               │  │ └──┘   │  │
//!  ├──────────────────────────────┤   ├───────────────┴──────────────┤
//!  │ settings                     │   │ notification                 │
//!  │ notification                 │   │ keys                         │
//!  │ keys                         │   └──────────────────────────────┘
//!  └──────────────────────────────┘
//!        capture screen                       gallery screen
//! ```
//!
//! Tasks run on a multi-threaded tokio runtime; their messages are drained
//! into `update` between frames.

use crate::app::gallery::{FaceOverlay, ImageDimensions, ThumbnailGeometry};
use crate::app::{AppModel, Message, Notification, NotificationKind, Runtime, Services};
use crate::config::Config;
use crate::constants::terminal::INPUT_POLL_INTERVAL;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::RgbImage;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use std::collections::HashMap;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Longest side of the decoded preview and thumbnails, in pixels
const DECODE_SIZE: u32 = 320;

/// Run the terminal UI until the user quits
pub fn run(config: Config, source: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let preview = decode(&source).map(|thumbnail| thumbnail.image);
    let services = Services::local(&config, source);
    let (model, startup) = AppModel::new(config, services);
    let mut runtime = Runtime::new();
    runtime.spawn(startup);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("Terminal UI started");
    let result = run_app(&mut terminal, model, runtime, preview);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut model: AppModel,
    mut runtime: Runtime<Message>,
    preview: Option<RgbImage>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut thumbnails = ThumbnailCache::default();

    loop {
        // Apply everything the tasks produced since the last frame
        while let Some(message) = runtime.try_next() {
            let task = model.update(message);
            runtime.spawn(task);
        }

        if model.should_exit {
            break;
        }

        terminal.draw(|f| {
            let area = f.area();
            if model.show_gallery {
                draw_gallery(f.buffer_mut(), area, &model, &mut thumbnails);
            } else {
                draw_capture(f.buffer_mut(), area, &model, preview.as_ref());
            }
        })?;

        if event::poll(INPUT_POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let message = if key.code == KeyCode::Char('c')
                && key.modifiers.contains(KeyModifiers::CONTROL)
            {
                Some(Message::Quit)
            } else {
                key_message(model.show_gallery, key.code)
            };

            if let Some(message) = message {
                let task = model.update(message);
                runtime.spawn(task);
            }
        }
    }

    info!(photos_taken = model.capture.photos_taken, "Terminal UI closed");
    Ok(())
}

/// Map a key press to a message for the active screen
pub fn key_message(show_gallery: bool, code: KeyCode) -> Option<Message> {
    let message = match (show_gallery, code) {
        (_, KeyCode::Char('q')) => Message::Quit,
        (_, KeyCode::Char('g')) => Message::ToggleView,

        // Capture screen
        (false, KeyCode::Char('f')) => Message::ToggleFlash,
        (false, KeyCode::Char('w')) => Message::ToggleWhiteBalance,
        (false, KeyCode::Char('x')) => Message::ToggleFacing,
        (false, KeyCode::Char('a')) => Message::ToggleAutoFocus,
        (false, KeyCode::Char('+') | KeyCode::Char('=')) => Message::ZoomIn,
        (false, KeyCode::Char('-')) => Message::ZoomOut,
        (false, KeyCode::Char(']')) => Message::IncreaseFocusDepth,
        (false, KeyCode::Char('[')) => Message::DecreaseFocusDepth,
        (false, KeyCode::Char('r')) => Message::CycleRatio,
        (false, KeyCode::Char(' ')) => Message::Capture,
        (false, KeyCode::Esc) => Message::DismissNotification,

        // Gallery screen
        (true, KeyCode::Up | KeyCode::Char('k')) => Message::CursorUp,
        (true, KeyCode::Down | KeyCode::Char('j')) => Message::CursorDown,
        (true, KeyCode::Char(' ')) => Message::ToggleFocusedSelection,
        (true, KeyCode::Char('s')) => Message::SaveSelected,
        (true, KeyCode::Esc) => Message::ToggleView,

        _ => return None,
    };
    Some(message)
}

// =============================================================================
// Screens
// =============================================================================

fn draw_capture(buf: &mut Buffer, area: Rect, model: &AppModel, preview: Option<&RgbImage>) {
    let preview_area = Rect {
        height: area.height.saturating_sub(3),
        ..area
    };
    PreviewWidget {
        image: preview,
        zoom: model.capture.settings.zoom,
        ratio: parse_ratio(&model.capture.settings.ratio),
    }
    .render(preview_area, buf);

    let settings = capture_summary(model);
    TextLine::plain(&settings).render(row(area, 3), buf);
    NotificationLine(model.notification.as_ref()).render(row(area, 2), buf);
    StatusBar {
        message: "space snap | f flash | w wb | x facing | a af | +/- zoom | [/] focus \
                  | r ratio | g gallery | q quit",
    }
    .render(row(area, 1), buf);
}

fn draw_gallery(buf: &mut Buffer, area: Rect, model: &AppModel, thumbnails: &mut ThumbnailCache) {
    let body = Rect {
        height: area.height.saturating_sub(2),
        ..area
    };
    let list_width = (body.width * 2 / 5).max(24).min(body.width);
    let list_area = Rect {
        width: list_width,
        ..body
    };
    let thumb_area = Rect {
        x: body.x + list_width,
        width: body.width - list_width,
        ..body
    };

    PhotoList { model }.render(list_area, buf);

    if let Some(path) = model.gallery.focused() {
        let box_size = model.config.thumbnail_size;
        let overlays = model.gallery.faces.overlays(path, box_size);
        ThumbnailWidget {
            thumbnail: thumbnails.get(path),
            overlays: &overlays,
            box_size,
        }
        .render(thumb_area, buf);
    }

    NotificationLine(model.notification.as_ref()).render(row(area, 2), buf);
    StatusBar {
        message: "up/down move | space select | s save | g back | q quit",
    }
    .render(row(area, 1), buf);
}

/// One-line rect `from_bottom` rows above the bottom edge
fn row(area: Rect, from_bottom: u16) -> Rect {
    Rect {
        x: area.x,
        y: (area.y + area.height).saturating_sub(from_bottom),
        width: area.width,
        height: area.height.min(1),
    }
}

/// Current capture settings as one status line
pub fn capture_summary(model: &AppModel) -> String {
    let settings = &model.capture.settings;
    let focus = if settings.auto_focus.is_on() {
        "auto".to_string()
    } else {
        format!("{:.1}", settings.focus_depth)
    };
    let state = if model.capture.is_capturing {
        " | capturing..."
    } else {
        ""
    };
    format!(
        "{} | flash {} | wb {} | af {} | zoom {:.1} | focus {} | {} | next #{}{}",
        settings.facing.display_name(),
        settings.flash.display_name(),
        settings.white_balance.display_name(),
        settings.auto_focus.display_name(),
        settings.zoom,
        focus,
        settings.ratio,
        model.capture.next_photo_id,
        state
    )
}

/// `"16:9"` as a width / height factor
pub fn parse_ratio(ratio: &str) -> Option<f64> {
    let (w, h) = ratio.split_once(':')?;
    let w: f64 = w.trim().parse().ok()?;
    let h: f64 = h.trim().parse().ok()?;
    (w > 0.0 && h > 0.0).then_some(w / h)
}

// =============================================================================
// Image Decoding
// =============================================================================

struct Thumbnail {
    image: RgbImage,
    /// Size of the photo on disk, before downscaling
    dimensions: Option<ImageDimensions>,
}

fn decode(path: &Path) -> Option<Thumbnail> {
    match image::open(path) {
        Ok(img) => Some(Thumbnail {
            dimensions: ImageDimensions::new(img.width(), img.height()),
            image: img.thumbnail(DECODE_SIZE, DECODE_SIZE).to_rgb8(),
        }),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to decode image");
            None
        }
    }
}

/// Decoded gallery thumbnails, including photos that failed to decode
#[derive(Default)]
struct ThumbnailCache {
    entries: HashMap<PathBuf, Option<Thumbnail>>,
}

impl ThumbnailCache {
    fn get(&mut self, path: &Path) -> Option<&Thumbnail> {
        self.entries
            .entry(path.to_path_buf())
            .or_insert_with(|| decode(path))
            .as_ref()
    }
}

// =============================================================================
// Widgets
// =============================================================================

/// Pixel grid over a cell area; each cell holds two vertical pixels
struct PixelCanvas {
    area: Rect,
}

impl PixelCanvas {
    fn width(&self) -> u16 {
        self.area.width
    }

    fn height(&self) -> u16 {
        self.area.height * 2
    }

    fn put(&self, buf: &mut Buffer, x: u16, y: u16, color: Color) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        if let Some(cell) = buf.cell_mut((self.area.x + x, self.area.y + y / 2)) {
            cell.set_char('▀');
            if y % 2 == 0 {
                cell.set_fg(color);
            } else {
                cell.set_bg(color);
            }
        }
    }

    /// Nearest-neighbour blit of `crop` (x, y, w, h in image pixels) into `dest`
    fn blit(&self, buf: &mut Buffer, image: &RgbImage, crop: [f64; 4], dest: [f64; 4]) {
        let [cx, cy, cw, ch] = crop;
        let [dx, dy, dw, dh] = dest;
        if dw < 1.0 || dh < 1.0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        for py in dy.max(0.0) as u16..(dy + dh).min(self.height() as f64) as u16 {
            for px in dx.max(0.0) as u16..(dx + dw).min(self.width() as f64) as u16 {
                let sx = cx + (px as f64 - dx + 0.5) / dw * cw;
                let sy = cy + (py as f64 - dy + 0.5) / dh * ch;
                let sx = (sx as u32).min(image.width() - 1);
                let sy = (sy as u32).min(image.height() - 1);
                let [r, g, b] = image.get_pixel(sx, sy).0;
                self.put(buf, px, py, Color::Rgb(r, g, b));
            }
        }
    }

    /// One-pixel outline of `rect` (x, y, w, h in canvas pixels)
    fn outline(&self, buf: &mut Buffer, rect: [f64; 4], color: Color) {
        let [x, y, w, h] = rect;
        let left = x.round().max(0.0) as u16;
        let top = y.round().max(0.0) as u16;
        let right = (x + w).round().max(0.0) as u16;
        let bottom = (y + h).round().max(0.0) as u16;
        for px in left..=right {
            self.put(buf, px, top, color);
            self.put(buf, px, bottom, color);
        }
        for py in top..=bottom {
            self.put(buf, left, py, color);
            self.put(buf, right, py, color);
        }
    }
}

/// Live view: the source image cropped to the ratio and zoomed
struct PreviewWidget<'a> {
    image: Option<&'a RgbImage>,
    zoom: f64,
    ratio: Option<f64>,
}

impl Widget for PreviewWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(image) = self.image else {
            placeholder(area, buf, "No preview available");
            return;
        };
        let canvas = PixelCanvas { area };
        let (iw, ih) = (image.width() as f64, image.height() as f64);

        // Crop to the aspect ratio, then shrink the crop around the centre for zoom
        let aspect = self.ratio.unwrap_or(iw / ih);
        let (mut cw, mut ch) = if iw / ih > aspect {
            (ih * aspect, ih)
        } else {
            (iw, iw / aspect)
        };
        let magnify = 1.0 - 0.75 * self.zoom.clamp(0.0, 1.0);
        cw *= magnify;
        ch *= magnify;
        let crop = [(iw - cw) / 2.0, (ih - ch) / 2.0, cw, ch];

        let (aw, ah) = (canvas.width() as f64, canvas.height() as f64);
        let (dw, dh) = if aw / ah > aspect {
            (ah * aspect, ah)
        } else {
            (aw, aw / aspect)
        };
        canvas.blit(buf, image, crop, [(aw - dw) / 2.0, (ah - dh) / 2.0, dw, dh]);
    }
}

/// Focused gallery photo with its face overlays
struct ThumbnailWidget<'a> {
    thumbnail: Option<&'a Thumbnail>,
    overlays: &'a [FaceOverlay],
    /// Side of the thumbnail box the overlays were mapped into
    box_size: f64,
}

impl Widget for ThumbnailWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(thumbnail) = self.thumbnail else {
            placeholder(area, buf, "Cannot display photo");
            return;
        };
        let Some(dimensions) = thumbnail.dimensions else {
            placeholder(area, buf, "Empty image");
            return;
        };
        let canvas = PixelCanvas { area };

        // Square box in canvas pixels, centred
        let side = canvas.width().min(canvas.height()) as f64;
        if side < 2.0 || self.box_size <= 0.0 {
            return;
        }
        let scale = side / self.box_size;
        let origin_x = (canvas.width() as f64 - side) / 2.0;
        let origin_y = (canvas.height() as f64 - side) / 2.0;
        let to_canvas = |left: f64, top: f64, width: f64, height: f64| {
            [
                origin_x + left * scale,
                origin_y + top * scale,
                width * scale,
                height * scale,
            ]
        };

        let geometry = ThumbnailGeometry::fit(dimensions, self.box_size);
        let shown = geometry.display_rect();
        let image = &thumbnail.image;
        canvas.blit(
            buf,
            image,
            [0.0, 0.0, image.width() as f64, image.height() as f64],
            to_canvas(shown.left, shown.top, shown.width, shown.height),
        );

        for overlay in self.overlays {
            let color = match overlay.smiling_probability {
                Some(p) if p >= 0.5 => Color::Green,
                _ => Color::Yellow,
            };
            let r = overlay.rect;
            canvas.outline(buf, to_canvas(r.left, r.top, r.width, r.height), color);
        }
    }
}

/// Photo names with selection marks and face counts
struct PhotoList<'a> {
    model: &'a AppModel,
}

impl Widget for PhotoList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let gallery = &self.model.gallery;
        if !gallery.loaded {
            placeholder(area, buf, "Loading photos...");
            return;
        }
        if gallery.photos.is_empty() {
            placeholder(area, buf, "No photos yet");
            return;
        }

        let header = format!(
            "{} photo(s), {} selected{}",
            gallery.photos.len(),
            gallery.selection.len(),
            if gallery.exporting { ", saving..." } else { "" }
        );
        TextLine::plain(&header).render(Rect { height: 1, ..area }, buf);

        // Keep the cursor visible
        let rows = area.height.saturating_sub(1) as usize;
        let first = gallery.cursor.saturating_sub(rows.saturating_sub(1));

        for (offset, path) in gallery.photos.iter().enumerate().skip(first).take(rows) {
            let mark = if gallery.selection.contains(path) { "[x]" } else { "[ ]" };
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let faces = if let Some(entry) = gallery.faces.get(path) {
                format!("{} face(s)", entry.faces.len())
            } else if gallery.faces.failure(path).is_some() {
                "no face data".to_string()
            } else {
                String::new()
            };
            let line = format!("{} {:<20} {}", mark, name, faces);

            let mut style = Style::default();
            if offset == gallery.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let y = area.y + 1 + (offset - first) as u16;
            buf.set_string(area.x, y, truncate(&line, area.width), style);
        }
    }
}

struct TextLine<'a> {
    text: &'a str,
    style: Style,
}

impl<'a> TextLine<'a> {
    fn plain(text: &'a str) -> Self {
        Self {
            text,
            style: Style::default(),
        }
    }
}

impl Widget for TextLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        buf.set_string(area.x, area.y, truncate(self.text, area.width), self.style);
    }
}

struct NotificationLine<'a>(Option<&'a Notification>);

impl Widget for NotificationLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(notification) = self.0 else {
            return;
        };
        let color = match notification.kind {
            NotificationKind::Info => Color::White,
            NotificationKind::Success => Color::Green,
            NotificationKind::Error => Color::Red,
        };
        TextLine {
            text: &notification.text,
            style: Style::default().fg(color),
        }
        .render(area, buf);
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        buf.set_string(
            area.x,
            area.y,
            truncate(self.message, area.width),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}

fn placeholder(area: Rect, buf: &mut Buffer, msg: &str) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let x = area.x + (area.width.saturating_sub(msg.chars().count() as u16)) / 2;
    let y = area.y + area.height / 2;
    buf.set_string(x, y, truncate(msg, area.width), Style::default());
}

fn truncate(text: &str, width: u16) -> String {
    text.chars().take(width as usize).collect()
}
