// SPDX-License-Identifier: GPL-3.0-only

//! Interactive capture session
//!
//! Renders the camera feed to the terminal using Unicode half-block
//! characters and watches for two commands: 's' saves the current frame,
//! 'q' (or Ctrl+C) ends the session. Each loop iteration drains pending
//! frames, draws, then polls keys with a short bound so the loop stays
//! responsive to both.

use crate::backends::camera::{CameraFrame, FrameSource};
use crate::config::CaptureConfig;
use crate::constants::KEY_POLL_INTERVAL;
use crate::errors::{AppError, AppResult};
use crate::storage::SessionStore;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal, backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color,
    widgets::Widget,
};
use std::io::{self, stdout};
use std::path::PathBuf;
use tracing::{error, info};

/// What a finished capture session produced
#[derive(Debug, Default)]
pub struct CaptureOutcome {
    /// Saved frame paths in save order; possibly empty
    pub saved: Vec<PathBuf>,
}

/// Run one interactive capture session.
///
/// The camera opens before the terminal switches modes, so a dead device
/// reports cleanly without ever entering the preview. Raw mode and the
/// alternate screen are restored on every exit path, including errors.
pub fn run_session(config: &CaptureConfig) -> AppResult<CaptureOutcome> {
    let mut source = FrameSource::open(config.device_index)?;
    let mut store = SessionStore::new(&config.output_dir)?;

    // Set up terminal; undo raw mode if the alternate screen fails
    enable_raw_mode()?;
    let mut stdout = stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(e.into());
        }
    };

    let result = run_app(&mut terminal, &mut source, &mut store);

    // Best-effort restore; a restore failure must not mask the session result
    if let Err(e) = disable_raw_mode() {
        error!("Failed to disable raw mode: {}", e);
    }
    if let Err(e) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
        error!("Failed to leave alternate screen: {}", e);
    }
    if let Err(e) = terminal.show_cursor() {
        error!("Failed to restore cursor: {}", e);
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    source: &mut FrameSource,
    store: &mut SessionStore,
) -> AppResult<CaptureOutcome> {
    let mut frame_widget = FrameWidget::new();
    let mut saved: Vec<PathBuf> = Vec::new();
    let mut status_message = build_status_message(&saved);

    // Block for the first frame so there is something to show; a camera
    // that cannot produce even one frame ends the session here
    frame_widget.update_frame(source.read_frame()?);

    loop {
        // Drain pending frames to render the latest; a decode failure
        // terminates the session after teardown
        while let Some(frame) = source.try_frame() {
            frame_widget.update_frame(frame?);
        }

        // Draw
        terminal.draw(|f| {
            let area = f.area();

            // Reserve bottom line for status
            let camera_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(1),
            };

            f.render_widget(&frame_widget, camera_area);

            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };

            let status = StatusBar {
                message: &status_message,
            };
            f.render_widget(status, status_area);
        })?;

        // Handle input with timeout for frame updates
        if event::poll(KEY_POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
        {
            match key_action(&key) {
                KeyAction::Quit => break,
                KeyAction::Save => {
                    if let Some(frame) = &frame_widget.frame {
                        match save_frame(frame, store) {
                            Ok(path) => {
                                info!(path = %path.display(), "Frame saved");
                                saved.push(path);
                                status_message = build_status_message(&saved);
                            }
                            Err(e) => {
                                error!("Failed to save frame: {}", e);
                                status_message = format!("Error: {}", e);
                            }
                        }
                    }
                }
                KeyAction::Ignore => {}
            }
        }
    }

    info!(saved = saved.len(), "Capture session finished");
    Ok(CaptureOutcome { saved })
}

/// What a key event means for the session loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    /// Save the current frame
    Save,
    /// End the session
    Quit,
    /// Keep previewing
    Ignore,
}

/// Map a key event to a session command.
///
/// Only press events count; 'q' and Ctrl+C quit, 's' saves, every other
/// key leaves the session running.
fn key_action(key: &KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Ignore;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('s') => KeyAction::Save,
        _ => KeyAction::Ignore,
    }
}

fn build_status_message(saved: &[PathBuf]) -> String {
    match saved.last() {
        Some(last) => format!(
            "'s' save | 'q' quit | {} saved, last: {}",
            saved.len(),
            last.display()
        ),
        None => "'s' save | 'q' quit".to_string(),
    }
}

/// Encode the current frame as JPEG at the session's next path
fn save_frame(frame: &CameraFrame, store: &mut SessionStore) -> AppResult<PathBuf> {
    let img: image::RgbImage =
        image::ImageBuffer::from_raw(frame.width, frame.height, frame.data.to_vec())
            .ok_or_else(|| AppError::Storage("frame buffer size mismatch".to_string()))?;

    let path = store.allocate();
    img.save(&path)
        .map_err(|e| AppError::Storage(format!("{}: {}", path.display(), e)))?;

    Ok(path)
}

/// Widget that renders a camera frame using half-block characters
struct FrameWidget {
    frame: Option<CameraFrame>,
}

impl FrameWidget {
    fn new() -> Self {
        Self { frame: None }
    }

    fn update_frame(&mut self, frame: CameraFrame) {
        self.frame = Some(frame);
    }
}

impl Widget for &FrameWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = &self.frame else {
            // No frame yet - show placeholder
            let msg = "Waiting for camera...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, ratatui::style::Style::default());
            }
            return;
        };

        if frame.width == 0 || frame.height == 0 || area.width == 0 || area.height == 0 {
            return;
        }

        // Each terminal cell displays 2 vertical pixels using half-blocks
        let frame_aspect = frame.width as f64 / frame.height as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            // Terminal is wider - fit to height
            let h = term_height;
            let w = h * frame_aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            // Terminal is taller - fit to width
            let w = term_width;
            let h = w / frame_aspect;
            (w as u16, (h / 2.0) as u16)
        };

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = frame.width as f64 / display_width.max(1) as f64;
        let y_scale = frame.height as f64 / (display_height.max(1) * 2) as f64;

        // Upper half (▀) colored with fg, lower half with bg
        for ty in 0..display_height {
            for tx in 0..display_width {
                let term_x = x_offset + tx;
                let term_y = y_offset + ty;

                if term_x >= area.x + area.width || term_y >= area.y + area.height {
                    continue;
                }

                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let (tr, tg, tb) = frame.pixel(src_x, src_y_top);
                let (br, bg, bb) = frame.pixel(src_x, src_y_bottom);

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(Color::Rgb(tr, tg, tb));
                    cell.set_bg(Color::Rgb(br, bg, bb));
                }
            }
        }
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
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
            truncate_to_width(self.message, area.width as usize),
            ratatui::style::Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray),
        );
    }
}

/// Truncate a message to at most `width` characters.
///
/// The status message embeds saved-frame paths, which can hold multi-byte
/// characters, so this cuts on char boundaries rather than byte offsets.
fn truncate_to_width(message: &str, width: usize) -> &str {
    match message.char_indices().nth(width) {
        Some((end, _)) => &message[..end],
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn save_and_quit_keys_map_to_their_actions() {
        assert_eq!(key_action(&press(KeyCode::Char('s'))), KeyAction::Save);
        assert_eq!(key_action(&press(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(
            key_action(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
    }

    #[test]
    fn only_quit_keys_end_the_session() {
        let harmless = [
            KeyCode::Char('a'),
            KeyCode::Char('c'),
            KeyCode::Char('Q'),
            KeyCode::Char(' '),
            KeyCode::Enter,
            KeyCode::Esc,
            KeyCode::Up,
            KeyCode::Tab,
        ];
        for code in harmless {
            assert_ne!(key_action(&press(code)), KeyAction::Quit, "{:?}", code);
        }
    }

    #[test]
    fn key_release_is_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(key_action(&key), KeyAction::Ignore);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let message = "last: café/image1.jpg";
        // Cut inside the multi-byte 'é'
        assert_eq!(truncate_to_width(message, 9), "last: caf");
        assert_eq!(truncate_to_width(message, 10), "last: café");
        assert_eq!(truncate_to_width(message, 100), message);
        assert_eq!(truncate_to_width(message, 0), "");
    }

    #[test]
    fn narrow_status_bar_renders_non_ascii_message() {
        let area = Rect::new(0, 0, 8, 1);
        let mut buf = Buffer::empty(area);
        let status = StatusBar {
            message: "café/image1.jpg saved",
        };
        status.render(area, &mut buf);
        let line: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().chars().next().unwrap_or(' '))
            .collect();
        assert_eq!(line, "café/ima");
    }
}
