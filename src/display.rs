//! Live sensor status and device table rendering
//!
//! The live panel is a small ratatui inline viewport that redraws in place
//! below the regular terminal output; click notices scroll above it.

use std::io::{self, Stdout, Write};

use crossterm::style::Stylize;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use ratatui::{Frame, Terminal, TerminalOptions, Viewport};
use spike_transport::{ForceReading, SerialEndpoint};
use tracing::{info, trace, warn};

use crate::edge::TriggerMode;

/// Height of the inline status panel (border + one line + border)
const PANEL_HEIGHT: u16 = 3;

/// Receives decoded readings and click notifications
pub trait StatusDisplay {
    /// Show the latest reading
    fn update(&mut self, reading: &ForceReading) -> io::Result<()>;

    /// Note that a click was fired
    fn clicked(&mut self, mode: TriggerMode) -> io::Result<()>;

    /// Report a problem without disturbing the live output
    fn notice(&mut self, message: &str) -> io::Result<()> {
        warn!("{}", message);
        Ok(())
    }
}

/// Format the live force line
pub fn force_line(reading: &ForceReading) -> String {
    format!("Live Force: {:.2} N", reading.force)
}

/// Format a click notice
pub fn click_line(mode: TriggerMode) -> String {
    format!("Click! ({})", mode)
}

/// Styled line for a problem notice
pub fn notice_line(message: &str) -> Line<'static> {
    Line::styled(message.to_string(), Style::default().fg(Color::Red))
}

/// Render the status panel into a frame
pub fn render_panel(frame: &mut Frame, reading: Option<&ForceReading>) {
    let mut spans = vec![Span::styled(
        reading.map_or_else(|| "Waiting for sensor...".to_string(), force_line),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if reading.is_some_and(|r| r.touched) {
        spans.push(Span::styled("  [touched]", Style::default().fg(Color::Yellow)));
    }

    let panel = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Sensor Status "),
        );

    frame.render_widget(panel, frame.area());
}

/// Inline live panel on stdout
pub struct LivePanel {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    last: Option<ForceReading>,
}

impl LivePanel {
    /// Create the panel below the current cursor position
    pub fn new() -> io::Result<Self> {
        let terminal = Terminal::with_options(
            CrosstermBackend::new(io::stdout()),
            TerminalOptions {
                viewport: Viewport::Inline(PANEL_HEIGHT),
            },
        )?;
        let mut panel = Self {
            terminal,
            last: None,
        };
        panel.draw()?;
        Ok(panel)
    }

    fn draw(&mut self) -> io::Result<()> {
        let last = self.last;
        self.terminal.draw(|f| render_panel(f, last.as_ref()))?;
        Ok(())
    }

    fn insert_line(&mut self, line: Line<'static>) -> io::Result<()> {
        self.terminal.insert_before(1, |buf| {
            Paragraph::new(line).render(buf.area, buf);
        })?;
        Ok(())
    }

    /// Leave the cursor below the panel
    pub fn finish(mut self) -> io::Result<()> {
        self.draw()?;
        println!();
        Ok(())
    }
}

impl StatusDisplay for LivePanel {
    fn update(&mut self, reading: &ForceReading) -> io::Result<()> {
        self.last = Some(*reading);
        self.draw()
    }

    fn clicked(&mut self, mode: TriggerMode) -> io::Result<()> {
        self.insert_line(Line::raw(click_line(mode)))
    }

    // Logging to stderr here would land inside the inline viewport
    fn notice(&mut self, message: &str) -> io::Result<()> {
        self.insert_line(notice_line(message))
    }
}

/// Display for headless runs: everything goes through tracing
#[derive(Debug, Default)]
pub struct HeadlessStatus;

impl StatusDisplay for HeadlessStatus {
    fn update(&mut self, reading: &ForceReading) -> io::Result<()> {
        trace!("{} (touched: {})", force_line(reading), reading.touched);
        Ok(())
    }

    fn clicked(&mut self, mode: TriggerMode) -> io::Result<()> {
        info!("{}", click_line(mode));
        Ok(())
    }
}

/// Print the endpoint table with 1-based indices
pub fn print_endpoint_table<W: Write>(
    out: &mut W,
    endpoints: &[SerialEndpoint],
) -> io::Result<()> {
    let path_w = column_width("Device", endpoints.iter().map(|e| e.device_path.as_str()));
    let serial_w = column_width("Serial Number", endpoints.iter().map(|e| e.serial_display()));

    writeln!(out, "{}", "Available Serial Devices".bold())?;
    writeln!(
        out,
        "{:<5}  {:<path_w$}  {:<serial_w$}  {}",
        "Index", "Device", "Serial Number", "Description"
    )?;
    for (i, ep) in endpoints.iter().enumerate() {
        writeln!(
            out,
            "{}  {}  {}  {}",
            format!("{:<5}", i + 1).magenta(),
            format!("{:<path_w$}", ep.device_path).cyan(),
            format!("{:<serial_w$}", ep.serial_display()).yellow(),
            ep.description.as_str().green(),
        )?;
    }
    Ok(())
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}
