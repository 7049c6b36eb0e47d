//! Display refresh contract and the terminal renderer

use std::io::{self, Write};

use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::{Color, Print, Stylize},
    terminal::{Clear, ClearType},
};

use crate::{
    format::{color_for, format_time, DisplayColor},
    state::MeetingState,
};

/// Everything the display needs to show for one refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    pub individual_text: String,
    /// `None` while the individual countdown is greyed out
    pub individual_color: Option<DisplayColor>,
    pub participant_label: String,
    pub total_text: String,
    pub total_color: DisplayColor,
    /// Whether the "next participant" action is still available
    pub next_enabled: bool,
    pub finished: bool,
}

impl DisplayFrame {
    /// Derive a frame from the current counters
    pub fn from_meeting(meeting: &MeetingState) -> Self {
        let warning_time = meeting.warning_time();
        let active = meeting.is_individual_phase_active();

        let (individual_color, participant_label) = if active {
            (
                Some(color_for(meeting.remaining_individual_seconds(), warning_time)),
                format!(
                    "Participant {}/{}",
                    meeting.completed_participants() + 1,
                    meeting.total_participants()
                ),
            )
        } else {
            (None, "Individual status complete".to_string())
        };

        Self {
            individual_text: format_time(meeting.remaining_individual_seconds()),
            individual_color,
            participant_label,
            total_text: format_time(meeting.remaining_meeting_seconds()),
            total_color: color_for(meeting.remaining_meeting_seconds(), warning_time),
            next_enabled: active,
            finished: meeting.is_finished(),
        }
    }

    /// Plain-text rendering without styling
    pub fn to_line(&self) -> String {
        format!(
            "{}  {}  |  total {}",
            self.participant_label, self.individual_text, self.total_text
        )
    }
}

/// Something that can show a [`DisplayFrame`]
pub trait Renderer {
    fn render(&mut self, frame: &DisplayFrame) -> io::Result<()>;

    /// Called once when the session ends
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Redraws one status line in place on a terminal
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn terminal_color(color: Option<DisplayColor>) -> Color {
    match color {
        Some(DisplayColor::Red) => Color::Red,
        Some(DisplayColor::Yellow) => Color::Yellow,
        Some(DisplayColor::Green) => Color::Green,
        None => Color::Grey,
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, frame: &DisplayFrame) -> io::Result<()> {
        let label = if frame.next_enabled {
            frame.participant_label.clone().bold()
        } else {
            frame.participant_label.clone().with(Color::Grey)
        };

        queue!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(label),
            Print("  "),
            Print(
                frame
                    .individual_text
                    .clone()
                    .with(terminal_color(frame.individual_color))
            ),
            Print("  |  total "),
            Print(
                frame
                    .total_text
                    .clone()
                    .with(terminal_color(Some(frame.total_color)))
            ),
        )?;
        self.out.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.out.flush()
    }
}
