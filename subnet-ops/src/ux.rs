use std::io::{self, stdout};

use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

/// Operator-facing line, not a log record.
pub fn print_to_user(msg: &str) -> io::Result<()> {
    execute!(stdout(), Print(format!("{msg}\n")))
}

pub fn print_notice(msg: &str) -> io::Result<()> {
    execute!(
        stdout(),
        SetForegroundColor(Color::Yellow),
        Print(format!("{msg}\n")),
        ResetColor
    )
}

pub fn print_step(msg: &str) -> io::Result<()> {
    execute!(
        stdout(),
        SetForegroundColor(Color::Green),
        Print(format!("\n{msg}\n")),
        ResetColor
    )
}
