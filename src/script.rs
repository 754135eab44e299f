//! Key scripts
//!
//! A compact way to drive the controller from the command line, one
//! character per key press. `:N` jumps to page N (counted from 1).

use crate::controller::Command;
use crate::transition::NavInput;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown key {key:?} at position {position}")]
    UnknownKey { key: char, position: usize },

    #[error("expected a page number starting at 1 after ':' at position {position}")]
    BadPageNumber { position: usize },
}

fn command_for(key: char) -> Option<Command> {
    let cmd = match key {
        'j' => Command::Navigate(NavInput::Forward),
        'k' => Command::Navigate(NavInput::Backward),
        'J' => Command::NavigateLong(NavInput::Forward),
        'K' => Command::NavigateLong(NavInput::Backward),
        'l' => Command::Navigate(NavInput::ShiftForward),
        'h' => Command::Navigate(NavInput::ShiftBackward),
        'L' => Command::NavigateLong(NavInput::ShiftForward),
        'H' => Command::NavigateLong(NavInput::ShiftBackward),
        ']' => Command::NextColumn,
        '[' => Command::PrevColumn,
        '+' => Command::ZoomIn { long: false },
        '*' => Command::ZoomIn { long: true },
        '-' => Command::ZoomOut { long: false },
        '_' => Command::ZoomOut { long: true },
        '0' => Command::ResetView,
        'o' => Command::ToggleOrientation,
        'c' => Command::ToggleMultiColumn,
        'w' => Command::ToggleWindowMark,
        'm' => Command::SaveView,
        '\'' => Command::RestoreView,
        _ => return None,
    };
    Some(cmd)
}

pub fn parse(script: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();
    let mut chars = script.chars().enumerate().peekable();

    while let Some((position, key)) = chars.next() {
        if key.is_whitespace() {
            continue;
        }
        if key == ':' {
            let mut digits = String::new();
            while let Some((_, d)) = chars.next_if(|(_, c)| c.is_ascii_digit()) {
                digits.push(d);
            }
            let page = digits
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .ok_or(ScriptError::BadPageNumber { position })?;
            commands.push(Command::GoToPage(page));
            continue;
        }
        let cmd = command_for(key).ok_or(ScriptError::UnknownKey { key, position })?;
        commands.push(cmd);
    }
    Ok(commands)
}
