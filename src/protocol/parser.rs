//! Line parser
//!
//! Turns one input line (without its newline) into a [`Command`].

use super::Command;

/// Parse a single input line.
///
/// Never fails: unrecognized input becomes [`Command::Invalid`], which the
/// session reports while continuing to accept input.
pub fn parse_line(line: &str) -> Command {
    let Some(first) = line.bytes().next() else {
        return Command::Empty;
    };

    match first {
        b'?' => Command::List,
        b'#' => Command::Count,
        b'!' => Command::Init,
        b'h' => Command::Help,
        _ => parse_write(line),
    }
}

/// Parse `N=text`. A missing `=`, a non-numeric position, or position 0
/// all come back as `Invalid`.
fn parse_write(line: &str) -> Command {
    let Some((position, text)) = line.split_once('=') else {
        return Command::Invalid;
    };

    match position.trim().parse::<usize>() {
        Ok(position) if position >= 1 => Command::Write {
            position,
            text: text.to_string(),
        },
        _ => Command::Invalid,
    }
}
