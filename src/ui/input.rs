//! Turns terminal input into the handful of logical keys the controller
//! understands. Two front doors exist: [`decode`] for raw bytes straight off
//! an unbuffered terminal, and [`from_key_event`] for events already parsed
//! by crossterm. Both agree on what each key means.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const ESC: u8 = 0x1b;

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Tab,
    Escape,
    Backspace,
    CtrlC,
    CtrlS,
    CtrlD,
    CtrlN,
    Printable(char),
    /// Anything else. Callers drop it without touching state.
    Unrecognized,
}

/// Decode one input event worth of bytes. Arrow keys arrive as ANSI escape
/// sequences (`ESC [ A` or the application-mode `ESC O A`), every other key
/// is a single byte or a single UTF-8 character. No state is carried between
/// calls, so a sequence split across two reads decodes as unrecognized.
pub fn decode(raw: &[u8]) -> LogicalKey {
    match raw {
        [ESC, b'[' | b'O', b'A'] => LogicalKey::Up,
        [ESC, b'[' | b'O', b'B'] => LogicalKey::Down,
        [ESC, b'[' | b'O', b'C'] => LogicalKey::Right,
        [ESC, b'[' | b'O', b'D'] => LogicalKey::Left,
        [ESC] => LogicalKey::Escape,
        [b'\r'] | [b'\n'] => LogicalKey::Enter,
        [b'\t'] => LogicalKey::Tab,
        [0x7f] | [0x08] => LogicalKey::Backspace,
        [0x03] => LogicalKey::CtrlC,
        [0x13] => LogicalKey::CtrlS,
        [0x04] => LogicalKey::CtrlD,
        [0x0e] => LogicalKey::CtrlN,
        _ => decode_printable(raw),
    }
}

fn decode_printable(raw: &[u8]) -> LogicalKey {
    let Ok(text) = std::str::from_utf8(raw) else {
        return LogicalKey::Unrecognized;
    };
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch >= ' ' && ch != '\u{7f}' => LogicalKey::Printable(ch),
        _ => LogicalKey::Unrecognized,
    }
}

/// Map a crossterm key event onto the same key set. Only presses count;
/// release and repeat events are unrecognized.
pub fn from_key_event(event: &KeyEvent) -> LogicalKey {
    if event.kind != KeyEventKind::Press {
        return LogicalKey::Unrecognized;
    }

    // AltGr arrives as CONTROL | ALT on some platforms and composes ordinary
    // characters, so only a bare Ctrl makes a chord.
    let ctrl_chord = event.modifiers.contains(KeyModifiers::CONTROL)
        && !event.modifiers.contains(KeyModifiers::ALT);
    if ctrl_chord {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('C') => LogicalKey::CtrlC,
            KeyCode::Char('s') | KeyCode::Char('S') => LogicalKey::CtrlS,
            KeyCode::Char('d') | KeyCode::Char('D') => LogicalKey::CtrlD,
            KeyCode::Char('n') | KeyCode::Char('N') => LogicalKey::CtrlN,
            KeyCode::Char('h') | KeyCode::Char('H') => LogicalKey::Backspace,
            _ => LogicalKey::Unrecognized,
        };
    }

    match event.code {
        KeyCode::Up => LogicalKey::Up,
        KeyCode::Down => LogicalKey::Down,
        KeyCode::Left => LogicalKey::Left,
        KeyCode::Right => LogicalKey::Right,
        KeyCode::Enter => LogicalKey::Enter,
        KeyCode::Tab => LogicalKey::Tab,
        KeyCode::Esc => LogicalKey::Escape,
        KeyCode::Backspace => LogicalKey::Backspace,
        KeyCode::Char(ch) if !ch.is_control() => LogicalKey::Printable(ch),
        _ => LogicalKey::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn arrow_sequences_decode_in_both_cursor_modes() {
        assert_eq!(decode(b"\x1b[A"), LogicalKey::Up);
        assert_eq!(decode(b"\x1bOB"), LogicalKey::Down);
        assert_eq!(decode(b"\x1b[C"), LogicalKey::Right);
        assert_eq!(decode(b"\x1b[D"), LogicalKey::Left);
    }

    #[test]
    fn control_bytes_decode_to_named_keys() {
        assert_eq!(decode(&[0x1b]), LogicalKey::Escape);
        assert_eq!(decode(b"\r"), LogicalKey::Enter);
        assert_eq!(decode(b"\t"), LogicalKey::Tab);
        assert_eq!(decode(&[0x7f]), LogicalKey::Backspace);
        assert_eq!(decode(&[0x03]), LogicalKey::CtrlC);
        assert_eq!(decode(&[0x13]), LogicalKey::CtrlS);
        assert_eq!(decode(&[0x04]), LogicalKey::CtrlD);
        assert_eq!(decode(&[0x0e]), LogicalKey::CtrlN);
    }

    #[test]
    fn printable_covers_space_and_multibyte_characters() {
        assert_eq!(decode(b" "), LogicalKey::Printable(' '));
        assert_eq!(decode(b"a"), LogicalKey::Printable('a'));
        assert_eq!(decode("ñ".as_bytes()), LogicalKey::Printable('ñ'));
    }

    #[test]
    fn unknown_or_partial_sequences_are_unrecognized() {
        assert_eq!(decode(b""), LogicalKey::Unrecognized);
        assert_eq!(decode(b"\x1b["), LogicalKey::Unrecognized);
        assert_eq!(decode(b"\x1b[5~"), LogicalKey::Unrecognized);
        assert_eq!(decode(b"ab"), LogicalKey::Unrecognized);
        assert_eq!(decode(&[0x01]), LogicalKey::Unrecognized);
        assert_eq!(decode(&[0xff]), LogicalKey::Unrecognized);
    }

    #[test]
    fn key_events_map_like_raw_bytes() {
        assert_eq!(
            from_key_event(&key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            LogicalKey::CtrlS
        );
        assert_eq!(
            from_key_event(&key(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            LogicalKey::Unrecognized
        );
        assert_eq!(
            from_key_event(&key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            LogicalKey::Printable('A')
        );
        assert_eq!(
            from_key_event(&key(KeyCode::Esc, KeyModifiers::NONE)),
            LogicalKey::Escape
        );
        assert_eq!(
            from_key_event(&key(KeyCode::F(5), KeyModifiers::NONE)),
            LogicalKey::Unrecognized
        );
    }

    #[test]
    fn altgr_composed_characters_stay_printable() {
        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        assert_eq!(
            from_key_event(&key(KeyCode::Char('@'), altgr)),
            LogicalKey::Printable('@')
        );
        assert_eq!(
            from_key_event(&key(KeyCode::Char('€'), altgr)),
            LogicalKey::Printable('€')
        );
        assert_eq!(
            from_key_event(&key(KeyCode::Char('{'), altgr)),
            LogicalKey::Printable('{')
        );
    }

    #[test]
    fn ctrl_h_is_backspace_in_both_decoders() {
        assert_eq!(decode(&[0x08]), LogicalKey::Backspace);
        assert_eq!(
            from_key_event(&key(KeyCode::Char('h'), KeyModifiers::CONTROL)),
            LogicalKey::Backspace
        );
    }

    #[test]
    fn releases_are_ignored() {
        let mut event = key(KeyCode::Enter, KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(from_key_event(&event), LogicalKey::Unrecognized);
    }
}
