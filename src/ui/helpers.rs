use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::store::StoreError;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Column for the terminal cursor after `prefix` cells and the typed `text`,
/// held to the last column of `inner` when the text runs past it.
pub(crate) fn cursor_column(inner: Rect, prefix: usize, text: &str) -> u16 {
    let offset = u16::try_from(prefix.saturating_add(text.chars().count())).unwrap_or(u16::MAX);
    inner
        .x
        .saturating_add(offset)
        .min(inner.right().saturating_sub(1))
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Same as [`surface_error`] for failures coming back through the store.
pub(crate) fn surface_store_error(err: &StoreError) -> String {
    match err {
        StoreError::Backend(inner) => surface_error(inner),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn root_cause_wins_over_context() {
        let err = Err::<(), _>(anyhow!("UNIQUE constraint failed"))
            .context("failed to insert customer")
            .unwrap_err();
        assert_eq!(surface_error(&err), "UNIQUE constraint failed");
        assert_eq!(
            surface_store_error(&StoreError::Backend(err)),
            "UNIQUE constraint failed"
        );
    }

    #[test]
    fn cursor_column_follows_text_until_the_edge() {
        let inner = Rect::new(5, 2, 20, 1);
        assert_eq!(cursor_column(inner, 8, "abc"), 16);
        assert_eq!(cursor_column(inner, 8, ""), 13);
        assert_eq!(cursor_column(inner, 8, &"x".repeat(70_000)), 24);
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 30, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
        assert_eq!(popup.width, 60);
    }
}
