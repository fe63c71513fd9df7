//! Stateless painting of the session. Every function here reads the session
//! and draws; none of them mutate it, so the controller can be driven and
//! tested without a terminal.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::models::{Entity, Record};

use super::app::{SessionState, StatusKind, View, MAIN_MENU};
use super::forms::steps_for;
use super::helpers::{centered_rect, cursor_column};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the search bar above each list.
const SEARCH_BAR_HEIGHT: u16 = 3;
const SEARCH_PROMPT: &str = "Search: ";

pub fn draw(frame: &mut Frame, state: &SessionState) {
    let area = frame.area();
    let footer_height = FOOTER_HEIGHT.min(area.height);

    let (content_area, footer_area) = if area.height > footer_height {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
            .split(area);
        (chunks[0], chunks[1])
    } else {
        (area, area)
    };

    match state.view {
        View::Main => draw_main_menu(frame, content_area, state),
        View::CustomerList => draw_list(frame, content_area, state, Entity::Customer),
        View::ProductList => draw_list(frame, content_area, state, Entity::Product),
        View::CustomerForm => draw_form(frame, content_area, state, Entity::Customer, true),
        View::ProductForm => draw_form(frame, content_area, state, Entity::Product, true),
        View::ConfirmAction => {
            if let Some(entity) = state.previous_view.and_then(View::form_entity) {
                draw_form(frame, content_area, state, entity, false);
            }
            draw_confirm(frame, area, state);
        }
        View::Message => draw_message(frame, area, state),
        View::Stats => draw_stats(frame, content_area, state),
    }

    if area.height >= footer_height {
        draw_footer(frame, footer_area, state);
    }
}

fn draw_main_menu(frame: &mut Frame, area: Rect, state: &SessionState) {
    let popup_area = centered_rect(40, 50, area);
    let items: Vec<ListItem> = MAIN_MENU.iter().map(|entry| ListItem::new(*entry)).collect();

    let list = List::new(items)
        .block(Block::default().title("Records").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_index));
    frame.render_stateful_widget(list, popup_area, &mut list_state);
}

fn draw_list(frame: &mut Frame, area: Rect, state: &SessionState, entity: Entity) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(SEARCH_BAR_HEIGHT), Constraint::Min(0)])
        .split(area);

    draw_search_bar(frame, chunks[0], state);

    let records = state.filtered_records();
    let title = format!(
        "{} ({} of {})",
        entity.plural(),
        records.len(),
        state.records.len()
    );
    let block = Block::default().title(title).borders(Borders::ALL);

    if records.is_empty() {
        let text = if state.search_filter.is_empty() {
            format!(
                "No {} yet. Press Ctrl+N to add one.",
                entity.plural().to_lowercase()
            )
        } else {
            "No matching records.".to_string()
        };
        let message = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(message, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = records
        .iter()
        .map(|record| ListItem::new(record_row(record)))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow))
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_index));
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn record_row(record: &Record) -> String {
    match record {
        Record::Customer(customer) => format!(
            "{:<28} {:<16} {}",
            customer.name, customer.phone, customer.national_id
        ),
        Record::Product(product) => format!(
            "{:<12} {:<32} {:<16} {:>10.2}",
            product.code, product.detail, product.barcode, product.price
        ),
    }
}

fn draw_search_bar(frame: &mut Frame, area: Rect, state: &SessionState) {
    let block = Block::default().borders(Borders::ALL).title("Search");

    let line = if state.is_searching {
        Line::from(vec![
            Span::raw(SEARCH_PROMPT),
            Span::styled(
                state.input_buffer.clone(),
                Style::default().fg(Color::Yellow),
            ),
        ])
    } else if state.search_filter.is_empty() {
        Line::from(Span::styled(
            "Start typing to search",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::raw("Filter: "),
            Span::styled(state.search_filter.clone(), Style::default().fg(Color::Cyan)),
        ])
    };

    let paragraph = Paragraph::new(line).block(block.clone());
    frame.render_widget(paragraph, area);

    if state.is_searching {
        let inner = block.inner(area);
        let cursor_x = cursor_column(inner, SEARCH_PROMPT.len(), &state.input_buffer);
        frame.set_cursor_position((cursor_x, inner.y));
    }
}

/// Paint every step of the form. The current step shows the live buffer, the
/// others show what has been committed so far.
fn draw_form(frame: &mut Frame, area: Rect, state: &SessionState, entity: Entity, focused: bool) {
    let title = match state.editing_id {
        Some(id) => format!("Edit {entity} #{id}"),
        None => format!("New {entity}"),
    };
    let popup_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default().title(title).borders(Borders::ALL);
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let steps = steps_for(entity);
    let label_width = steps
        .iter()
        .map(|step| step.label.chars().count())
        .max()
        .unwrap_or(0)
        + 2;

    let mut lines = Vec::with_capacity(steps.len() + 2);
    for (index, step) in steps.iter().enumerate() {
        let is_current = index == state.form_step;
        let value = if is_current {
            state.input_buffer.clone()
        } else {
            state
                .form_data
                .get(step.field)
                .map(|value| value.to_string())
                .unwrap_or_default()
        };

        let marker = if is_current { "▶ " } else { "  " };
        let required = if step.required { "*" } else { " " };
        let label = format!("{marker}{:<label_width$}{required} ", step.label);

        let (display, style) = if is_current {
            (value, Style::default().fg(Color::Yellow))
        } else if value.is_empty() {
            let placeholder = if step.required {
                "<required>"
            } else {
                "<optional>"
            };
            (placeholder.to_string(), Style::default().fg(Color::DarkGray))
        } else {
            (value, Style::default())
        };

        lines.push(Line::from(vec![Span::raw(label), Span::styled(display, style)]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "* marks required fields",
        Style::default().fg(Color::Gray),
    )));

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);

    if focused {
        // marker + label column + required flag + space
        let prefix = 2 + label_width + 2;
        let cursor_x = cursor_column(inner, prefix, &state.input_buffer);
        let cursor_y = inner
            .y
            .saturating_add(u16::try_from(state.form_step).unwrap_or(u16::MAX))
            .min(inner.bottom().saturating_sub(1));
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

fn draw_confirm(frame: &mut Frame, area: Rect, state: &SessionState) {
    let popup_area = centered_rect(50, 30, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default().title("Confirm").borders(Borders::ALL);
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let mut option_spans = Vec::new();
    for (idx, label) in ["No", "Yes"].iter().enumerate() {
        if idx > 0 {
            option_spans.push(Span::raw("   "));
        }
        let style = if state.confirm_index.index() == idx {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        option_spans.push(Span::styled(format!("[ {label} ]"), style));
    }

    let lines = vec![
        Line::from(state.confirm_message.clone()),
        Line::from(""),
        Line::from(option_spans),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

fn draw_message(frame: &mut Frame, area: Rect, state: &SessionState) {
    let Some(message) = &state.message else {
        return;
    };
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);

    let title = match message.kind {
        StatusKind::Info => "Done",
        StatusKind::Error => "Error",
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.text.clone(),
        message.kind.style(),
    )))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(paragraph, popup_area);
}

fn draw_stats(frame: &mut Frame, area: Rect, state: &SessionState) {
    let popup_area = centered_rect(40, 40, area);

    let lines: Vec<Line> = state
        .stats
        .iter()
        .map(|(entity, count)| {
            let value = match count {
                Some(count) => Span::styled(
                    count.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                None => Span::styled("unavailable", Style::default().fg(Color::Red)),
            };
            Line::from(vec![Span::raw(format!("{:<12}", entity.plural())), value])
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Statistics").borders(Borders::ALL));
    frame.render_widget(paragraph, popup_area);
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &SessionState) {
    let block = Block::default().borders(Borders::TOP);
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let status_line = if let Some(status) = &state.status {
        Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
    } else {
        Line::from("")
    };

    let paragraph =
        Paragraph::new(vec![status_line, footer_instructions(state)]).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

fn footer_instructions(state: &SessionState) -> Line<'static> {
    let hints: &[(&'static str, &'static str)] = match state.view {
        View::Main => &[("[↑↓]", "Navigate"), ("[Enter]", "Open"), ("[Esc]", "Quit")],
        View::CustomerList | View::ProductList if state.is_searching => &[
            ("[type]", "Filter"),
            ("[Enter]", "Keep filter"),
            ("[Esc]", "Clear"),
        ],
        View::CustomerList | View::ProductList => &[
            ("[↑↓]", "Navigate"),
            ("[Enter]", "Edit"),
            ("[Ctrl+N]", "New"),
            ("[type]", "Search"),
            ("[Esc]", "Back"),
        ],
        View::CustomerForm | View::ProductForm => &[
            ("[Tab/Enter]", "Next"),
            ("[↑]", "Previous"),
            ("[Ctrl+S]", "Save"),
            ("[Ctrl+D]", "Delete"),
            ("[Esc]", "Cancel"),
        ],
        View::ConfirmAction => &[("[←→]", "Choose"), ("[Enter]", "Confirm"), ("[Esc]", "Back")],
        View::Message | View::Stats => &[("[Ctrl+C]", "Quit")],
    };

    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::raw(format!(" {action}   ")));
    }
    Line::from(spans)
}
