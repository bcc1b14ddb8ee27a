//! Select-plus rendering functions

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::{FocusState, LabelProjection, SelectPlusColors, SelectPlusLayout, SelectPlusState};
use crate::primitives::display_width::{char_width, fit_to_width, visual_column_at_byte};

/// Width of the raw value column, in cells (separator included)
pub const VALUE_COLUMN_WIDTH: usize = 7;

const CLEAR_GLYPH: &str = "×";
const SEARCH_GLYPH: &str = "Q";
const LOADING_TEXT: &str = "Loading...";
const NO_RESULTS_TEXT: &str = "No results";

/// Render a select-plus control
///
/// The first row of `area` holds the summary (closed) or the query input
/// (searching). While searching, the filtered options use the rows below.
///
/// # Arguments
/// * `frame` - The ratatui frame to render to
/// * `area` - Rectangle where the control should be rendered
/// * `state` - The control state
/// * `colors` - Colors for rendering
///
/// # Returns
/// Layout information for hit testing
pub fn render_select_plus(
    frame: &mut Frame,
    area: Rect,
    state: &SelectPlusState,
    colors: &SelectPlusColors,
) -> SelectPlusLayout {
    if area.height == 0 || area.width < 10 {
        return SelectPlusLayout::default();
    }

    if state.is_searching() {
        render_search(frame, area, state, colors)
    } else {
        render_summary(frame, area, state, colors)
    }
}

fn border_color(state: &SelectPlusState, colors: &SelectPlusColors) -> Color {
    match state.focus {
        FocusState::Normal => colors.border,
        FocusState::Focused | FocusState::Hovered => colors.focused,
        FocusState::Disabled => colors.disabled,
    }
}

/// Width of the value column for a row `inner` cells wide, 0 when hidden
fn value_column(state: &SelectPlusState, inner: usize) -> usize {
    if state.hide_value {
        0
    } else {
        VALUE_COLUMN_WIDTH.min(inner / 2)
    }
}

fn render_summary(
    frame: &mut Frame,
    area: Rect,
    state: &SelectPlusState,
    colors: &SelectPlusColors,
) -> SelectPlusLayout {
    let border = Style::default().fg(border_color(state, colors));
    let disabled = state.focus == FocusState::Disabled;
    let text_style = |color: Color| {
        Style::default().fg(if disabled { colors.disabled } else { color })
    };
    let placeholder_style = text_style(colors.placeholder).add_modifier(Modifier::ITALIC);

    let inner = area.width.saturating_sub(2) as usize;
    let line_area = Rect::new(area.x, area.y, area.width, 1);
    let mut spans = vec![Span::styled("[", border)];
    let mut clear_button = None;

    match state.label_projection() {
        LabelProjection::Placeholder(placeholder) => {
            spans.push(Span::styled(format!("{SEARCH_GLYPH} "), text_style(colors.border)));
            spans.push(Span::styled(
                fit_to_width(placeholder, inner.saturating_sub(2)),
                placeholder_style,
            ));
        }
        projection => {
            let value_cols = value_column(state, inner);
            if value_cols > 0 {
                spans.push(Span::styled(
                    format!("{} ", fit_to_width(state.value(), value_cols - 1)),
                    text_style(colors.value),
                ));
            }
            let label_width = inner.saturating_sub(value_cols + 2);
            let label = match projection {
                LabelProjection::Label(label) => {
                    Span::styled(fit_to_width(label, label_width), text_style(colors.label))
                }
                _ => Span::styled(fit_to_width(LOADING_TEXT, label_width), placeholder_style),
            };
            spans.push(label);
            spans.push(Span::raw(" "));
            spans.push(Span::styled(CLEAR_GLYPH, text_style(colors.clear)));
            // The glyph sits in the last inner column
            clear_button = Some(Rect::new(area.x + inner as u16, area.y, 1, 1));
        }
    }
    spans.push(Span::styled("]", border));

    frame.render_widget(Paragraph::new(Line::from(spans)), line_area);

    SelectPlusLayout {
        summary_area: line_area,
        clear_button,
        full_area: line_area,
        ..Default::default()
    }
}

fn render_search(
    frame: &mut Frame,
    area: Rect,
    state: &SelectPlusState,
    colors: &SelectPlusColors,
) -> SelectPlusLayout {
    let border = Style::default().fg(border_color(state, colors));
    let line_area = Rect::new(area.x, area.y, area.width, 1);
    let inner = area.width.saturating_sub(2) as usize;

    let (query_text, cursor, focused, all_selected) = match state.query_input() {
        Some(q) => (q.text(), q.cursor(), q.is_focused(), q.is_all_selected()),
        None => ("", 0, false, false),
    };

    // Keep the cursor in view, leaving a cell for it past the end of the text
    let cursor_visual = visual_column_at_byte(query_text, cursor);
    let scroll_visual = cursor_visual.saturating_sub(inner.saturating_sub(1));
    let visible = query_window(query_text, scroll_visual, inner);

    let text_style = if all_selected {
        Style::default()
            .fg(colors.label)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().fg(colors.label)
    };
    let line = Line::from(vec![
        Span::styled("[", border),
        Span::styled(fit_to_width(&visible, inner), text_style),
        Span::styled("]", border),
    ]);
    frame.render_widget(Paragraph::new(line), line_area);

    let cursor_pos = if focused && !all_selected {
        let cursor_x = area.x + 1 + (cursor_visual - scroll_visual) as u16;
        if cursor_x < area.x + 1 + inner as u16 {
            let under = query_text[cursor.min(query_text.len())..]
                .chars()
                .next()
                .unwrap_or(' ');
            let cursor_span = Span::styled(
                under.to_string(),
                Style::default()
                    .fg(colors.cursor)
                    .add_modifier(Modifier::REVERSED),
            );
            frame.render_widget(
                Paragraph::new(Line::from(cursor_span)),
                Rect::new(cursor_x, area.y, 1, 1),
            );
            Some((cursor_x, area.y))
        } else {
            None
        }
    } else {
        None
    };

    let available = area.height.saturating_sub(1) as usize;
    let filtered = state.filtered_indices();
    let mut option_areas = Vec::new();
    let mut option_indices = Vec::new();
    let mut rows_drawn = 0;
    let mut scroll_offset = 0;

    if available > 0 && state.shows_no_results() {
        let row_area = Rect::new(area.x, area.y + 1, area.width, 1);
        let text = fit_to_width(&format!(" {NO_RESULTS_TEXT}"), area.width as usize);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                text,
                Style::default()
                    .fg(colors.placeholder)
                    .add_modifier(Modifier::ITALIC),
            ))),
            row_area,
        );
        rows_drawn = 1;
    } else if available > 0 && !filtered.is_empty() {
        let rows_to_show = filtered.len().min(available);
        let needs_scrollbar = filtered.len() > available;
        let scrollbar_width: u16 = if needs_scrollbar { 1 } else { 0 };
        let row_width = area.width.saturating_sub(scrollbar_width);
        scroll_offset = state
            .scroll_offset
            .min(filtered.len().saturating_sub(rows_to_show));
        let highlighted = state.highlighted();
        let label_space = (row_width as usize).saturating_sub(1);
        let value_cols = value_column(state, label_space);

        for (i, &index) in filtered
            .iter()
            .skip(scroll_offset)
            .take(rows_to_show)
            .enumerate()
        {
            let row = scroll_offset + i;
            let Some(option) = state.options().get(index) else {
                continue;
            };
            let row_area = Rect::new(area.x, area.y + 1 + i as u16, row_width, 1);

            let bg = if highlighted == Some(row) {
                colors.highlight_bg
            } else if state.hover_index == Some(row) {
                colors.hover_bg
            } else {
                Color::Reset
            };

            let mut spans = vec![Span::styled(" ", Style::default().bg(bg))];
            if value_cols > 0 {
                spans.push(Span::styled(
                    format!("{} ", fit_to_width(&option.value, value_cols - 1)),
                    Style::default().fg(colors.value).bg(bg),
                ));
            }
            spans.push(Span::styled(
                fit_to_width(&option.label, label_space.saturating_sub(value_cols)),
                Style::default().fg(colors.label).bg(bg),
            ));
            frame.render_widget(Paragraph::new(Line::from(spans)), row_area);

            option_areas.push(row_area);
            option_indices.push(index);
        }
        rows_drawn = rows_to_show;

        if needs_scrollbar {
            let scrollbar_x = area.x + row_width;
            let max_offset = filtered.len().saturating_sub(rows_to_show);
            let thumb_size = ((rows_to_show as f32 / filtered.len() as f32) * available as f32)
                .max(1.0) as usize;
            let thumb_pos = if max_offset > 0 {
                ((scroll_offset as f32 / max_offset as f32)
                    * available.saturating_sub(thumb_size) as f32) as usize
            } else {
                0
            };
            for i in 0..available {
                let glyph = if i >= thumb_pos && i < thumb_pos + thumb_size {
                    "█"
                } else {
                    "░"
                };
                frame.render_widget(
                    Paragraph::new(Line::from(Span::styled(
                        glyph,
                        Style::default().fg(colors.border),
                    ))),
                    Rect::new(scrollbar_x, area.y + 1 + i as u16, 1, 1),
                );
            }
        }
    }

    SelectPlusLayout {
        summary_area: line_area,
        clear_button: None,
        option_areas,
        option_indices,
        visible_rows: available,
        scroll_offset,
        cursor_pos,
        full_area: Rect::new(area.x, area.y, area.width, 1 + rows_drawn as u16),
    }
}

/// The part of `text` visible from column `scroll` in a `width`-cell window
///
/// A wide character cut by the left edge is replaced by padding so the
/// remaining text keeps its columns.
fn query_window(text: &str, scroll: usize, width: usize) -> String {
    let mut visible = String::new();
    let mut column = 0;
    for ch in text.chars() {
        let w = char_width(ch);
        if column + w <= scroll {
            column += w;
            continue;
        }
        if column + w - scroll > width {
            break;
        }
        if column < scroll {
            visible.extend(std::iter::repeat(' ').take(column + w - scroll));
        } else {
            visible.push(ch);
        }
        column += w;
    }
    visible
}
