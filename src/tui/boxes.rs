use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use super::state::UiState;
use crate::render::{self, Cell, Mark, Transition};

pub fn mark_style(mark: Mark) -> Style {
    match mark {
        Mark::Plain => Style::default().fg(Color::White).bg(Color::DarkGray),
        Mark::Sorted => Style::default().fg(Color::Black).bg(Color::Green),
        Mark::Comparing => Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        Mark::Swapping => Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
    }
}

/// Connector drawn under one row of boxes: `╰───╯` between swapped boxes, `▲` under a write.
///
/// `start` is the index of the first box in the row, `len` the number of boxes in it,
/// and `width` the width of each box (boxes are separated by one space).
pub fn connector_line(start: usize, len: usize, width: usize, transition: Transition) -> String {
    let stride = width + 1;
    let centre = |idx: usize| (idx - start) * stride + width / 2;
    let in_row = |idx: usize| idx >= start && idx < start + len;
    let mut chars: Vec<char> = vec![' '; len * stride];

    match transition {
        Transition::None => {}
        Transition::Write(i) => {
            if in_row(i) {
                chars[centre(i)] = '▲';
            }
        }
        Transition::Swap(a, b) => {
            let lo = if in_row(a) {
                centre(a) + 1
            } else if a < start {
                0
            } else {
                chars.len()
            };
            let hi = if in_row(b) {
                centre(b)
            } else if b >= start + len {
                chars.len()
            } else {
                0
            };
            for c in chars.iter_mut().take(hi).skip(lo) {
                *c = '─';
            }
            if in_row(a) {
                chars[centre(a)] = '╰';
            }
            if in_row(b) {
                chars[centre(b)] = '╯';
            }
        }
    }
    chars.into_iter().collect::<String>().trim_end().to_string()
}

fn box_row(cells: &[Cell], width: usize) -> Line<'static> {
    let mut spans = Vec::with_capacity(cells.len() * 2);
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!("{:^width$}", cell.value, width = width),
            mark_style(cell.mark),
        ));
    }
    Line::from(spans)
}

/// Labeled boxes, wrapped over as many rows as the area needs.
pub fn draw_boxes(area: Rect, f: &mut Frame, state: &UiState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Array ({} values)", state.values.len()));
    let inner_width = area.width.saturating_sub(2) as usize;

    let cells = render::cells(&state.values, state.step.as_ref(), state.finished());
    let width = render::box_width(&state.values);
    let per_row = (inner_width / (width + 1)).max(1);

    let mut lines = Vec::new();
    for (row, chunk) in cells.chunks(per_row).enumerate() {
        let start = row * per_row;
        lines.push(box_row(chunk, width));
        lines.push(Line::from(Span::styled(
            connector_line(start, chunk.len(), width, state.transition),
            Style::default().fg(Color::Magenta),
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "(empty array)",
            Style::default().fg(Color::Gray),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Bar width and gap for `len` bars in `inner_width` columns; bars never go below one column.
fn bar_layout(len: usize, inner_width: u16) -> (u16, u16) {
    let n = len.max(1);
    let inner = usize::from(inner_width);
    let bar_gap = if inner >= n.saturating_mul(2) { 1 } else { 0 };
    let bar_width = (inner / n).saturating_sub(bar_gap).max(1);
    (u16::try_from(bar_width).unwrap_or(u16::MAX), bar_gap as u16)
}

/// Bar view of the same cells, heights proportional to value.
pub fn draw_bars(area: Rect, f: &mut Frame, state: &UiState) {
    let block = Block::default().borders(Borders::ALL).title("Bars");
    let (bar_width, bar_gap) = bar_layout(state.values.len(), area.width.saturating_sub(2));

    let cells = render::cells(&state.values, state.step.as_ref(), state.finished());
    let bars: Vec<Bar> = cells
        .iter()
        .map(|c| {
            let color = mark_style(c.mark).bg.unwrap_or(Color::DarkGray);
            Bar::default()
                .value(c.value.max(0) as u64)
                .text_value(String::new())
                .style(Style::default().fg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(bar_gap);
    f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_connector_spans_between_centres() {
        // width 4, stride 5: centres at 2, 7, 12
        let line = connector_line(0, 3, 4, Transition::Swap(0, 2));
        assert_eq!(line, "  ╰─────────╯");
    }

    #[test]
    fn write_marker_sits_under_its_box() {
        assert_eq!(connector_line(0, 3, 4, Transition::Write(1)), "       ▲");
        // box 1 lives in another row
        assert_eq!(connector_line(2, 3, 4, Transition::Write(1)), "");
    }

    #[test]
    fn swap_across_rows_runs_to_the_edge() {
        // row holds boxes 3..6; swap partner 1 is on the previous row
        let line = connector_line(3, 3, 4, Transition::Swap(1, 4));
        assert_eq!(line, "───────╯");
    }

    #[test]
    fn bar_layout_handles_any_length() {
        assert_eq!(bar_layout(0, 78), (77, 1));
        assert_eq!(bar_layout(20, 78), (2, 1));
        assert_eq!(bar_layout(50, 78), (1, 0));
        assert_eq!(bar_layout(65_536, 78), (1, 0));
        assert_eq!(bar_layout(usize::MAX, 0), (1, 0));
    }

    #[test]
    fn very_long_arrays_render_without_panicking() {
        use ratatui::{backend::TestBackend, Terminal};

        let state = UiState {
            values: vec![1; 65_536],
            ..Default::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| {
                draw_bars(f.area(), f, &state);
                draw_boxes(f.area(), f, &state);
            })
            .unwrap();
    }

    #[test]
    fn no_transition_draws_nothing() {
        assert_eq!(connector_line(0, 5, 4, Transition::None), "");
    }
}
