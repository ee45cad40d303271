use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn keybind(keys: &[&'static str], what: &'static str) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    let mut used = 0;
    for (i, k) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" / "));
            used += 3;
        }
        spans.push(Span::styled(*k, Style::default().fg(Color::Magenta)));
        used += k.chars().count();
    }
    spans.push(Span::raw(" ".repeat(14usize.saturating_sub(used))));
    spans.push(Span::raw(what));
    Line::from(spans)
}

fn legend(label: &'static str, bg: Color, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!(" {label:^8} "),
            Style::default().fg(Color::Black).bg(bg),
        ),
        Span::raw("  "),
        Span::raw(what),
    ])
}

fn help_lines() -> Vec<Line<'static>> {
    vec![
        Line::from("Keybinds:"),
        keybind(&["q", "Ctrl-C"], "Quit"),
        keybind(&["s", "Enter"], "Start sorting"),
        keybind(&["x", "Esc"], "Stop sorting"),
        keybind(&["g"], "Generate a new array"),
        keybind(&["a", "A"], "Next / previous algorithm"),
        keybind(&["1-5"], "Pick algorithm (bubble, selection, insertion, merge, quick)"),
        keybind(&["←", "→"], "Slower / faster"),
        keybind(&["-", "+"], "Fewer / more elements"),
        keybind(&["tab"], "Switch tabs"),
        keybind(&["?"], "Show this help"),
        Line::from(""),
        Line::from("Algorithm, speed and size are locked while a sort is running."),
        Line::from("g stops the running sort first, then generates a new array."),
        Line::from(""),
        Line::from("Colors:"),
        legend("compare", Color::Yellow, "Elements being compared"),
        legend("swap", Color::Red, "Elements being swapped or written"),
        legend("sorted", Color::Green, "Elements in their final position"),
    ]
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(help_lines())
        .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text() -> Vec<String> {
        help_lines().iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn generate_is_described_as_stopping_the_run() {
        let lines = text();
        assert!(lines.iter().any(|l| l.contains("g stops the running sort first")));
        assert!(!lines.iter().any(|l| l.contains("new arrays are locked")));
    }

    #[test]
    fn keybinds_line_up() {
        let lines = text();
        let start = lines.iter().find(|l| l.ends_with("Start sorting")).cloned();
        assert_eq!(start.as_deref(), Some("  s / Enter     Start sorting"));
    }
}
