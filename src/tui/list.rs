use crate::app::{
    AppState, ItemKind, ResolvedItem, RunStatus, SuiteResult, TestCase, TestRunDetail,
    TestRunSummary, TestStatus,
};
use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let narrow = area.width < crate::app::NARROW_WIDTH_THRESHOLD;
    let inner_width = area.width.saturating_sub(2) as usize;

    // First page in flight: full-screen spinner
    if state.initial_loading && state.runs.is_empty() {
        let line = Line::from(vec![
            Span::styled(
                format!("{} ", crate::tui::spinner::frame(state.spinner_frame)),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled("Loading test runs…", Style::default().fg(Color::DarkGray)),
        ]);
        let para = Paragraph::new(line).centered();
        let centered = Rect {
            x: area.x,
            y: area.y + area.height / 2,
            width: area.width,
            height: 1.min(area.height),
        };
        f.render_widget(para, centered);
        return;
    }

    if state.items.is_empty() && !state.is_loading() {
        let para = Paragraph::new("No test runs found")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::NONE));
        f.render_widget(para, area);
        return;
    }

    // Visible window (scroll follows the cursor)
    let visible_height = area.height as usize;
    let scroll_offset = if state.cursor >= visible_height {
        state.cursor - visible_height + 1
    } else {
        0
    };

    // Visual run index for quick-select labels
    let mut run_visual_idx: std::collections::HashMap<usize, usize> =
        std::collections::HashMap::new();
    let mut visual = 0;
    for item in &state.items {
        if item.kind == ItemKind::Run {
            run_visual_idx.insert(item.run_idx, visual);
            visual += 1;
        }
    }

    let mut lines: Vec<Line> = Vec::new();

    for (i, item) in state
        .items
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_height)
    {
        let is_selected = i == state.cursor;
        let line = match state.resolve_item(item) {
            Some(ResolvedItem::Run(run)) => {
                let vis_idx = run_visual_idx.get(&item.run_idx).copied().unwrap_or(0);
                let expanded = state.details.contains_key(&run.id);
                render_run_line(run, vis_idx, is_selected, expanded, narrow, inner_width)
            }
            Some(ResolvedItem::DetailLoading) => {
                render_loading_line(state.spinner_frame, is_selected)
            }
            Some(ResolvedItem::DetailError(message)) => render_error_line(message, is_selected),
            Some(ResolvedItem::DetailSummary(detail)) => render_summary_line(detail, is_selected),
            Some(ResolvedItem::Suite(suite)) => render_suite_line(suite, is_selected, inner_width),
            Some(ResolvedItem::Test(test)) => {
                render_test_line(test, is_selected, narrow, inner_width)
            }
            None => Line::raw(""),
        };
        lines.push(line);
    }

    if state.loading_more && lines.len() < visible_height {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {} ", crate::tui::spinner::frame(state.spinner_frame)),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled("Loading more…", Style::default().fg(Color::DarkGray)),
        ]));
    }

    let list = Paragraph::new(lines).block(Block::default().borders(Borders::NONE));
    f.render_widget(list, area);
}

fn run_status_icon(status: RunStatus) -> (&'static str, Color) {
    match status {
        RunStatus::Passed => ("✓", Color::Green),
        RunStatus::Failed => ("✗", Color::Red),
        RunStatus::Completed => ("●", Color::Cyan),
        RunStatus::Unknown => ("·", Color::DarkGray),
    }
}

fn test_status_icon(status: TestStatus) -> (&'static str, Color) {
    match status {
        TestStatus::Passed => ("✓", Color::Green),
        TestStatus::Failed => ("✗", Color::Red),
        TestStatus::Skipped => ("⊘", Color::DarkGray),
        TestStatus::Blocked => ("⊘", Color::Yellow),
        TestStatus::Unknown => ("·", Color::DarkGray),
    }
}

fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(then).num_seconds().max(0);
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86400)
    }
}

fn format_millis(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let secs = ms / 1000;
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for c in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + cw + 1 > max_width {
            result.push('…');
            break;
        }
        result.push(c);
        width += cw;
    }
    result
}

fn select_style(is_selected: bool) -> Style {
    if is_selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

fn render_run_line(
    run: &TestRunSummary,
    visual_idx: usize,
    is_selected: bool,
    expanded: bool,
    narrow: bool,
    max_width: usize,
) -> Line<'static> {
    let (icon, icon_color) = run_status_icon(run.status);
    let arrow = if expanded { "▼" } else { "▶" };
    let idx_label = if visual_idx < crate::app::QUICK_SELECT_MAX {
        format!("{}", visual_idx + 1)
    } else {
        " ".to_string()
    };

    let counts = if narrow {
        format!("{}✓ {}✗", run.results.passed, run.results.failed)
    } else {
        let mut s = format!("{}✓ {}✗", run.results.passed, run.results.failed);
        if run.results.skipped > 0 {
            s.push_str(&format!(" {}⊘", run.results.skipped));
        }
        if run.results.blocked > 0 {
            s.push_str(&format!(" {}⊘b", run.results.blocked));
        }
        s
    };

    let when = run
        .end_time
        .or(run.start_time)
        .map(|t| format_relative(t, Utc::now()))
        .unwrap_or_default();

    let prefix_width = 1 + UnicodeWidthStr::width(arrow) + 1 + UnicodeWidthStr::width(icon) + 1;
    let suffix_width = UnicodeWidthStr::width(counts.as_str())
        + if narrow || when.is_empty() { 0 } else { when.len() + 1 }
        + 2;
    let project_max = max_width.saturating_sub(prefix_width + suffix_width + 2);
    let project = truncate(&run.project, project_max);

    let mut spans = vec![
        Span::styled(
            format!("{}{} {} ", idx_label, arrow, icon),
            Style::default().fg(icon_color),
        ),
        Span::styled(project, select_style(is_selected)),
        Span::styled(format!("  {}", counts), Style::default().fg(Color::DarkGray)),
    ];

    if !narrow && !when.is_empty() {
        spans.push(Span::styled(
            format!(" {}", when),
            Style::default().fg(Color::DarkGray),
        ));
    }

    Line::from(spans)
}

fn render_summary_line(detail: &TestRunDetail, is_selected: bool) -> Line<'static> {
    let rate = detail
        .results
        .success_rate()
        .map_or_else(|| "—".to_string(), |r| format!("{}%", r));
    Line::from(vec![
        Span::raw("    "),
        Span::styled("duration ", Style::default().fg(Color::DarkGray)),
        Span::styled(format_millis(detail.duration), select_style(is_selected)),
        Span::styled(" · success ", Style::default().fg(Color::DarkGray)),
        Span::styled(rate, select_style(is_selected).fg(Color::Cyan)),
    ])
}

fn render_suite_line(suite: &SuiteResult, is_selected: bool, max_width: usize) -> Line<'static> {
    let name = truncate(&suite.name, max_width.saturating_sub(6));
    Line::from(vec![
        Span::raw("    "),
        Span::styled(
            name,
            select_style(is_selected)
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({})", suite.tests.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn render_test_line(
    test: &TestCase,
    is_selected: bool,
    narrow: bool,
    max_width: usize,
) -> Line<'static> {
    let (icon, icon_color) = test_status_icon(test.status);

    let prefix = format!("      {} ", icon);
    let prefix_width = UnicodeWidthStr::width(prefix.as_str());
    let browser = if narrow || test.browser.is_empty() {
        String::new()
    } else {
        format!(" [{}]", test.browser)
    };
    let duration = if test.duration > 0 {
        format!(" {}", format_millis(test.duration))
    } else {
        String::new()
    };
    let suffix_width = browser.len() + duration.len();
    let title_max = max_width.saturating_sub(prefix_width + suffix_width);
    let title = truncate(&test.title, title_max);

    let mut spans = vec![
        Span::styled(prefix, Style::default().fg(icon_color)),
        Span::styled(title, select_style(is_selected)),
    ];
    if !browser.is_empty() {
        spans.push(Span::styled(browser, Style::default().fg(Color::Blue)));
    }
    if !duration.is_empty() {
        spans.push(Span::styled(duration, Style::default().fg(Color::DarkGray)));
    }
    if let Some(error) = &test.error {
        let used: usize = spans.iter().map(ratatui::text::Span::width).sum();
        let error_max = max_width.saturating_sub(used + 3);
        if error_max > 3 {
            spans.push(Span::styled(
                format!("  {}", truncate(error, error_max)),
                Style::default().fg(Color::Red),
            ));
        }
    }

    Line::from(spans)
}

fn render_loading_line(spinner_frame: usize, is_selected: bool) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("    {} ", crate::tui::spinner::frame(spinner_frame)),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled("Loading…", select_style(is_selected).fg(Color::DarkGray)),
    ])
}

fn render_error_line(message: &str, is_selected: bool) -> Line<'static> {
    Line::from(vec![
        Span::styled("    ✗ ", Style::default().fg(Color::Red)),
        Span::styled(message.to_string(), select_style(is_selected).fg(Color::Red)),
    ])
}
