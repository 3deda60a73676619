use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Row, Table, Wrap},
    Frame,
};
use tasklist_core::{Priority, TaskRepository};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, InputMode, MessageKind};

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

fn rounded(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}

pub fn draw<R: TaskRepository>(f: &mut Frame, app: &mut App<R>) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Message
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let header = Paragraph::new("TASKLIST")
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(main_chunks[1]);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Options
            Constraint::Length(5), // Statistics
            Constraint::Min(3),    // Detail
        ])
        .split(content_chunks[1]);

    draw_task_list(f, app, content_chunks[0]);
    draw_options(f, app, side_chunks[0]);
    draw_stats(f, app, side_chunks[1]);
    draw_detail_view(f, app, side_chunks[2]);
    draw_message(f, app, main_chunks[2]);

    let help = match app.input_mode {
        InputMode::Normal => {
            "j/k: Move | space: Done | a: Add | e: Edit | d: Delete | f: Filter | s: Sort | q: Quit"
        }
        InputMode::Adding | InputMode::Editing => {
            "Enter: Save | Esc: Cancel | keys: due:<date> pri:<high|medium|low>"
        }
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);

    if app.input_mode != InputMode::Normal {
        draw_input(f, app, content_chunks[0]);
    }
}

fn draw_task_list<R: TaskRepository>(f: &mut Frame, app: &mut App<R>, area: Rect) {
    let title = format!(" Tasks ({}) ", app.visible.len());

    if app.visible.is_empty() {
        let empty = Paragraph::new("No tasks found matching your criteria!")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(rounded(&title));
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = app
        .visible
        .iter()
        .map(|task| {
            let check = if task.completed { "[x]" } else { "[ ]" };
            let pri_style = Style::default().fg(priority_color(task.priority));
            let due_str = task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            let desc_style = if task.completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            Row::new(vec![
                Span::raw(check),
                Span::styled(task.priority.as_str(), pri_style),
                Span::raw(due_str),
                Span::styled(task.description.clone(), desc_style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),  // Done
            Constraint::Length(6),  // Priority
            Constraint::Length(10), // Due
            Constraint::Min(10),    // Description
        ],
    )
    .header(
        Row::new(vec!["", "Pri", "Due", "Task"]).style(Style::default().fg(Color::Yellow)),
    )
    .block(rounded(&title))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_options<R: TaskRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let label = Style::default().fg(Color::Blue);
    let text = vec![
        Line::from(vec![
            Span::styled("Filter: ", label),
            Span::raw(app.filter.label()),
        ]),
        Line::from(vec![
            Span::styled("Sort:   ", label),
            Span::raw(app.sort.label()),
        ]),
    ];
    f.render_widget(Paragraph::new(text).block(rounded(" Options ")), area);
}

fn draw_stats<R: TaskRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let stats = app.stats();
    let block = rounded(" Statistics ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let counts = Line::from(vec![
        Span::styled("Pending: ", Style::default().fg(Color::Blue)),
        Span::raw(stats.pending.to_string()),
        Span::raw("   "),
        Span::styled("Done: ", Style::default().fg(Color::Blue)),
        Span::raw(stats.completed.to_string()),
    ]);
    f.render_widget(Paragraph::new(counts), rows[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(stats.progress())
        .label(format!("{:.0}%", stats.progress() * 100.0));
    f.render_widget(gauge, rows[1]);
}

fn draw_detail_view<R: TaskRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let Some(task) = app.selected_task() else {
        f.render_widget(rounded(" Detail "), area);
        return;
    };

    let label = Style::default().fg(Color::Blue);
    let detail_text = vec![
        Line::from(Span::styled(
            task.description.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("ID: ", Style::default().fg(Color::DarkGray)),
            Span::raw(task.id.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Status: ", label),
            Span::raw(if task.completed { "Completed" } else { "Pending" }),
        ]),
        Line::from(vec![
            Span::styled("Priority: ", label),
            Span::styled(
                task.priority.as_str(),
                Style::default().fg(priority_color(task.priority)),
            ),
        ]),
        Line::from(vec![
            Span::styled("Due: ", label),
            Span::raw(
                task.due_date
                    .map(|d| d.format("%Y-%m-%d (%a)").to_string())
                    .unwrap_or_else(|| "None".to_string()),
            ),
        ]),
        Line::from(vec![
            Span::styled("Created: ", label),
            Span::raw(task.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]),
    ];

    let detail_block = Paragraph::new(detail_text)
        .block(rounded(" Detail "))
        .wrap(Wrap { trim: true });
    f.render_widget(detail_block, area);
}

fn draw_message<R: TaskRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let Some(message) = &app.message else {
        return;
    };
    let color = match message.kind {
        MessageKind::Info => Color::Green,
        MessageKind::Error => Color::Red,
    };
    let line = Paragraph::new(message.text.as_str()).style(Style::default().fg(color));
    f.render_widget(line, area);
}

fn draw_input<R: TaskRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let title = match app.input_mode {
        InputMode::Editing => " Edit Task ",
        _ => " Add New Task ",
    };
    let height = 3.min(area.height);
    let popup = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(height),
        width: area.width,
        height,
    };

    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(rounded(title));
    f.render_widget(Clear, popup);
    f.render_widget(input, popup);

    let before_cursor: String = app.input.chars().take(app.cursor_position).collect();
    let offset = u16::try_from(before_cursor.width()).unwrap_or(u16::MAX);
    let max_x = popup.x + popup.width.saturating_sub(2);
    f.set_cursor_position((popup.x.saturating_add(1).saturating_add(offset).min(max_x), popup.y + 1));
}
