use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use super::app::{App, NotificationKind, Screen};
use crate::api::ExpenseStore;
use crate::models::form::FormField;

pub fn draw<S: ExpenseStore>(f: &mut Frame, app: &App<S>) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(size);

    match app.screen {
        Screen::CreateExpense => render_create_form(f, app, chunks[0]),
        Screen::ExpenseList => render_expense_list(f, app, chunks[0]),
    }
    render_help_panel(f, app, chunks[1]);

    if app.edit.is_some() {
        render_edit_modal(f, app, size);
    }

    // Always on top
    if app.notification.is_some() {
        render_notification(f, app, size);
    }
    if app.is_busy() {
        render_busy(f, app, size);
    }
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border)
}

fn render_fields<'a>(
    f: &mut Frame,
    area: Rect,
    focus: FormField,
    value_of: impl Fn(FormField) -> &'a str,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    for (i, field) in FormField::all().into_iter().enumerate() {
        let value = value_of(field);
        let focused = field == focus;
        let line = if value.is_empty() {
            Line::from(field.placeholder()).style(Style::default().fg(Color::DarkGray))
        } else {
            Line::from(value)
        };
        f.render_widget(Paragraph::new(line).block(field_block(field.label(), focused)), rows[i]);

        if focused {
            let width = value.chars().count() as u16;
            let x = (rows[i].x + 1 + width).min(rows[i].right().saturating_sub(2));
            f.set_cursor(x, rows[i].y + 1);
        }
    }
}

pub fn render_create_form<S: ExpenseStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let block = Block::default()
        .title("New Expense")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let form = &app.form;
    render_fields(f, inner, app.form_focus, move |field| form.field(field));
}

pub fn render_expense_list<S: ExpenseStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let total = Paragraph::new(Line::from(vec![
        Span::raw("Total this month: "),
        Span::styled(
            app.month_total(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(total, chunks[0]);

    let items: Vec<ListItem> = app.expenses.iter().map(|e| e.to_list_item()).collect();

    let list = List::new(items)
        .block(Block::default()
            .title(format!("Expenses ({})", app.expenses.len()))
            .borders(Borders::ALL))
        .highlight_style(Style::default()
            .add_modifier(Modifier::REVERSED)
            .add_modifier(Modifier::BOLD))
        .highlight_symbol("➤ ");

    f.render_stateful_widget(list, chunks[1], &mut app.list_state.clone());
}

pub fn render_edit_modal<S: ExpenseStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let Some(edit) = app.edit.as_ref() else {
        return;
    };

    let popup_area = centered_rect(60, 70, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title("Edit Expense (Enter to save, Esc to cancel)")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    render_fields(f, inner, app.edit_focus, move |field| edit.field(field));
}

pub fn render_notification<S: ExpenseStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let Some(notification) = app.notification.as_ref() else {
        return;
    };

    let color = match notification.kind {
        NotificationKind::Success => Color::Green,
        NotificationKind::Error => Color::Red,
    };

    let text = vec![
        Line::from(notification.message.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" ok"),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default()
            .title(notification.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    let popup_area = centered_rect(50, 20, area);
    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}

pub fn render_busy<S: ExpenseStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let Some(action) = app.pending else {
        return;
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(
        action.busy_label(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow)))
    .alignment(Alignment::Center);

    let popup_area = centered_rect(40, 10, area);
    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}

fn key_hints(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (i, (key, action)) in hints.iter().enumerate() {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        let sep = if i + 1 == hints.len() { "" } else { " • " };
        spans.push(Span::raw(format!(" {}{}", action, sep)));
    }
    Line::from(spans)
}

pub fn render_help_panel<S: ExpenseStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let line = if app.edit.is_some() {
        key_hints(&[("Tab/↑↓", "Field"), ("Enter", "Save"), ("Esc", "Cancel")])
    } else {
        match app.screen {
            Screen::CreateExpense => key_hints(&[
                ("Tab/↑↓", "Field"),
                ("Enter", "Record expense"),
                ("Esc", "View all expenses"),
                ("Ctrl+C", "Quit"),
            ]),
            Screen::ExpenseList => key_hints(&[
                ("↑/↓", "Move"),
                ("e", "Edit"),
                ("d", "Delete"),
                ("r", "Reload"),
                ("n", "New"),
                ("q", "Quit"),
            ]),
        }
    };

    let help = Paragraph::new(line)
        .block(Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Help "))
        .alignment(Alignment::Center);

    f.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryStore;
    use crate::models::expense::Expense;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[tokio::test]
    async fn list_screen_shows_total_and_records() {
        let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
        let store = MemoryStore::with_expenses(vec![Expense {
            id: 1,
            category: "groceries".into(),
            description: "market".into(),
            amount: 10.5,
            created_at: today,
        }]);
        let mut app = App::new(store);
        app.show_list();
        app.run_pending().await;

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Total this month: 10.50"));
        assert!(text.contains("groceries"));
        assert!(text.contains("market"));
    }

    #[tokio::test]
    async fn notification_is_drawn_over_the_form() {
        let mut app = App::new(MemoryStore::new());
        app.submit_create().await;

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("New Expense"));
        assert!(text.contains("All fields are required"));
    }

    #[tokio::test]
    async fn busy_indicator_is_drawn_while_a_request_is_queued() {
        let mut app = App::new(MemoryStore::new());
        app.form.category = "food".into();
        app.form.description = "lunch".into();
        app.form.amount = "3".into();
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("Recording expense..."));

        app.run_pending().await;
        app.dismiss_notification();
        terminal.draw(|f| draw(f, &app)).unwrap();
        assert!(!buffer_text(&terminal).contains("Recording expense..."));
    }
}
