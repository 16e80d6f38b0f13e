use crate::color_utils::{member_color, priority_color};
use crate::metrics::BoardMetrics;
use crate::tui::state::{AppState, Focus, InputMode};
use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(20), Constraint::Percentage(80)])
        .split(v_chunks[0]);

    let main_chunks = if state.show_metrics {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(h_chunks[1])
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(100)])
            .split(h_chunks[1])
    };

    draw_sidebar(f, state, h_chunks[0]);
    draw_board(f, state, main_chunks[0]);
    if state.show_metrics {
        draw_metrics(f, state, main_chunks[1]);
    }
    draw_footer(f, state, v_chunks[1]);
}

fn draw_sidebar(f: &mut Frame, state: &mut AppState, area: Rect) {
    let items: Vec<ListItem> = state
        .boards
        .iter()
        .map(|b| {
            let marker = if Some(b.id) == state.active_board { "> " } else { "  " };
            let (r, g, bl) = priority_color(b.priority);
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::styled("● ", Style::default().fg(Color::Rgb(r, g, bl))),
                Span::raw(b.title.as_str()),
            ]))
        })
        .collect();
    let sidebar_style = if state.active_focus == Focus::Sidebar {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let sidebar = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Projects ")
                .border_style(sidebar_style),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Blue),
        );
    f.render_stateful_widget(sidebar, area, &mut state.board_state);
}

fn draw_board(f: &mut Frame, state: &AppState, area: Rect) {
    let main_style = if state.active_focus == Focus::Main {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let Some(board) = &state.board else {
        let text = if state.loading {
            "Loading..."
        } else {
            "No project found. Press n to create one."
        };
        let empty = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(main_style));
        f.render_widget(empty, area);
        return;
    };

    let today = Local::now().date_naive();
    let title = format!(
        " {} [{}] {} days left ",
        board.title,
        board.priority,
        board.days_remaining(today)
    );
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(main_style);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    if board.lists.is_empty() {
        f.render_widget(Paragraph::new("No lists yet. Press A to add one."), inner);
        return;
    }

    let constraints: Vec<Constraint> = board
        .lists
        .iter()
        .map(|_| Constraint::Ratio(1, board.lists.len() as u32))
        .collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(inner);

    for (col, list) in board.lists.iter().enumerate() {
        let selected_col = col == state.column && state.active_focus == Focus::Main;
        let mut items: Vec<ListItem> = list
            .cards
            .iter()
            .map(|card| {
                let mut spans = Vec::new();
                if state.carrying == Some(card.id) {
                    spans.push(Span::styled("⇅ ", Style::default().fg(Color::Magenta)));
                }
                spans.push(Span::raw(card.title.clone()));
                for member in &card.members {
                    let label = state
                        .users
                        .iter()
                        .find(|u| u.id == *member)
                        .map(|u| u.initials())
                        .unwrap_or_else(|| format!("#{}", member));
                    let (r, g, b) = member_color(*member);
                    spans.push(Span::styled(
                        format!(" {}", label),
                        Style::default().fg(Color::Rgb(r, g, b)),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        if state.carrying.is_some() && selected_col {
            items.push(ListItem::new(Line::from(Span::styled(
                "  (drop at bottom)",
                Style::default().fg(Color::DarkGray),
            ))));
        }

        let border = if selected_col {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let widget = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ({}) ", list.title, list.cards.len()))
                    .border_style(border),
            )
            .highlight_style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .bg(Color::DarkGray),
            );
        let mut list_state = ListState::default();
        if selected_col {
            list_state.select(Some(state.row));
        }
        f.render_stateful_widget(widget, columns[col], &mut list_state);
    }
}

fn draw_metrics(f: &mut Frame, state: &AppState, area: Rect) {
    let today = Local::now().date_naive();
    let mut lines = Vec::new();

    if let Some(board) = &state.board {
        let m = BoardMetrics::from_board(board, today);
        lines.push(Line::from(format!(
            "Cards: {} | Done: {} ({}%) | Unassigned: {} | Days left: {}",
            m.total_cards,
            m.done_cards,
            m.completion_percent(),
            m.unassigned_cards,
            m.days_remaining
        )));
        let per_list = m
            .per_list
            .iter()
            .map(|l| format!("{}: {}", l.title, l.cards))
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(Line::from(per_list));
        for (user, count) in m.workload.iter().take(5) {
            let name = state
                .users
                .iter()
                .find(|u| u.id == *user)
                .map(|u| u.display_name())
                .unwrap_or_else(|| format!("User {}", user));
            lines.push(Line::from(format!("  {:<20} {}", name, "■".repeat(*count))));
        }
    }

    if let Some(p) = &state.portfolio {
        let by_prio = p
            .by_priority
            .iter()
            .map(|(prio, n)| format!("{} {}", prio, n))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::from(Span::styled(
            format!(
                "All projects: {} | Cards: {} | Done: {} | Overdue: {} | {}",
                p.boards, p.total_cards, p.done_cards, p.overdue, by_prio
            ),
            Style::default().fg(Color::Green),
        )));
    }

    let metrics = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Metrics "));
    f.render_widget(metrics, area);
}

fn draw_footer(f: &mut Frame, state: &AppState, footer_area: Rect) {
    match state.mode {
        InputMode::Normal => {
            let f_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(footer_area);
            let status = Paragraph::new(state.message.clone())
                .style(Style::default().fg(Color::Cyan))
                .block(
                    Block::default()
                        .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                        .title(" Status "),
                );
            let help_text = if state.carrying.is_some() {
                "hjkl:Target | Space/Enter:Drop | Esc:Cancel"
            } else {
                "Space:Drag | a:Card | A:List | n/E:Project | e:Edit | d/D/X:Del | 1-9:Member | m:Metrics"
            };
            let help = Paragraph::new(help_text)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Right)
                .block(
                    Block::default()
                        .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                        .title(" Actions "),
                );
            f.render_widget(status, f_chunks[0]);
            f.render_widget(help, f_chunks[1]);
        }
        InputMode::ConfirmDeleteBoard => {
            let name = state
                .board
                .as_ref()
                .map(|b| b.title.as_str())
                .unwrap_or_default();
            let prompt = Paragraph::new(format!("Delete project \"{}\"? (y/n)", name))
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL).title(" Confirm "));
            f.render_widget(prompt, footer_area);
        }
        _ => {
            let (title, prefix, color) = match state.mode {
                InputMode::CreatingList => (" New List ", "> ", Color::Green),
                InputMode::CreatingBoard => (
                    " New Project (title !priority start..end) ",
                    "> ",
                    Color::Blue,
                ),
                InputMode::EditingBoard => (
                    " Edit Project (title !priority start..end) ",
                    "> ",
                    Color::Blue,
                ),
                InputMode::EditingCard => (" Edit Card ", "> ", Color::Magenta),
                _ => (" New Card (title // description) ", "> ", Color::Yellow),
            };
            let input = Paragraph::new(format!("{}{}", prefix, state.input_buffer))
                .style(Style::default().fg(color))
                .block(Block::default().borders(Borders::ALL).title(title));
            f.render_widget(input, footer_area);
            let cursor_x =
                footer_area.x + 1 + prefix.chars().count() as u16 + state.cursor_position as u16;
            let cursor_y = footer_area.y + 1;
            f.set_cursor_position((cursor_x, cursor_y));
        }
    }
}
