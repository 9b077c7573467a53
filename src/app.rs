use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io;

use crate::alerts::{AlertsView, BadgeState};
use crate::conditions::ConditionsView;
use crate::dashboard::Feeds;
use crate::forecast::ForecastView;

const MISSING: &str = "--";

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    server: &str,
    mut fetch: impl FnMut() -> Feeds,
) -> io::Result<()> {
    let mut feeds = fetch();
    loop {
        terminal.draw(|f| ui(f, server, &feeds))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('r') => feeds = fetch(),
                _ => {}
            }
        }
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded)
}

fn field<'a>(label: &str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::raw(format!(" {label:13}")),
        Span::styled(value, Style::default().fg(Color::Green)),
    ])
}

fn heading<'a>(text: String, color: Color) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}

fn display_current_conditions(feeds: &Feeds) -> Table<'static> {
    let mut rows = vec![Row::new(vec![Cell::from("")])];
    match &feeds.conditions {
        Ok(doc) => {
            let view = ConditionsView::build(doc);
            let mut push = |label: String, value: String| {
                rows.push(Row::new(vec![
                    Cell::from(format!(" {label}")),
                    Cell::from(value).style(Style::default().fg(Color::Green)),
                ]));
            };
            push("Currently".to_string(), view.summary.clone());
            for obs in &view.rows {
                push(obs.label.clone(), obs.display());
            }
            push("Wind".to_string(), view.cardinal.clone());
            push("Pressure".to_string(), view.pressure.clone());
        }
        Err(_) => rows.push(Row::new(vec![Cell::from(format!(" {MISSING}"))])),
    }

    Table::new(rows, [Constraint::Length(16), Constraint::Min(10)])
        .block(panel("Current Conditions"))
}

fn badge_span(label: &'static str, state: BadgeState) -> Span<'static> {
    let color = match state {
        BadgeState::Normal => Color::Green,
        BadgeState::Elevated => Color::Yellow,
    };
    Span::styled(format!(" {label} "), Style::default().fg(Color::Black).bg(color))
}

fn display_alerts(feeds: &Feeds) -> List<'static> {
    let view = match &feeds.alerts {
        Ok(doc) => AlertsView::build(doc),
        Err(_) => {
            return List::new(vec![ListItem::new(format!("\n  {MISSING}"))]).block(panel("Alerts"))
        }
    };

    let mut items = vec![ListItem::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(" "),
            badge_span("Spotter", view.spotter),
            Span::raw(" "),
            badge_span("Alert", view.alert),
            Span::raw(" "),
            badge_span("Watch", view.watch),
        ]),
    ])];

    if let Some((label, content)) = &view.outlook {
        items.push(ListItem::new(vec![
            Line::from(""),
            heading(label.clone(), Color::Yellow),
            Line::from(format!(" {content}")),
        ]));
    }

    let warnings = view.warnings.iter().flatten().map(|(_, card)| (card, Color::Red));
    let alerts = view.alerts.iter().map(|card| (card, Color::Yellow));
    let watches = view.watches.iter().map(|w| (&w.card, Color::LightYellow));
    for (card, color) in warnings.chain(alerts).chain(watches) {
        items.push(ListItem::new(vec![
            Line::from(""),
            heading(card.event_type.clone(), color),
            Line::from(format!(" {}", card.summary)),
        ]));
    }

    List::new(items).block(panel("Alerts"))
}

fn display_forecast(feeds: &Feeds) -> List<'static> {
    let mut items = vec![];
    match &feeds.forecast {
        Ok(doc) => {
            for row in ForecastView::build(doc).rows {
                items.push(ListItem::new(vec![
                    Line::from(""),
                    heading(row.day, Color::Yellow),
                    field("Conditions", row.shortcast),
                ]));
            }
        }
        Err(_) => items.push(ListItem::new(format!("\n  {MISSING}"))),
    }
    List::new(items).block(panel("Forecast"))
}

fn display_headline<'a>(server: &'a str, feeds: &Feeds) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(vec![
            Span::raw(" "),
            Span::styled(server, Style::default().fg(Color::Blue)),
        ]),
        Line::from(format!(" {}", feeds.fetched_at.format("%d-%m-%Y %H:%M"))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .border_type(BorderType::Rounded),
    )
}

fn ui(f: &mut Frame, server: &str, feeds: &Feeds) {
    let vert_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(f.area());

    f.render_widget(display_headline(server, feeds), vert_layout[0]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(vert_layout[1]);

    let lchunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    f.render_widget(display_current_conditions(feeds), lchunks[0]);
    f.render_widget(display_alerts(feeds), lchunks[1]);
    f.render_widget(display_forecast(feeds), chunks[1]);
}
