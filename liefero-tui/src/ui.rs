use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    // Title / header
    let header = Paragraph::new("liefero – restaurant delivery dispatch")
        .block(Block::default().borders(Borders::ALL).title("Liefero"));
    frame.render_widget(header, *header_area);

    // Main screen
    match app.screen {
        Screen::CitySelect => draw_city_select(frame, app, *content_area),
        Screen::Dispatch => draw_dispatch(frame, app, *content_area),
        Screen::RankReport => draw_rank_report(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::CitySelect => "↑/↓ move · Enter/Space select city · q/Ctrl-C quit",
        Screen::Dispatch => {
            "↑/↓ restaurant · Tab customer · ←/→ slot · Enter dispatch · r ranking · Esc back · q quit"
        }
        Screen::RankReport => "a all cities · c this city · Esc/←/b back · q/Ctrl-C quit",
    };

    let status_text = if app.is_loading {
        format!("Working… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text.to_owned())
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_city_select(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = app
        .cities
        .iter()
        .enumerate()
        .map(|(idx, (_id, name))| {
            let prefix = if idx == app.city_list_index {
                "> "
            } else {
                "  "
            };
            ListItem::new(format!("{prefix}{name}"))
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select city (↑/↓, Enter)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.cities.is_empty() {
        state.select(Some(app.city_list_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_dispatch(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // order summary
            Constraint::Min(0),    // restaurants
            Constraint::Length(8), // recent assignments
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [summary_area, restaurants_area, recent_area] = chunks else {
        return;
    };

    let customer_line = app.current_customer().map_or_else(
        || "<no customer in this city>".to_owned(),
        |customer| format!("{} · {}", customer.name, customer.address),
    );

    let slot = app.current_slot();
    let summary = Paragraph::new(format!(
        "City:     {}\nCustomer: {customer_line}\nSlot:     {}",
        app.selected_city_name(),
        slot.format("%a %d.%m. %H:%M"),
    ))
    .block(Block::default().borders(Borders::ALL).title("Order"));

    frame.render_widget(summary, *summary_area);

    let items = if app.restaurants.is_empty() {
        vec![ListItem::new("No restaurants in this city.")]
    } else {
        app.restaurants
            .iter()
            .map(|restaurant| ListItem::new(format!("{} · {}", restaurant.name, restaurant.address)))
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Restaurants (↑/↓, Enter to dispatch)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.restaurants.is_empty() {
        state.select(Some(app.restaurant_list_index));
    }
    frame.render_stateful_widget(list, *restaurants_area, &mut state);

    let recent_items = if app.recent.is_empty() {
        vec![ListItem::new(
            "No deliveries dispatched yet. Press Enter on a restaurant.",
        )]
    } else {
        app.recent
            .iter()
            .map(|delivery| {
                ListItem::new(format!(
                    "{} · {} → {} · {} · {} km",
                    delivery.scheduled_at.format("%H:%M"),
                    delivery.driver.name,
                    delivery.customer.name,
                    delivery.restaurant.name,
                    delivery.distance_km,
                ))
            })
            .collect()
    };

    let recent = List::new(recent_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Recent assignments (newest first)"),
    );
    frame.render_widget(recent, *recent_area);
}

fn draw_rank_report(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let scope = if app.rank_city_only {
        app.selected_city_name().to_owned()
    } else {
        "all cities".to_owned()
    };
    let title = format!("Driver ranking – {scope}");

    if app.is_loading {
        let paragraph = Paragraph::new("Loading ranking…")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    if app.rank_rows.is_empty() {
        let paragraph = Paragraph::new("No drivers to rank.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = app.rank_rows.iter().enumerate().map(|(idx, row)| {
        let mut style = Style::default();
        if idx == 0 && row.total_km > 0 {
            style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }

        Row::new(vec![
            Cell::from(format!("{}", idx + 1)),
            Cell::from(row.driver.name.clone()),
            Cell::from(row.driver.city.0.clone()),
            Cell::from(format!("{} km", row.total_km)),
        ])
        .style(style)
    });

    let column_widths = [
        Constraint::Length(4),
        Constraint::Length(18),
        Constraint::Length(12),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["#", "Driver", "City", "Total"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    frame.render_widget(table, area);
}
