//! Terminal UI for liefero that dispatches orders and shows driver rankings.

mod app;
mod fleet;
mod input;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use liefero_core::service::DispatchService;
use liefero_store_memory::{MemoryDirectory, MemoryLedger};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    // Store + service setup
    let directory = Arc::new(MemoryDirectory::new());
    let ledger = Arc::new(MemoryLedger::new());
    let fleet = fleet::seed(&directory)?;
    let service = Arc::new(DispatchService::new(directory, ledger));

    // App state
    let app = App::new(service, fleet);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::DispatchOrder => {
                    let Some(restaurant) = app.current_restaurant().cloned() else {
                        app.error_message = Some("No restaurant selected".into());
                        continue;
                    };

                    let Some(customer) = app.current_customer().cloned() else {
                        app.error_message = Some("No customer available in this city".into());
                        continue;
                    };

                    let slot = app.current_slot();

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = app.service.assign(&customer, &restaurant, slot).await;

                    app.is_loading = false;
                    match res {
                        Ok(delivery) => {
                            app.recent.insert(0, delivery);
                            app.advance_customer();
                        }
                        Err(err) => {
                            app.error_message = Some(format!("Dispatch failed: {err}"));
                        }
                    }
                }
                Action::LoadRankReport => {
                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = match (&app.selected_city, app.rank_city_only) {
                        (Some(city), true) => app.service.rank_by_city(city).await,
                        _ => app.service.rank_all().await,
                    };

                    app.is_loading = false;
                    match res {
                        Ok(rows) => {
                            app.rank_rows = rows;
                        }
                        Err(err) => {
                            app.rank_rows.clear();
                            app.error_message = Some(format!("Failed to load ranking: {err}"));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
