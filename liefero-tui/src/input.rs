use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `service.assign`(...) for the selected restaurant and customer.
    DispatchOrder,
    /// Run `service.rank_all`/`service.rank_by_city` per the current scope.
    LoadRankReport,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Char, Down, Enter, Esc, Left, Right, Tab, Up};

    // Global quit shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('q') && key.modifiers.is_empty() {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::CitySelect => match key.code {
            Up | Char('k') => {
                if app.city_list_index > 0 {
                    app.city_list_index -= 1;
                }
            }
            Down | Char('j') => {
                if app.city_list_index + 1 < app.cities.len() {
                    app.city_list_index += 1;
                }
            }
            Enter | Char(' ') => {
                app.select_current_city();
            }
            _ => {}
        },

        Screen::Dispatch => match key.code {
            Up | Char('k') => {
                if app.restaurant_list_index > 0 {
                    app.restaurant_list_index -= 1;
                }
            }
            Down | Char('j') => {
                if app.restaurant_list_index + 1 < app.restaurants.len() {
                    app.restaurant_list_index += 1;
                }
            }
            Right | Char('+') => {
                app.slot_offset_hours += 1;
            }
            Left | Char('-') => {
                if app.slot_offset_hours > 0 {
                    app.slot_offset_hours -= 1;
                }
            }
            Tab => {
                app.advance_customer();
            }
            Enter => {
                action = Action::DispatchOrder;
            }
            Char('r') => {
                app.screen = Screen::RankReport;
                action = Action::LoadRankReport;
            }
            Esc | Char('b') => {
                app.screen = Screen::CitySelect;
                app.recent.clear();
                app.error_message = None;
            }
            _ => {}
        },

        Screen::RankReport => match key.code {
            Char('a') => {
                app.rank_city_only = false;
                action = Action::LoadRankReport;
            }
            Char('c') => {
                app.rank_city_only = true;
                action = Action::LoadRankReport;
            }
            Esc | Left | Char('b') => {
                app.screen = Screen::Dispatch;
            }
            _ => {}
        },
    }
    action
}
