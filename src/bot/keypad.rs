//! Chat keypad wire models and the fixed bot menus.

use serde::Serialize;

use super::labels;

#[derive(Debug, Clone, Serialize)]
pub struct Keypad {
    pub rows: Vec<KeypadRow>,
    pub resize_keyboard: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeypadRow {
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Button {
    pub id: String,
    #[serde(rename = "type")]
    pub button_type: String,
    pub button_text: String,
}

impl Button {
    fn simple(id: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            button_type: "Simple".to_string(),
            button_text: text.to_string(),
        }
    }
}

fn row(buttons: Vec<Button>) -> KeypadRow {
    KeypadRow { buttons }
}

/// The main menu shown on /start.
pub fn main_menu() -> Keypad {
    Keypad {
        rows: vec![
            row(vec![Button::simple("top_movies", labels::TOP_MOVIES_MENU)]),
            row(vec![
                Button::simple("top_anime", labels::TOP_ANIME),
                Button::simple("cartoons", labels::CARTOONS),
            ]),
            row(vec![Button::simple("select_genre", labels::SELECT_GENRE)]),
            row(vec![
                Button::simple("profile", labels::PROFILE),
                Button::simple("daily_suggestion", labels::DAILY_SUGGESTION),
            ]),
        ],
        resize_keyboard: true,
    }
}

/// The movies-and-series submenu.
pub fn movies_menu() -> Keypad {
    Keypad {
        rows: vec![
            row(vec![Button::simple("new_movies", labels::LATEST_MOVIES)]),
            row(vec![
                Button::simple("new_series_episodes", labels::NEW_EPISODES),
                Button::simple("top_series", labels::TOP_SERIES),
            ]),
            row(vec![Button::simple("hottest_movies", labels::HOTTEST_MOVIES)]),
            row(vec![Button::simple("back_to_main", labels::BACK_TO_MAIN)]),
        ],
        resize_keyboard: true,
    }
}
