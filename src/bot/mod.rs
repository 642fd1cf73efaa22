//! Bot-side plumbing: transport trait, concrete API client, keypad menus,
//! command parsing, and the update dispatch loop.

mod client;
mod dispatcher;
pub mod keypad;
mod transport;

pub use client::RubikaClient;
pub use dispatcher::Dispatcher;
pub use transport::{ChatTransport, IncomingMessage, UpdateBatch};

use crate::catalog::Bucket;

/// Button labels, shared between the keypad builders and command parsing.
pub mod labels {
    pub const TOP_MOVIES_MENU: &str = "Top Movies & Series 📽";
    pub const TOP_ANIME: &str = "Top Anime 💯";
    pub const CARTOONS: &str = "Cartoons 🎨";
    pub const SELECT_GENRE: &str = "Pick a Genre 🎭";
    pub const PROFILE: &str = "👤 Profile";
    pub const DAILY_SUGGESTION: &str = "Today's Pick ⁉️";
    pub const LATEST_MOVIES: &str = "Latest Movies 🎬";
    pub const NEW_EPISODES: &str = "New Episodes 📺";
    pub const TOP_SERIES: &str = "Top Series 🔝";
    pub const HOTTEST_MOVIES: &str = "Hottest Movies 😎";
    pub const BACK_TO_MAIN: &str = "Back to Main Menu 🔙";
}

/// A recognized user command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    TopMoviesMenu,
    BackToMain,
    LatestMovies,
    NewEpisodes,
    TopSeries,
    HottestMovies,
    TopAnime,
    Cartoons,
    SelectGenre,
    Profile,
    DailySuggestion,
}

impl Command {
    /// Map incoming message text to a command, if it matches one.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "/start" => Some(Command::Start),
            labels::TOP_MOVIES_MENU => Some(Command::TopMoviesMenu),
            labels::BACK_TO_MAIN => Some(Command::BackToMain),
            labels::LATEST_MOVIES => Some(Command::LatestMovies),
            labels::NEW_EPISODES => Some(Command::NewEpisodes),
            labels::TOP_SERIES => Some(Command::TopSeries),
            labels::HOTTEST_MOVIES => Some(Command::HottestMovies),
            labels::TOP_ANIME => Some(Command::TopAnime),
            labels::CARTOONS => Some(Command::Cartoons),
            labels::SELECT_GENRE => Some(Command::SelectGenre),
            labels::PROFILE => Some(Command::Profile),
            labels::DAILY_SUGGESTION => Some(Command::DailySuggestion),
            _ => None,
        }
    }

    /// The catalog bucket a command draws from, for commands that fetch.
    pub fn bucket(self) -> Option<Bucket> {
        match self {
            Command::LatestMovies => Some(Bucket::NowPlaying),
            Command::TopSeries => Some(Bucket::TopRatedTv),
            Command::HottestMovies => Some(Bucket::PopularMovies),
            Command::TopAnime => Some(Bucket::PopularAnime),
            Command::Cartoons => Some(Bucket::PopularCartoons),
            Command::DailySuggestion => Some(Bucket::PopularMovies),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_and_every_label() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse(" /start "), Some(Command::Start));
        assert_eq!(
            Command::parse(labels::TOP_MOVIES_MENU),
            Some(Command::TopMoviesMenu)
        );
        assert_eq!(
            Command::parse(labels::LATEST_MOVIES),
            Some(Command::LatestMovies)
        );
        assert_eq!(Command::parse(labels::TOP_SERIES), Some(Command::TopSeries));
        assert_eq!(
            Command::parse(labels::HOTTEST_MOVIES),
            Some(Command::HottestMovies)
        );
        assert_eq!(Command::parse(labels::TOP_ANIME), Some(Command::TopAnime));
        assert_eq!(Command::parse(labels::CARTOONS), Some(Command::Cartoons));
        assert_eq!(
            Command::parse(labels::DAILY_SUGGESTION),
            Some(Command::DailySuggestion)
        );
        assert_eq!(
            Command::parse(labels::BACK_TO_MAIN),
            Some(Command::BackToMain)
        );
    }

    #[test]
    fn unknown_text_is_not_a_command() {
        assert_eq!(Command::parse("hello there"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn catalog_commands_map_to_buckets() {
        assert_eq!(Command::LatestMovies.bucket(), Some(Bucket::NowPlaying));
        assert_eq!(Command::TopSeries.bucket(), Some(Bucket::TopRatedTv));
        assert_eq!(Command::HottestMovies.bucket(), Some(Bucket::PopularMovies));
        assert_eq!(Command::TopAnime.bucket(), Some(Bucket::PopularAnime));
        assert_eq!(Command::Cartoons.bucket(), Some(Bucket::PopularCartoons));
        assert_eq!(
            Command::DailySuggestion.bucket(),
            Some(Bucket::PopularMovies)
        );
        assert_eq!(Command::Start.bucket(), None);
        assert_eq!(Command::Profile.bucket(), None);
    }
}
