//! Command tables: registries, phrase table and trigger lists.
//!
//! Defaults reproduce the stock assistant setup. Everything here can be
//! overridden from the `commands` section of the config file.

use crate::commands::CommandKind;
use crate::commands::CommandKind::{Exit, OpenApp, OpenWebsite};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseConfig {
    pub phrase: String,
    pub command: CommandKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub search: Vec<String>,
    pub play: Vec<String>,
    pub open: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    pub apps: BTreeMap<String, String>,
    pub websites: BTreeMap<String, String>,
    pub search_engines: BTreeMap<String, String>,
    pub default_search_engine: String,
    pub games: BTreeMap<String, String>,
    /// Order matters: partial matching takes the first phrase found.
    pub phrases: Vec<PhraseConfig>,
    pub triggers: TriggerConfig,
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn words(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

#[cfg(target_os = "windows")]
const DEFAULT_APPS: &[(&str, &str)] = &[
    ("steam", r"C:\Program Files (x86)\Steam\Steam.exe"),
    ("discord", r"%LOCALAPPDATA%\Discord\Update.exe --processStart Discord.exe"),
    ("telegram", r"%APPDATA%\Telegram Desktop\Telegram.exe"),
    ("chrome", r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
    ("firefox", r"C:\Program Files\Mozilla Firefox\firefox.exe"),
    ("notepad", "notepad.exe"),
    ("calculator", "calc.exe"),
    ("explorer", "explorer.exe"),
    ("spotify", r"%APPDATA%\Spotify\Spotify.exe"),
    ("vscode", r"%LOCALAPPDATA%\Programs\Microsoft VS Code\Code.exe"),
];

#[cfg(target_os = "macos")]
const DEFAULT_APPS: &[(&str, &str)] = &[
    ("steam", "open -a Steam"),
    ("discord", "open -a Discord"),
    ("telegram", "open -a Telegram"),
    ("chrome", "open -a 'Google Chrome'"),
    ("firefox", "open -a Firefox"),
    ("notepad", "open -a TextEdit"),
    ("calculator", "open -a Calculator"),
    ("explorer", "open \"$HOME\""),
    ("spotify", "open -a Spotify"),
    ("vscode", "open -a 'Visual Studio Code'"),
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const DEFAULT_APPS: &[(&str, &str)] = &[
    ("steam", "steam"),
    ("discord", "discord"),
    ("telegram", "telegram-desktop"),
    ("chrome", "google-chrome"),
    ("firefox", "firefox"),
    ("notepad", "gedit"),
    ("calculator", "gnome-calculator"),
    ("explorer", "xdg-open \"$HOME\""),
    ("spotify", "spotify"),
    ("vscode", "code"),
];

const DEFAULT_WEBSITES: &[(&str, &str)] = &[
    ("youtube", "https://www.youtube.com"),
    ("google", "https://www.google.com"),
    ("github", "https://github.com"),
    ("digitec", "https://www.digitec.ch"),
    ("gmail", "https://mail.google.com"),
    ("twitch", "https://www.twitch.tv"),
    ("twitter", "https://x.com"),
    ("reddit", "https://www.reddit.com"),
];

const DEFAULT_SEARCH_ENGINES: &[(&str, &str)] = &[
    ("google", "https://www.google.com/search?q="),
    ("youtube", "https://www.youtube.com/results?search_query="),
    ("digitec", "https://www.digitec.ch/search?q="),
];

// Ids from https://steamdb.info/
const DEFAULT_GAMES: &[(&str, &str)] = &[
    ("cs2", "730"),
    ("dota 2", "570"),
    ("dota", "570"),
    ("gta 5", "271590"),
    ("pubg", "578080"),
    ("rust", "252490"),
    ("terraria", "105600"),
    ("arc raiders", "1808500"),
    ("detroit become human", "1222140"),
    ("war thunder", "236390"),
    ("Assetto Corsa Competizione", "805550"),
    ("The Finals", "2073850"),
    ("F1 25", "3059520"),
];

const DEFAULT_PHRASES: &[(&str, CommandKind, Option<&str>)] = &[
    // exit
    ("вийти", Exit, None),
    ("вийди", Exit, None),
    ("закрийся", Exit, None),
    ("пока", Exit, None),
    ("бувай", Exit, None),
    ("exit", Exit, None),
    ("quit", Exit, None),
    ("bye", Exit, None),
    // steam
    ("відкрий стім", OpenApp, Some("steam")),
    ("відкрий steam", OpenApp, Some("steam")),
    ("запусти стім", OpenApp, Some("steam")),
    ("запусти steam", OpenApp, Some("steam")),
    ("open steam", OpenApp, Some("steam")),
    // discord
    ("відкрий дискорд", OpenApp, Some("discord")),
    ("відкрий discord", OpenApp, Some("discord")),
    ("запусти дискорд", OpenApp, Some("discord")),
    ("open discord", OpenApp, Some("discord")),
    // telegram
    ("відкрий телеграм", OpenApp, Some("telegram")),
    ("відкрий telegram", OpenApp, Some("telegram")),
    ("запусти телеграм", OpenApp, Some("telegram")),
    // browser
    ("відкрий браузер", OpenApp, Some("chrome")),
    ("відкрий хром", OpenApp, Some("chrome")),
    ("відкрий chrome", OpenApp, Some("chrome")),
    ("open browser", OpenApp, Some("chrome")),
    ("open chrome", OpenApp, Some("chrome")),
    // youtube
    ("відкрий ютуб", OpenWebsite, Some("youtube")),
    ("відкрий youtube", OpenWebsite, Some("youtube")),
    ("open youtube", OpenWebsite, Some("youtube")),
    // other sites
    ("відкрий гугл", OpenWebsite, Some("google")),
    ("відкрий google", OpenWebsite, Some("google")),
    ("відкрий github", OpenWebsite, Some("github")),
    ("відкрий гітхаб", OpenWebsite, Some("github")),
    ("відкрий твіттер", OpenWebsite, Some("twitter")),
    ("відкрий twitter", OpenWebsite, Some("twitter")),
    ("відкрий редіт", OpenWebsite, Some("reddit")),
    ("відкрий reddit", OpenWebsite, Some("reddit")),
    ("відкрий twitch", OpenWebsite, Some("twitch")),
    ("відкрий твіч", OpenWebsite, Some("twitch")),
    ("відкрити digitec", OpenWebsite, Some("digitec")),
    // calculator
    ("відкрий калькулятор", OpenApp, Some("calculator")),
    ("калькулятор", OpenApp, Some("calculator")),
    ("open calculator", OpenApp, Some("calculator")),
    // notepad
    ("відкрий блокнот", OpenApp, Some("notepad")),
    ("блокнот", OpenApp, Some("notepad")),
    ("open notepad", OpenApp, Some("notepad")),
    // file manager
    ("відкрий провідник", OpenApp, Some("explorer")),
    ("відкрий файли", OpenApp, Some("explorer")),
    ("open explorer", OpenApp, Some("explorer")),
    ("open files", OpenApp, Some("explorer")),
    // spotify
    ("відкрий спотіфай", OpenApp, Some("spotify")),
    ("відкрий spotify", OpenApp, Some("spotify")),
    ("музика", OpenApp, Some("spotify")),
    // vs code
    ("відкрий vscode", OpenApp, Some("vscode")),
    ("відкрий код", OpenApp, Some("vscode")),
    ("open vscode", OpenApp, Some("vscode")),
];

const SEARCH_TRIGGERS: &[&str] = &[
    "знайди", "знайти", "пошукай", "пошук", "шукай", "загугли", "погугли", "google", "search",
    "find", "шукати", "найди", "найти",
];

const PLAY_TRIGGERS: &[&str] = &[
    "запусти гру",
    "запусти",
    "пограй в",
    "пограти в",
    "грати в",
    "play",
    "launch game",
    "start game",
    "включи гру",
    "включи",
];

const OPEN_TRIGGERS: &[&str] = &["відкрий", "открой", "open", "запусти", "launch", "start"];

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            search: words(SEARCH_TRIGGERS),
            play: words(PLAY_TRIGGERS),
            open: words(OPEN_TRIGGERS),
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            apps: table(DEFAULT_APPS),
            websites: table(DEFAULT_WEBSITES),
            search_engines: table(DEFAULT_SEARCH_ENGINES),
            default_search_engine: "google".to_string(),
            games: table(DEFAULT_GAMES),
            phrases: DEFAULT_PHRASES
                .iter()
                .map(|(phrase, command, target)| PhraseConfig {
                    phrase: phrase.to_string(),
                    command: *command,
                    target: target.map(str::to_string),
                })
                .collect(),
            triggers: TriggerConfig::default(),
        }
    }
}
