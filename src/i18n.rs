use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Uk,
    En,
}

impl Language {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "uk" | "ua" => Some(Language::Uk),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Uk
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    AppOpened,
    AppNotFound,
    LaunchFailed,
    WebsiteOpened,
    Searching,
    GameLaunched,
    GameNotFound,
    CommandNotRecognized,
    Goodbye,
    ModelFailed,
    Welcome,
    NewChatTitle,
}

impl Language {
    fn template(&self, key: MessageKey) -> &'static str {
        use MessageKey::*;
        match self {
            Language::Uk => match key {
                AppOpened => "Відкриваю {app}...",
                AppNotFound => "Не знайшов програму: {app}",
                LaunchFailed => "Помилка запуску {target}: {error}",
                WebsiteOpened => "Відкриваю {site}...",
                Searching => "Шукаю: {query}...",
                GameLaunched => "Запускаю гру: {game}...",
                GameNotFound => {
                    "Не знайшов гру: {game}. Спробуй додати її в розділ commands.games конфігурації"
                }
                CommandNotRecognized => "Не зрозумів команду. Спробуй ще раз.",
                Goodbye => "Бувай! До зустрічі!",
                ModelFailed => "Вибач, не вдалося отримати відповідь: {error}",
                Welcome => "Привіт! Я твій AI асистент. Напиши /help для списку команд.",
                NewChatTitle => "Новий чат",
            },
            Language::En => match key {
                AppOpened => "Opening {app}...",
                AppNotFound => "App not found: {app}",
                LaunchFailed => "Failed to launch {target}: {error}",
                WebsiteOpened => "Opening {site}...",
                Searching => "Searching for: {query}...",
                GameLaunched => "Launching game: {game}...",
                GameNotFound => {
                    "Game not found: {game}. Try adding it to commands.games in the config"
                }
                CommandNotRecognized => "Command not recognized. Try again.",
                Goodbye => "Goodbye! See you later!",
                ModelFailed => "Sorry, I couldn't get a response: {error}",
                Welcome => "Hi! I'm your AI assistant. Type /help for a list of commands.",
                NewChatTitle => "New chat",
            },
        }
    }

    /// Fill `{name}` placeholders in one left-to-right pass. Substituted
    /// values are never scanned again; unknown placeholders stay literal.
    pub fn message(&self, key: MessageKey, args: &[(&str, &str)]) -> String {
        let mut rest = self.template(key);
        let mut msg = String::with_capacity(rest.len());
        while let Some(open) = rest.find('{') {
            msg.push_str(&rest[..open]);
            let tail = &rest[open..];
            let Some(close) = tail.find('}') else {
                rest = tail;
                break;
            };
            let name = &tail[1..close];
            match args.iter().find(|(arg, _)| *arg == name) {
                Some((_, value)) => msg.push_str(value),
                None => msg.push_str(&tail[..=close]),
            }
            rest = &tail[close + 1..];
        }
        msg.push_str(rest);
        msg
    }

    pub fn help_text(&self) -> &'static str {
        match self {
            Language::Uk => HELP_UK,
            Language::En => HELP_EN,
        }
    }
}

const HELP_UK: &str = "\
📋 ДОСТУПНІ КОМАНДИ:

Прямі команди (починаються з /):
  /open <програма>  - відкрити програму
  /steam <гра>      - запустити Steam гру
  /search <запит>   - пошук в інтернеті
  /site <сайт>      - відкрити сайт
  /exit, /quit      - вийти
  /help             - ця допомога

Природна мова (приклади):
  \"відкрий стім\"       - відкриє Steam
  \"запусти дискорд\"    - відкриє Discord
  \"знайди котиків\"     - пошук в інтернеті
  \"пограй в dota 2\"    - запустить Dota 2
  \"відкрий ютуб\"       - відкриє YouTube

💡 Налаштування: розділ commands у ~/.deskchat/config.yaml";

const HELP_EN: &str = "\
📋 AVAILABLE COMMANDS:

Direct commands (start with /):
  /open <app>       - open an application
  /steam <game>     - launch a Steam game
  /search <query>   - search the web
  /site <site>      - open a website
  /exit, /quit      - exit
  /help             - this help

Natural language (examples):
  \"open steam\"         - opens Steam
  \"open discord\"       - opens Discord
  \"search rust traits\" - web search
  \"play dota 2\"        - launches Dota 2
  \"open youtube\"       - opens YouTube

💡 Settings: the commands section of ~/.deskchat/config.yaml";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_placeholders() {
        let msg = Language::En.message(MessageKey::AppOpened, &[("app", "notepad")]);
        assert_eq!(msg, "Opening notepad...");

        let msg = Language::Uk.message(
            MessageKey::LaunchFailed,
            &[("target", "steam"), ("error", "denied")],
        );
        assert_eq!(msg, "Помилка запуску steam: denied");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let msg = Language::En.message(
            MessageKey::LaunchFailed,
            &[("target", "{error}"), ("error", "denied")],
        );
        assert_eq!(msg, "Failed to launch {error}: denied");
    }

    #[test]
    fn missing_argument_leaves_placeholder() {
        let msg = Language::En.message(MessageKey::LaunchFailed, &[("target", "steam")]);
        assert_eq!(msg, "Failed to launch steam: {error}");
    }

    #[test]
    fn parses_language_codes() {
        assert_eq!(Language::from_str("EN"), Some(Language::En));
        assert_eq!(Language::from_str("uk"), Some(Language::Uk));
        assert_eq!(Language::from_str("de"), None);
        assert_eq!(Language::default(), Language::Uk);
    }
}
