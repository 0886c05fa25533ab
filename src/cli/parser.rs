use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Desktop assistant: app, web and game commands with an LLM chat fallback", long_about = None)]
pub struct Args {
    /// Run a single turn (command or chat) and exit. Without it the REPL starts.
    pub query: Option<String>,

    /// Model backend [possible values: openai, openrouter, deepseek, ollama]
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model to use (provider-specific)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Message language [possible values: uk, en]
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Path to the YAML config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Continue a stored conversation
    #[arg(short, long, value_name = "ID")]
    pub resume: Option<String>,

    /// List stored conversations and exit
    #[arg(long)]
    pub list: bool,

    /// Delete a stored conversation and exit
    #[arg(long, value_name = "ID")]
    pub delete: Option<String>,

    /// Do not read or write the conversation store
    #[arg(long)]
    pub no_history: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_shot_query_with_overrides() {
        let args = Args::parse_from([
            "deskchat",
            "відкрий ютуб",
            "--provider",
            "openai",
            "-m",
            "gpt-4o",
            "--lang",
            "en",
        ]);
        assert_eq!(args.query.as_deref(), Some("відкрий ютуб"));
        assert_eq!(args.provider.as_deref(), Some("openai"));
        assert_eq!(args.model.as_deref(), Some("gpt-4o"));
        assert_eq!(args.lang.as_deref(), Some("en"));
        assert!(!args.verbose);
    }

    #[test]
    fn management_flags() {
        let args = Args::parse_from(["deskchat", "--list", "--no-history", "-v"]);
        assert!(args.list && args.no_history && args.verbose);
        assert!(args.query.is_none());

        let args = Args::parse_from(["deskchat", "--delete", "20250314_090507"]);
        assert_eq!(args.delete.as_deref(), Some("20250314_090507"));
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
