use clap::Parser;
use std::sync::Arc;
use tracing::debug;

mod app;
mod cli;
mod commands;
mod config;
mod core;
mod display;
mod history;
mod i18n;
mod input;
mod logging;
mod providers;
mod system;

use crate::app::Application;
use crate::cli::parser::Args;
use crate::commands::CommandDispatcher;
use crate::config::{Config, Provider};
use crate::core::error::AssistantError;
use crate::core::platform::SystemPlatform;
use crate::history::ConversationStore;
use crate::i18n::Language;
use crate::providers::factory::ProviderFactory;
use crate::system::SystemInfo;

/// `--list` and `--delete`: answer from the store and exit.
fn manage_history(args: &Args) -> Result<bool, AssistantError> {
    if !args.list && args.delete.is_none() {
        return Ok(false);
    }

    let mut store = ConversationStore::open(Config::history_path())?;
    if let Some(id) = &args.delete {
        if store.delete_conversation(id)? {
            println!("Deleted conversation {}", id);
        } else {
            display::display_error(&format!("No stored conversation with id {}", id));
        }
    }
    if args.list {
        display::display_conversations(&store.list_conversations());
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), AssistantError> {
    let args = Args::parse();
    logging::init(args.verbose);

    if manage_history(&args)? {
        return Ok(());
    }

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(lang) = &args.lang {
        config.language = Language::from_str(lang)
            .ok_or_else(|| AssistantError::Config(format!("Unknown language: {}", lang)))?;
    }

    let provider_kind = match &args.provider {
        Some(name) => Provider::from_str(name)
            .ok_or_else(|| AssistantError::Config(format!("Unknown provider: {}", name)))?,
        None => config.active_provider.unwrap_or_default(),
    };
    let provider_config = config.provider_config(provider_kind);
    let mut provider = ProviderFactory::new().create(&provider_kind, &provider_config)?;
    if let Some(model) = &args.model {
        provider.set_model(model);
    }
    debug!(
        provider = ?provider_kind,
        model = ?args.model.as_ref().or(provider_config.model.as_ref()),
        "model backend ready"
    );

    let system_info = SystemInfo::new();
    debug!(os = %system_info.os_info, shell = %system_info.shell_path, "detected system");
    let platform = Arc::new(SystemPlatform::new(system_info));
    let dispatcher = CommandDispatcher::from_config(&config.commands, config.language, platform)?;

    let store = if args.no_history || !config.save_history {
        None
    } else {
        Some(ConversationStore::open(Config::history_path())?)
    };

    let mut app = Application::new(args, &config, provider, dispatcher, store)?;
    app.run().await
}
