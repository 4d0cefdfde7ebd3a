use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use quickprompts_core::ai::OpenAiProvider;
use quickprompts_core::storage::prompts::PromptStorage;
use quickprompts_core::transfer;
use quickprompts_core::{
    CompletionProvider, Direction, MutationOutcome, PromptDraft, PromptStore, SecretStore,
    SettingsManager,
};

use crate::clip;

fn open_store(data_dir: &Path) -> Result<PromptStore> {
    Ok(PromptStore::open(PromptStorage::in_dir(data_dir))?)
}

fn open_settings(data_dir: &Path) -> Result<SettingsManager> {
    Ok(SettingsManager::in_dir(data_dir)?)
}

/// Build a provider from the stored credential, or explain how to add one.
fn provider() -> Result<OpenAiProvider> {
    let Some(api_key) = SecretStore::new().load()? else {
        bail!("No API key configured. Run `quickprompts key set <KEY>` first.");
    };
    Ok(OpenAiProvider::new(api_key))
}

/// The pickers in a GUI would constrain this; the flag has to be checked.
fn check_icon(icon: &Option<String>) -> Result<()> {
    if let Some(icon) = icon {
        if !quickprompts_core::prompt::types::PROMPT_ICONS.contains(&icon.as_str()) {
            bail!(
                "Unknown icon {icon}. Valid icons: {}",
                quickprompts_core::prompt::types::PROMPT_ICONS.join(", ")
            );
        }
    }
    Ok(())
}

pub fn list(data_dir: &Path) -> Result<()> {
    let store = open_store(data_dir)?;
    let prompts = store.prompts();
    if prompts.is_empty() {
        println!("No prompts yet. Add one with `quickprompts add <TEXT>`.");
        return Ok(());
    }

    for prompt in prompts {
        if prompt.category.is_empty() {
            println!("{:<15} {}", prompt.id, prompt.name);
        } else {
            println!("{:<15} {} [{}]", prompt.id, prompt.name, prompt.category);
        }
    }
    Ok(())
}

pub fn show(data_dir: &Path, id: &str) -> Result<()> {
    let store = open_store(data_dir)?;
    let Some(prompt) = store.get(id) else {
        bail!("No prompt with id {id}.");
    };

    println!("id:       {}", prompt.id);
    println!("name:     {}", prompt.name);
    println!("category: {}", prompt.category);
    println!("color:    {}", prompt.color);
    println!("icon:     {}", prompt.icon);
    println!();
    println!("{}", prompt.text);
    Ok(())
}

pub fn add(
    data_dir: &Path,
    text: String,
    name: Option<String>,
    category: Option<String>,
    color: Option<String>,
    icon: Option<String>,
) -> Result<()> {
    check_icon(&icon)?;
    let store = open_store(data_dir)?;
    let prompt = store.create(PromptDraft {
        name: name.unwrap_or_default(),
        text,
        category: category.unwrap_or_default(),
        color,
        icon,
    })?;

    println!("Added prompt {} ({}).", prompt.id, prompt.name);
    Ok(())
}

pub fn edit(
    data_dir: &Path,
    id: &str,
    text: Option<String>,
    name: Option<String>,
    category: Option<String>,
    color: Option<String>,
    icon: Option<String>,
) -> Result<()> {
    check_icon(&icon)?;
    let store = open_store(data_dir)?;
    let Some(mut prompt) = store.get(id) else {
        bail!("No prompt with id {id}.");
    };

    if let Some(text) = text {
        prompt.text = text;
    }
    if let Some(name) = name {
        prompt.name = name;
    }
    if let Some(category) = category {
        prompt.category = category;
    }
    if let Some(color) = color {
        prompt.color = color;
    }
    if let Some(icon) = icon {
        prompt.icon = icon;
    }

    match store.update(prompt)? {
        MutationOutcome::Applied => println!("Updated prompt {id}."),
        _ => println!("Prompt {id} disappeared; nothing updated."),
    }
    Ok(())
}

pub fn remove(data_dir: &Path, id: &str) -> Result<()> {
    let store = open_store(data_dir)?;
    match store.remove(id)? {
        MutationOutcome::Applied => println!("Deleted prompt {id}."),
        _ => println!("No prompt with id {id}; nothing deleted."),
    }
    Ok(())
}

pub fn move_prompt(data_dir: &Path, id: &str, direction: Direction) -> Result<()> {
    let store = open_store(data_dir)?;
    match store.reorder(id, direction)? {
        MutationOutcome::Applied => println!("Moved prompt {id}."),
        MutationOutcome::AtBoundary => println!("Prompt {id} is already at that end."),
        MutationOutcome::NotFound => println!("No prompt with id {id}."),
    }
    Ok(())
}

pub fn copy(data_dir: &Path, id: &str) -> Result<()> {
    let store = open_store(data_dir)?;
    let Some(prompt) = store.get(id) else {
        bail!("No prompt with id {id}.");
    };

    clip::copy_text(&prompt.text)?;
    println!("Copied \"{}\" to the clipboard.", prompt.name);
    Ok(())
}

pub fn export(data_dir: &Path, path: Option<PathBuf>) -> Result<()> {
    let store = open_store(data_dir)?;
    let path = path.unwrap_or_else(|| PathBuf::from(transfer::export_file_name()));

    let prompts = store.prompts();
    let count = prompts.len();
    transfer::write_export(&path, prompts)?;
    println!("Exported {count} prompts to {}.", path.display());
    Ok(())
}

pub fn import(data_dir: &Path, path: &Path, replace: bool) -> Result<()> {
    let store = open_store(data_dir)?;
    let document = transfer::read_import(path)?;

    if replace {
        let count = document.prompts.len();
        store.replace_all(document.prompts)?;
        println!("Replaced collection with {count} imported prompts.");
    } else {
        let merged = store.merge_unique(document.prompts)?;
        if merged == 0 {
            println!("No new unique prompts found to merge.");
        } else {
            println!("Merged {merged} new prompts.");
        }
    }
    Ok(())
}

pub async fn models(_data_dir: &Path) -> Result<()> {
    let provider = provider()?;
    let models = provider
        .list_models()
        .await
        .context("could not fetch model list")?;

    for model in models {
        println!("{:<25} ({})", model.id, model.owned_by);
    }
    Ok(())
}

pub async fn categorize(data_dir: &Path, apply: bool) -> Result<()> {
    let store = open_store(data_dir)?;
    let settings = open_settings(data_dir)?;
    let provider = provider()?;

    let prompts = store.prompts();
    if prompts.is_empty() {
        println!("No prompts to categorize.");
        return Ok(());
    }

    let suggestions = provider
        .suggest_categories(&prompts, settings.settings().model_id())
        .await
        .context("category suggestion failed")?;
    if suggestions.is_empty() {
        println!("The model returned no suggestions.");
        return Ok(());
    }

    for suggestion in &suggestions {
        let name = store
            .get(&suggestion.prompt_id)
            .map(|p| p.name)
            .unwrap_or_else(|| suggestion.prompt_id.clone());
        println!("{:<30} -> {}", name, suggestion.category);
    }

    if apply {
        let applied = store.apply_categories(&suggestions)?;
        println!("Applied {applied} category changes.");
    }
    Ok(())
}

pub async fn enhance(
    data_dir: &Path,
    id: &str,
    feedback: Option<&str>,
    save: bool,
) -> Result<()> {
    let store = open_store(data_dir)?;
    let settings = open_settings(data_dir)?;
    let provider = provider()?;

    let Some(mut prompt) = store.get(id) else {
        bail!("No prompt with id {id}.");
    };

    let enhanced = provider
        .enhance_prompt(settings.settings().model_id(), &prompt.text, &[], feedback)
        .await
        .context("enhancement failed")?;

    println!("{enhanced}");

    if save {
        prompt.text = enhanced;
        match store.update(prompt)? {
            MutationOutcome::Applied => println!("\nSaved enhanced text to prompt {id}."),
            _ => println!("\nPrompt {id} disappeared; enhanced text not saved."),
        }
    }
    Ok(())
}

pub fn model(data_dir: &Path, id: Option<String>) -> Result<()> {
    let settings = open_settings(data_dir)?;

    match id {
        Some(id) => {
            settings.update_setting(|s| s.selected_model_id = Some(id.clone()));
            settings.save()?;
            println!("Selected model {id}.");
        }
        None => {
            let current = settings.settings();
            match current.selected_model_id {
                Some(id) => println!("{id}"),
                None => println!("{} (default)", current.model_id()),
            }
        }
    }
    Ok(())
}

pub fn key_set(value: &str) -> Result<()> {
    SecretStore::new().save(value)?;
    if value.is_empty() {
        println!("API key cleared.");
    } else {
        println!("API key stored in the OS keychain.");
    }
    Ok(())
}

pub fn key_clear() -> Result<()> {
    SecretStore::new().save("")?;
    println!("API key cleared.");
    Ok(())
}

pub fn key_status() -> Result<()> {
    match SecretStore::new().load()? {
        Some(_) => println!("An API key is stored."),
        None => println!("No API key stored."),
    }
    Ok(())
}
