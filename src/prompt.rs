use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

/// Терминальные вопросы. Отдельный trait, чтобы flow можно было гонять
/// в тестах без настоящего терминала.
pub trait Prompter {
    /// Single choice from a fixed list, returns the chosen index.
    fn select(&mut self, message: &str, items: &[&str], default: usize) -> Result<usize>;

    /// Free text; an empty answer accepts the default when one is given.
    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String>;

    /// Hidden input, re-asked until non-empty.
    fn secret(&mut self, message: &str) -> Result<String>;

    /// Number; without a default the question is re-asked until the
    /// input parses.
    fn number(&mut self, message: &str, default: Option<u64>) -> Result<u64>;
}

pub struct TermPrompter {
    theme: ColorfulTheme,
}

impl TermPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for TermPrompter {
    fn select(&mut self, message: &str, items: &[&str], default: usize) -> Result<usize> {
        let idx = Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(items)
            .default(default)
            .interact()?;
        Ok(idx)
    }

    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn secret(&mut self, message: &str) -> Result<String> {
        loop {
            let value = rpassword::prompt_password(format!("{message}: "))?;
            if !value.trim().is_empty() {
                return Ok(value);
            }
            eprintln!("Secret is required!");
        }
    }

    fn number(&mut self, message: &str, default: Option<u64>) -> Result<u64> {
        let mut input = Input::<u64>::with_theme(&self.theme).with_prompt(message);
        if let Some(default) = default {
            input = input.default(default);
        }
        Ok(input.interact_text()?)
    }
}
