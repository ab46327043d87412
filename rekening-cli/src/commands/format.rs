//! Format command - run the amount field handlers on a piece of text

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use crate::output;
use rekening_core::config::Config;
use rekening_core::services::CurrencyInputFormatter;

use super::get_rekening_dir;

pub fn run(text: &str, json: bool) -> Result<()> {
    let locale = get_rekening_dir()
        .and_then(|dir| Config::load(&dir))
        .map(|c| c.locale)
        .unwrap_or_default();
    let formatter = CurrencyInputFormatter::new(locale);

    let typed = formatter.on_input(text);
    let blurred = formatter.on_blur(text);

    if json {
        return output::json(&json!({
            "input": text,
            "locale": locale.as_str(),
            "while_typing": typed,
            "on_blur": blurred,
        }));
    }

    println!("{} {}", "While typing:".bold(), typed);
    println!("{} {}", "On blur:     ".bold(), blurred);
    Ok(())
}
