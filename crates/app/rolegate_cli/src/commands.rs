use std::io::Read;
use std::path::Path;

use rolegate_core::access::AccessChecker;
use rolegate_core::models::Permission;
use rolegate_core::rules::{self, Rule};

use crate::Result;
use crate::cli::RuleSource;

/// Exit status for a denied `check`.
pub const DENIED: i32 = 2;

fn read_text(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Input files usually end with a newline; it is not a rule of its own.
fn load_rules(source: &RuleSource) -> Result<(String, Vec<Rule>)> {
    let text = read_text(&source.file)?;
    let text = text.strip_suffix('\n').unwrap_or(&text);
    let text = text.strip_suffix('\r').unwrap_or(text).to_string();
    log::debug!("loaded {} bytes from {}", text.len(), source.file.display());
    let parsed = rules::parse(&text, &source.default_methods);
    Ok((text, parsed))
}

pub fn parse(source: &RuleSource) -> Result<i32> {
    let (_, parsed) = load_rules(source)?;
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(0)
}

pub fn normalize(source: &RuleSource) -> Result<i32> {
    let (_, parsed) = load_rules(source)?;
    println!("{}", rules::encode(&parsed));
    Ok(0)
}

pub fn render(source: &RuleSource, prefix: &str) -> Result<i32> {
    let (_, parsed) = load_rules(source)?;
    println!("{}", rules::render(&parsed, prefix));
    Ok(0)
}

pub fn check(source: &RuleSource, method: &str, path: &str, prefix: &str) -> Result<i32> {
    let (text, parsed) = load_rules(source)?;
    log::debug!("checking {method} {path} against {} rule(s)", parsed.len());

    let permission = Permission {
        id: 0,
        slug: source.file.display().to_string(),
        name: source.file.display().to_string(),
        http_method: source.default_methods.clone(),
        http_path: text,
        created_at: None,
        updated_at: None,
    };
    let allowed = AccessChecker::new(prefix).permission_allows(&permission, method, path);

    println!("{}", if allowed { "allow" } else { "deny" });
    Ok(if allowed { 0 } else { DENIED })
}
