// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mutating commands: `install`, `uninstall`, `upgrade`, `configure`, plus
//! the read-only `hints` that goes with them.

use std::io::{BufRead, Write};

use pwnstore_core::{config_key_prefix, PwnstoreError};
use pwnstore_plugin::ConfigHint;
use pwnstore_store::{Engine, InstallOutcome, PendingUpgrade, UpgradeReport};

use crate::output::Printer;

/// Run `pwnstore install <name>`.
pub async fn run_install(engine: &Engine, name: &str, out: &Printer) -> Result<(), PwnstoreError> {
    println!("Installing {name}...");
    let outcome = engine.install(name).await?;
    report_install(&outcome, out);
    out.warning("Restart pwnagotchi to load the plugin.");
    Ok(())
}

fn report_install(outcome: &InstallOutcome, out: &Printer) {
    let action = if outcome.reinstall { "Reinstalled" } else { "Installed" };
    out.success(&format!("{action} {} to {}", outcome.name, outcome.path.display()));

    if !outcome.hints.is_empty() {
        println!();
        println!("{}", out.heading("CONFIGURATION REQUIRED"));
        println!("Add these settings to your config.toml:");
        for line in hint_block(&outcome.name, &outcome.hints) {
            println!("  {line}");
        }
    }
}

/// `main.plugins.<name>.<key> = "<value>"` lines for first-install guidance.
fn hint_block(name: &str, hints: &[ConfigHint]) -> Vec<String> {
    let prefix = config_key_prefix(name);
    hints
        .iter()
        .map(|hint| {
            let value = hint
                .default
                .as_deref()
                .or(hint.placeholder.as_deref())
                .unwrap_or("...");
            format!("{prefix}{} = \"{value}\"", hint.key)
        })
        .collect()
}

/// Run `pwnstore uninstall <name>`.
pub async fn run_uninstall(engine: &Engine, name: &str, out: &Printer) -> Result<(), PwnstoreError> {
    let outcome = engine.uninstall(name).await?;
    out.success(&format!(
        "Removed {} ({} config lines cleaned)",
        outcome.name, outcome.removed_keys
    ));
    out.warning("Restart pwnagotchi to apply.");
    Ok(())
}

/// Run `pwnstore upgrade`.
pub async fn run_upgrade(engine: &Engine, out: &Printer) -> Result<(), PwnstoreError> {
    println!("Checking for updates...");
    let report = engine
        .upgrade(|pending| {
            let stdin = std::io::stdin();
            confirm_upgrades(pending, &mut stdin.lock(), out)
        })
        .await?;

    match report {
        UpgradeReport::UpToDate => out.success("All plugins are up to date."),
        UpgradeReport::Cancelled(_) => out.warning("Upgrade cancelled."),
        UpgradeReport::Applied { upgraded, failed } => {
            for outcome in &upgraded {
                out.success(&format!("Upgraded {}", outcome.name));
            }
            for (name, err) in &failed {
                out.failure(&format!("Failed to upgrade {name}: {err}"));
            }
            if !upgraded.is_empty() {
                out.warning("Restart pwnagotchi to load the new versions.");
            }
        }
    }
    Ok(())
}

/// Lists pending upgrades and asks `(Y/n)`. Read errors and end of input
/// count as a no.
fn confirm_upgrades(pending: &[PendingUpgrade], input: &mut impl BufRead, out: &Printer) -> bool {
    println!("{}", out.heading(&format!("{} updates available:", pending.len())));
    for item in pending {
        let note = if item.is_downgrade() { " (downgrade)" } else { "" };
        println!("  • {}: v{} -> v{}{note}", item.name, item.local, item.remote);
    }
    print!("Upgrade all? (Y/n) ");
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => accepts(&answer),
    }
}

fn accepts(answer: &str) -> bool {
    let answer = answer.trim();
    answer.is_empty() || answer.eq_ignore_ascii_case("y")
}

/// Run `pwnstore configure <name> key=value...`.
pub async fn run_configure(
    engine: &Engine,
    name: &str,
    pairs: &[String],
    out: &Printer,
) -> Result<(), PwnstoreError> {
    let values = parse_pairs(pairs)?;
    engine.configure(name, values).await?;
    out.success(&format!("{name} configured successfully"));
    out.warning("Restart pwnagotchi to apply.");
    Ok(())
}

fn parse_pairs(pairs: &[String]) -> Result<Vec<(String, String)>, PwnstoreError> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(PwnstoreError::Validation(format!(
                "expected key=value, got '{pair}'"
            ))),
        })
        .collect()
}

/// Run `pwnstore hints <name>`.
pub fn run_hints(engine: &Engine, name: &str, out: &Printer) -> Result<(), PwnstoreError> {
    let hints = engine.config_hints(name)?;
    if hints.is_empty() {
        out.success(&format!("{name} reads no configuration options"));
        return Ok(());
    }

    let prefix = config_key_prefix(name);
    for hint in &hints {
        println!("{}", out.name(&format!("{prefix}{}", hint.key), 0));
        println!("    type: {}  {}", hint.field_type, hint.description);
        if !hint.options.is_empty() {
            println!("    options: {}", hint.options.join(", "));
        }
        if let Some(default) = &hint.default {
            println!("    default: {default}");
        }
        println!("    {}", out.dim(&hint.help));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwnstore_plugin::scan_config_hints;

    fn pending(name: &str) -> PendingUpgrade {
        PendingUpgrade {
            name: name.to_string(),
            local: "1.0".to_string(),
            remote: "2.0".to_string(),
            author: "a".to_string(),
        }
    }

    #[test]
    fn empty_and_yes_accept() {
        assert!(accepts("\n"));
        assert!(accepts("y\n"));
        assert!(accepts("Y"));
        assert!(!accepts("n\n"));
        assert!(!accepts("yes please"));
    }

    #[test]
    fn end_of_input_declines() {
        let mut input: &[u8] = b"";
        assert!(!confirm_upgrades(&[pending("x")], &mut input, &Printer::plain()));

        let mut input: &[u8] = b"\n";
        assert!(confirm_upgrades(&[pending("x")], &mut input, &Printer::plain()));
    }

    #[test]
    fn pairs_split_on_first_equals() {
        let pairs = vec!["url=http://h/?a=b".to_string(), " port = 80".to_string()];
        assert_eq!(
            parse_pairs(&pairs).unwrap(),
            vec![
                ("url".to_string(), "http://h/?a=b".to_string()),
                ("port".to_string(), "80".to_string()),
            ]
        );
        assert!(matches!(
            parse_pairs(&["novalue".to_string()]),
            Err(PwnstoreError::Validation(_))
        ));
    }

    #[test]
    fn hint_block_prefers_defaults() {
        let code = "a = self.options.get('port', 8080)\nb = self.options['api_key']\n";
        let lines = hint_block("x", &scan_config_hints(code));
        assert_eq!(lines[0], "main.plugins.x.port = \"8080\"");
        assert!(lines[1].starts_with("main.plugins.x.api_key = "));
    }
}
