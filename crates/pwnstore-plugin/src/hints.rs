// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Advisory configuration hints from static analysis of plugin source.
//!
//! Plugins read their settings through `self.options['key']` or
//! `self.options.get('key', default)`. For every key found, the scanner
//! guesses a form field: its type from the key name, and options or defaults
//! from nearby literals. Output only enriches a configuration prompt; a wrong
//! guess never blocks an install.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Keys managed by pwnstore itself rather than the user.
const STRUCTURAL_KEYS: &[&str] = &["enabled"];

/// Fewer literals than this in a membership test is not a real choice.
const MIN_SELECT_OPTIONS: usize = 2;
const MAX_SELECT_OPTIONS: usize = 15;

/// A literal list assigned to a same-named variable needs this many items to
/// count as a multi-select.
const MIN_MULTISELECT_ITEMS: usize = 3;

static OPTION_READ_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"self\.options(?:\[|\.get\()\s*['"]([^'"]+)['"]"#).unwrap()
});

/// Reads from mappings that are clearly not plugin options (parsed HTTP
/// bodies and the like).
static FOREIGN_READ_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:\.json\(\)|\b(?:response|resp|res|r|data|payload|result|body))\s*(?:\[|\.get\()\s*['"]([^'"]+)['"]"#,
    )
    .unwrap()
});

static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).unwrap());

/// Form field type suggested for a configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldType {
    Text,
    Password,
    Url,
    Email,
    Number,
    Select,
    Multiselect,
}

/// One suggested configuration field for a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigHint {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub description: String,
    pub help: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Scans plugin source for option keys and describes each one.
pub fn scan_config_hints(code: &str) -> Vec<ConfigHint> {
    option_keys(code)
        .into_iter()
        .map(|key| analyze_field(&key, code))
        .collect()
}

/// User-configurable option keys read by the plugin, in order of first use.
pub fn option_keys(code: &str) -> Vec<String> {
    let foreign: HashSet<&str> = FOREIGN_READ_RE
        .captures_iter(code)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    let mut seen = HashSet::new();
    OPTION_READ_RE
        .captures_iter(code)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .filter(|key| !STRUCTURAL_KEYS.contains(key) && !foreign.contains(key))
        .filter(|key| seen.insert(*key))
        .map(str::to_string)
        .collect()
}

/// Name-only guess, used when no source text is available.
pub fn field_from_name(key: &str) -> ConfigHint {
    let mut hint = ConfigHint {
        key: key.to_string(),
        field_type: FieldType::Text,
        required: true,
        description: title_case(key),
        help: format!("Enter value for {key}"),
        placeholder: None,
        options: Vec::new(),
        default: None,
    };

    let lower = key.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if has(&["url", "webhook"]) {
        hint.field_type = FieldType::Url;
        hint.placeholder = Some("https://...".to_string());
        hint.help = "Enter the full URL".to_string();
    } else if has(&["api_key", "token", "secret", "password"]) {
        hint.field_type = FieldType::Password;
        hint.placeholder = Some("Your API key or token".to_string());
        hint.help = "Get from service provider".to_string();
    } else if has(&["enabled", "enable"]) {
        hint.field_type = FieldType::Select;
        hint.options = vec!["true".to_string(), "false".to_string()];
        hint.default = Some("true".to_string());
        hint.help = "Enable or disable this feature".to_string();
    } else if has(&["port", "timeout", "interval", "spacing"]) {
        hint.field_type = FieldType::Number;
        hint.placeholder = Some("0".to_string());
        hint.help = "Enter a number".to_string();
    } else if has(&["username", "name"]) {
        hint.placeholder = Some("Pwnagotchi".to_string());
        hint.help = "Display name".to_string();
    } else if has(&["email", "mail"]) {
        hint.field_type = FieldType::Email;
        hint.placeholder = Some("user@example.com".to_string());
        hint.help = "Enter email address".to_string();
    }

    hint
}

/// Refines the name-based guess with patterns found around `key` in `code`.
pub fn analyze_field(key: &str, code: &str) -> ConfigHint {
    let mut hint = field_from_name(key);
    let k = regex::escape(key);
    let option_read = format!(
        r#"self\.options(?:\[\s*['"]{k}['"]\s*\]|\.get\(\s*['"]{k}['"][^)]*\))"#
    );

    // Membership test against a short literal list: an enumerated choice.
    let membership = [
        format!(r"{option_read}\s+(?:not\s+)?in\s+[\[(]([^\])]+)[\])]"),
        format!(r"\b{k}\s+(?:not\s+)?in\s+[\[(]([^\])]+)[\])]"),
    ];
    for pattern in &membership {
        if let Some(list) = first_group(pattern, code, true) {
            let options = quoted_items(&list);
            if (MIN_SELECT_OPTIONS..=MAX_SELECT_OPTIONS).contains(&options.len()) {
                hint.field_type = FieldType::Select;
                hint.description = format!("Choose from: {}", options.join(", "));
                hint.options = options;
                break;
            }
        }
    }

    // A longer literal list bound to the same name: pick several.
    if hint.options.is_empty() {
        let lists = [
            format!(r"\b{k}\s*=\s*\[([^\]]+)\]"),
            format!(r#"self\.options\.get\(\s*['"]{k}['"]\s*,\s*\[([^\]]+)\]"#),
        ];
        for pattern in &lists {
            if let Some(list) = first_group(pattern, code, false) {
                let items = quoted_items(&list);
                if items.len() >= MIN_MULTISELECT_ITEMS {
                    hint.field_type = FieldType::Multiselect;
                    hint.description = format!("Available options: {}", items.join(", "));
                    hint.help = "Select multiple (comma-separated)".to_string();
                    hint.options = items;
                    break;
                }
            }
        }
    }

    // Default argument to `self.options.get`.
    let default_pattern = format!(
        r#"self\.options\.get\(\s*['"]{k}['"]\s*,\s*(?:['"]([^'"]*)['"]|(-?\d+(?:\.\d+)?)|\[([^\]]*)\]|(True|False))"#
    );
    if let Some(caps) = all_groups(&default_pattern, code) {
        match (&caps[0], &caps[1], &caps[2], &caps[3]) {
            (Some(text), ..) if !text.is_empty() => hint.default = Some(text.clone()),
            (_, Some(number), ..) => {
                hint.default = Some(number.clone());
                if hint.field_type == FieldType::Text {
                    hint.field_type = FieldType::Number;
                }
            }
            (_, _, Some(list), _) => {
                let items = quoted_items(list);
                if !items.is_empty() {
                    hint.default = Some(items.join(","));
                }
            }
            (_, _, _, Some(flag)) => {
                hint.default = Some(flag.to_lowercase());
            }
            _ => {}
        }
    }

    // Compared against a boolean literal: a true/false switch.
    let boolean = format!(r"{option_read}\s*(?:==|is)\s*(True|False)");
    let default_is_bool = matches!(hint.default.as_deref(), Some("true" | "false"));
    if hint.options.is_empty()
        && (default_is_bool || first_group(&boolean, code, false).is_some())
    {
        hint.field_type = FieldType::Select;
        hint.options = vec!["true".to_string(), "false".to_string()];
        if hint.default.is_none() {
            hint.default = Some("true".to_string());
        }
    }

    // `# key: some explanation` comments.
    let comment = format!(r"(?m)#\s*{k}:?\s+(.+)$");
    if let Some(text) = first_group(&comment, code, true) {
        let text = text.trim();
        let code_like = ["self.", "def ", "import ", "()", "[]"]
            .iter()
            .any(|marker| text.contains(marker));
        if text.len() > 10 && text.len() < 150 && !code_like {
            hint.description = text.to_string();
        }
    }

    hint
}

/// Python `str.title()` for snake_case keys: `api_key` becomes `Api Key`.
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn quoted_items(list: &str) -> Vec<String> {
    QUOTED_RE
        .captures_iter(list)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

fn build(pattern: &str, case_insensitive: bool) -> Option<Regex> {
    match RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::debug!(error = %e, "skipping hint pattern");
            None
        }
    }
}

fn first_group(pattern: &str, code: &str, case_insensitive: bool) -> Option<String> {
    let re = build(pattern, case_insensitive)?;
    re.captures(code)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn all_groups(pattern: &str, code: &str) -> Option<Vec<Option<String>>> {
    let re = build(pattern, false)?;
    let caps = re.captures(code)?;
    Some(
        (1..caps.len())
            .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_bracket_and_get_reads_in_order() {
        let code = r#"
def on_loaded(self):
    self.url = self.options['webhook_url']
    self.user = self.options.get("username", "pwny")
    again = self.options['webhook_url']
"#;
        assert_eq!(option_keys(code), vec!["webhook_url", "username"]);
    }

    #[test]
    fn skips_structural_and_foreign_keys() {
        let code = r#"
if self.options['enabled']:
    status = self.options.get('status')
    status = response.json()['status']
    token = self.options['token']
"#;
        assert_eq!(option_keys(code), vec!["token"]);
    }

    #[test]
    fn name_based_types() {
        assert_eq!(field_from_name("discord_webhook").field_type, FieldType::Url);
        assert_eq!(field_from_name("api_token").field_type, FieldType::Password);
        assert_eq!(field_from_name("bot_secret").field_type, FieldType::Password);
        assert_eq!(field_from_name("poll_interval").field_type, FieldType::Number);
        assert_eq!(field_from_name("port").field_type, FieldType::Number);
        assert_eq!(field_from_name("email").field_type, FieldType::Email);
        assert_eq!(field_from_name("position").field_type, FieldType::Text);
    }

    #[test]
    fn title_cases_description() {
        assert_eq!(field_from_name("api_key").description, "Api Key");
    }

    #[test]
    fn membership_test_becomes_select() {
        let code = r#"
mode = self.options.get('mode', 'compact')
if self.options['mode'] in ['compact', 'full', 'minimal']:
    pass
"#;
        let hint = analyze_field("mode", code);
        assert_eq!(hint.field_type, FieldType::Select);
        assert_eq!(hint.options, vec!["compact", "full", "minimal"]);
        assert_eq!(hint.default.as_deref(), Some("compact"));
    }

    #[test]
    fn literal_list_becomes_multiselect() {
        let code = r#"
fields = ['mem', 'cpu', 'temp', 'freq']
wanted = self.options.get('fields')
"#;
        let hint = analyze_field("fields", code);
        assert_eq!(hint.field_type, FieldType::Multiselect);
        assert_eq!(hint.options.len(), 4);
    }

    #[test]
    fn list_default_is_joined() {
        let code = "x = self.options.get('fields', ['mem', 'cpu', 'temp'])\n";
        let hint = analyze_field("fields", code);
        assert_eq!(hint.field_type, FieldType::Multiselect);
        assert_eq!(hint.default.as_deref(), Some("mem,cpu,temp"));
    }

    #[test]
    fn numeric_default_makes_number() {
        let code = "self.x = self.options.get('refresh', 30)\n";
        let hint = analyze_field("refresh", code);
        assert_eq!(hint.field_type, FieldType::Number);
        assert_eq!(hint.default.as_deref(), Some("30"));
    }

    #[test]
    fn boolean_comparison_makes_switch() {
        let code = "if self.options['verbose'] is True:\n    pass\n";
        let hint = analyze_field("verbose", code);
        assert_eq!(hint.field_type, FieldType::Select);
        assert_eq!(hint.options, vec!["true", "false"]);
        assert_eq!(hint.default.as_deref(), Some("true"));
    }

    #[test]
    fn comment_supplies_description() {
        let code = "# channel: the chat channel that receives alerts\nc = self.options['channel']\n";
        let hint = analyze_field("channel", code);
        assert_eq!(hint.description, "the chat channel that receives alerts");
    }

    #[test]
    fn code_like_comment_is_ignored() {
        let code = "# channel: self.options['channel'] value\n";
        let hint = analyze_field("channel", code);
        assert_eq!(hint.description, "Channel");
    }

    #[test]
    fn hint_serializes_type_field() {
        let hint = field_from_name("api_key");
        let json = serde_json::to_value(&hint).unwrap();
        assert_eq!(json["type"], "password");
        assert!(json.get("options").is_none());
    }

    #[test]
    fn scan_returns_one_hint_per_key() {
        let code = "a = self.options['api_key']\nb = self.options['api_key']\nc = self.options['port']\n";
        let hints = scan_config_hints(code);
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[1].field_type, FieldType::Number);
    }
}
