// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-based category classification.
//!
//! Rules are evaluated in order and the first match wins. Filename rules are
//! checked before body rules within a category because file names are the
//! stronger signal. Misclassification is tolerated.

use pwnstore_core::Category;

/// Where a rule looks for its tokens.
#[derive(Debug, Clone, Copy)]
enum Scope {
    /// The lowercased file name only.
    Name,
    /// The lowercased source text followed by the file name.
    Text,
}

struct Rule {
    category: Category,
    scope: Scope,
    tokens: &'static [&'static str],
}

const RULES: &[Rule] = &[
    Rule {
        category: Category::Hardware,
        scope: Scope::Name,
        tokens: &["ups", "battery", "screen", "display", "ink", "oled", "bt", "ble"],
    },
    Rule {
        category: Category::Hardware,
        scope: Scope::Text,
        tokens: &[
            "bluetooth", "ble", "gpio", "i2c", "spi", "papirus", "waveshare", "inky",
        ],
    },
    Rule {
        category: Category::Social,
        scope: Scope::Text,
        tokens: &[
            "discord", "telegram", "twitter", "mastodon", "webhook", "slack", "pushover", "ntfy",
        ],
    },
    Rule {
        category: Category::Gps,
        scope: Scope::Name,
        tokens: &["gps", "geo", "loc"],
    },
    Rule {
        category: Category::Gps,
        scope: Scope::Text,
        tokens: &[
            "gpsd",
            "nmea",
            "coordinates",
            "latitude",
            "longitude",
            "geofence",
        ],
    },
    Rule {
        category: Category::Attack,
        scope: Scope::Text,
        tokens: &[
            "handshake",
            "deauth",
            "assoc",
            "crack",
            "brute",
            "pmkid",
            "pcap",
            "wardriving",
            "eapol",
        ],
    },
    Rule {
        category: Category::Display,
        scope: Scope::Text,
        tokens: &["ui.set", "ui.add", "canvas", "font", "faces", "render", "layout"],
    },
    Rule {
        category: Category::System,
        scope: Scope::Name,
        tokens: &["backup", "log", "ssh", "update", "clean"],
    },
    Rule {
        category: Category::System,
        scope: Scope::Text,
        tokens: &[
            "cpu_load",
            "mem_usage",
            "temperature",
            "shutdown",
            "reboot",
            "internet",
            "hotspot",
        ],
    },
];

/// Assigns a category to a plugin from its source text and file name.
pub fn classify(code: &str, filename: &str) -> Category {
    let name = filename.to_lowercase();
    let text = format!("{code} {filename}").to_lowercase();

    RULES
        .iter()
        .find(|rule| {
            let haystack = match rule.scope {
                Scope::Name => name.as_str(),
                Scope::Text => text.as_str(),
            };
            rule.tokens.iter().any(|token| haystack.contains(token))
        })
        .map_or(Category::General, |rule| rule.category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_hardware_beats_gps_body() {
        let code = "# reports gps coordinates from the ups hat\n";
        assert_eq!(classify(code, "ups_monitor.py"), Category::Hardware);
    }

    #[test]
    fn social_tokens_in_body() {
        assert_eq!(
            classify("requests.post(self.options['webhook_url'])", "notify.py"),
            Category::Social
        );
    }

    #[test]
    fn gps_from_filename() {
        assert_eq!(classify("pass", "geofencer.py"), Category::Gps);
    }

    #[test]
    fn gps_from_body() {
        assert_eq!(classify("import gpsd", "tracker.py"), Category::Gps);
    }

    #[test]
    fn attack_tokens() {
        assert_eq!(classify("def on_handshake(self):", "hs.py"), Category::Attack);
    }

    #[test]
    fn display_tokens() {
        assert_eq!(classify("ui.set('face', x)", "mood.py"), Category::Display);
    }

    #[test]
    fn system_from_filename() {
        assert_eq!(classify("pass", "auto_backup.py"), Category::System);
    }

    #[test]
    fn system_from_body() {
        assert_eq!(classify("os.system('reboot')", "x.py"), Category::System);
    }

    #[test]
    fn fallback_is_general() {
        assert_eq!(classify("pass", "x.py"), Category::General);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("TELEGRAM bot", "x.py"), Category::Social);
        assert_eq!(classify("pass", "OLED_Clock.py"), Category::Hardware);
    }
}
