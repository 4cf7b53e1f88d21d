//! Turning raw model text into game values.
//!
//! Models wrap JSON in markdown fences, add trailing commas, quote names
//! and pad answers with whitespace. Each parser here tolerates that and
//! returns `None` or an error only when nothing usable is left.

use menagerie_types::RandomEvent;

use crate::error::NarratorError;

/// Smallest coin grant a random event may carry.
pub const MIN_EVENT_COINS: u64 = 10;

/// Largest coin grant a random event may carry.
pub const MAX_EVENT_COINS: u64 = 100;

/// Longest name kept from a suggestion, in characters.
const MAX_NAME_CHARS: usize = 32;

#[derive(Debug, serde::Deserialize)]
struct RawEvent {
    message: String,
    #[serde(default)]
    coins: serde_json::Value,
}

/// Parse a random-event answer. Coins are clamped to
/// [`MIN_EVENT_COINS`]`..=`[`MAX_EVENT_COINS`]; a missing or non-numeric
/// coin field becomes the minimum.
pub fn parse_event(raw: &str) -> Result<RandomEvent, NarratorError> {
    let trimmed = raw.trim();

    let candidates = [
        Some(trimmed.to_owned()),
        extract_json_from_codeblock(trimmed).map(ToOwned::to_owned),
        extract_braced(trimmed).map(ToOwned::to_owned),
    ];

    for candidate in candidates.into_iter().flatten() {
        for text in [candidate.clone(), strip_trailing_commas(&candidate)] {
            if let Ok(event) = serde_json::from_str::<RawEvent>(&text) {
                return convert_event(event);
            }
        }
    }

    Err(NarratorError::Parse(format!(
        "no event object in: {trimmed}"
    )))
}

fn convert_event(raw: RawEvent) -> Result<RandomEvent, NarratorError> {
    let message = raw.message.trim().to_owned();
    if message.is_empty() {
        return Err(NarratorError::Parse("event message is empty".to_owned()));
    }
    Ok(RandomEvent {
        message,
        coins: clamp_coins(&raw.coins),
    })
}

fn clamp_coins(value: &serde_json::Value) -> u64 {
    let requested = match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|_negative| 0))
            .or_else(|| n.as_f64().map(float_coins)),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    requested
        .unwrap_or(MIN_EVENT_COINS)
        .clamp(MIN_EVENT_COINS, MAX_EVENT_COINS)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_coins(coins: f64) -> u64 {
    // Bounded before the cast.
    coins.round().clamp(0.0, 1000.0) as u64
}

/// Clean a name suggestion. Returns `None` when nothing is left.
pub fn clean_name(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty())?;
    let unquoted = line
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '*' | '`' | '.' | '!'))
        .trim();
    let name: String = unquoted.chars().take(MAX_NAME_CHARS).collect();
    let name = name.trim().to_owned();
    (!name.is_empty()).then_some(name)
}

/// Clean a fact answer. Returns `None` when the answer is blank.
pub fn clean_fact(raw: &str) -> Option<String> {
    let fact = raw.trim();
    (!fact.is_empty()).then(|| fact.to_owned())
}

/// Find the body of a markdown code block, with or without a `json` tag.
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = text.get(open.checked_add(3)?..)?;
    let body_start = after_fence.find('\n').and_then(|nl| nl.checked_add(1))?;
    let body = after_fence.get(body_start..)?;
    let end = body.find("```")?;
    body.get(..end).map(str::trim)
}

/// The span from the first `{` to the last `}`.
fn extract_braced(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}

/// Strip trailing commas before closing braces and brackets.
fn strip_trailing_commas(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ',' {
            let rest: String = chars.clone().skip_while(|n| n.is_whitespace()).take(1).collect();
            if rest == "}" || rest == "]" {
                continue;
            }
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_event() {
        let event = parse_event(r#"{"message": "A visitor left a gift!", "coins": 40}"#).unwrap();
        assert_eq!(event.message, "A visitor left a gift!");
        assert_eq!(event.coins, 40);
    }

    #[test]
    fn fenced_json_event() {
        let raw = "Here you go:\n```json\n{\"message\": \"Treasure!\", \"coins\": 55}\n```";
        let event = parse_event(raw).unwrap();
        assert_eq!(event.message, "Treasure!");
        assert_eq!(event.coins, 55);
    }

    #[test]
    fn trailing_comma_and_prose() {
        let raw = "Sure! {\"message\": \"Rainbow fish spotted\", \"coins\": 20,} Enjoy.";
        assert_eq!(parse_event(raw).unwrap().coins, 20);
    }

    #[test]
    fn coins_are_clamped() {
        let high = parse_event(r#"{"message": "Jackpot", "coins": 5000}"#).unwrap();
        assert_eq!(high.coins, MAX_EVENT_COINS);
        let low = parse_event(r#"{"message": "Penny", "coins": -3}"#).unwrap();
        assert_eq!(low.coins, MIN_EVENT_COINS);
        let float = parse_event(r#"{"message": "Tip", "coins": 42.6}"#).unwrap();
        assert_eq!(float.coins, 43);
        let text = parse_event(r#"{"message": "Tip", "coins": "25"}"#).unwrap();
        assert_eq!(text.coins, 25);
        let missing = parse_event(r#"{"message": "Tip"}"#).unwrap();
        assert_eq!(missing.coins, MIN_EVENT_COINS);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_event("I cannot help with that.").is_err());
        assert!(parse_event(r#"{"message": "   ", "coins": 10}"#).is_err());
    }

    #[test]
    fn names_are_trimmed_and_unquoted() {
        assert_eq!(clean_name("  \"Bubbles\"\n").unwrap(), "Bubbles");
        assert_eq!(clean_name("\n**Sir Fluff.**").unwrap(), "Sir Fluff");
        assert_eq!(clean_name("   \n  "), None);
        assert_eq!(clean_name(&"x".repeat(100)).unwrap().len(), MAX_NAME_CHARS);
    }

    #[test]
    fn blank_facts_are_rejected() {
        assert_eq!(clean_fact("  "), None);
        assert_eq!(clean_fact(" Cats sleep a lot. ").unwrap(), "Cats sleep a lot.");
    }

    #[test]
    fn strip_trailing_commas_keeps_inner_commas() {
        assert_eq!(strip_trailing_commas(r#"{"a": 1, "b": [2, 3,],}"#), r#"{"a": 1, "b": [2, 3]}"#);
    }
}
