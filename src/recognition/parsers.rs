//! Response parsers
//!
//! One pure function per category, turning the service's JSON response into
//! the text block shown to the user. Every block starts with a title line and
//! a separator; percentages are rendered with two decimals.

use serde_json::{Map, Value};

use super::error::RecognitionError;

type ParseResult = Result<String, RecognitionError>;

/// Separator line under each result title
const SEPARATOR: &str = "--------------------";

/// Literal the service puts in business license fields that have no value
const NO_VALUE_LITERALS: [&str; 2] = ["无", "None"];

/// Shown for ID card fields the service returned empty
const EMPTY_PLACEHOLDER: &str = "None";

/// Driving license key holding the validity start date
const VALIDITY_START_KEY: &str = "有效期限";

/// Driving license key holding the validity end date
const VALIDITY_END_KEY: &str = "至";

/// Bank card details
pub fn bank_card(data: &Value) -> ParseResult {
    let result = field(data, "result")?;

    let card_type = match as_int(field(result, "bank_card_type")?) {
        Some(1) => "Debit card",
        Some(2) => "Credit card",
        _ => "Unrecognized",
    };

    let lines = [
        "Bank card recognition result:".to_string(),
        SEPARATOR.to_string(),
        format!("Card number: {}", text(field(result, "bank_card_number")?)?),
        format!("Bank: {}", text(field(result, "bank_name")?)?),
        format!("Type: {}", card_type),
    ];

    Ok(lines.join("\n"))
}

/// Plant classification candidates
pub fn plant(data: &Value) -> ParseResult {
    ranked_matches("Recognized plants:", data)
}

/// Animal classification candidates
pub fn animal(data: &Value) -> ParseResult {
    ranked_matches("Recognized animals:", data)
}

fn ranked_matches(title: &str, data: &Value) -> ParseResult {
    let mut lines = vec![title.to_string(), SEPARATOR.to_string()];

    for (idx, entry) in array(data, "result")?.iter().enumerate() {
        let name = text(field(entry, "name")?)?;
        let similarity = score(field(entry, "score")?)?;
        lines.push(format!(
            "{}. {}\nSimilarity: {}\n",
            idx + 1,
            name,
            percent(similarity)
        ));
    }

    Ok(lines.join("\n"))
}

/// General receipt text
pub fn receipt(data: &Value) -> ParseResult {
    let words = array(data, "words_result")?
        .iter()
        .map(|entry| field(entry, "words").and_then(text))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(format!(
        "Receipt recognition result:\n{}\n{}",
        SEPARATOR,
        words.join("  ")
    ))
}

/// Business license fields, without the ones the service marked as absent
pub fn business_license(data: &Value) -> ParseResult {
    let mut lines = vec![
        "Business license recognition result:".to_string(),
        SEPARATOR.to_string(),
    ];

    for (key, words) in word_fields(data)? {
        if words.is_empty() || NO_VALUE_LITERALS.contains(&words.as_str()) {
            continue;
        }
        lines.push(format!("{}: {}", key, words));
    }

    Ok(lines.join("\n"))
}

/// Front side of an ID card; empty fields are kept with a placeholder
pub fn id_card(data: &Value) -> ParseResult {
    let mut lines = vec![
        "ID card recognition result:".to_string(),
        SEPARATOR.to_string(),
    ];

    for (key, words) in word_fields(data)? {
        let words = if words.is_empty() {
            EMPTY_PLACEHOLDER.to_string()
        } else {
            words
        };
        lines.push(format!("{}: {}", key, words));
    }

    Ok(lines.join("\n"))
}

/// License plate number
pub fn license_plate(data: &Value) -> ParseResult {
    let number = text(field(field(data, "words_result")?, "number")?)?;
    Ok(format!(
        "License plate recognition result:\n{}\n{}",
        SEPARATOR,
        number
    ))
}

/// Driving license fields, with the validity period merged into one line
pub fn driving_license(data: &Value) -> ParseResult {
    let fields = word_fields(data)?;

    let lookup = |key: &str| {
        fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, words)| words.clone())
            .ok_or_else(|| RecognitionError::malformed(format!("missing field '{}'", key)))
    };
    let start = lookup(VALIDITY_START_KEY)?;
    let end = lookup(VALIDITY_END_KEY)?;

    let mut lines = vec![
        "Driving license recognition result:".to_string(),
        SEPARATOR.to_string(),
    ];
    lines.extend(
        fields
            .iter()
            .filter(|(key, _)| *key != VALIDITY_START_KEY && *key != VALIDITY_END_KEY)
            .map(|(key, words)| format!("{}: {}", key, words)),
    );
    lines.push(format!("Valid from {} to {}", start, end));

    Ok(lines.join("\n"))
}

/// Vehicle license fields
pub fn vehicle_license(data: &Value) -> ParseResult {
    let mut lines = vec![
        "Vehicle license recognition result:".to_string(),
        SEPARATOR.to_string(),
    ];

    lines.extend(
        word_fields(data)?
            .into_iter()
            .filter(|(_, words)| !words.is_empty())
            .map(|(key, words)| format!("{}: {}", key, words)),
    );

    Ok(lines.join("\n"))
}

/// Car model candidates, preceded by the body color
pub fn car(data: &Value) -> ParseResult {
    let mut lines = vec![
        format!("Body color: {}", text(field(data, "color_result")?)?),
        "Recognized cars:".to_string(),
        SEPARATOR.to_string(),
    ];

    for entry in array(data, "result")? {
        let name = text(field(entry, "name")?)?;
        let year = text(field(entry, "year")?)?;
        let confidence = score(field(entry, "score")?)?;
        lines.push(format!(
            "Model: {}\nYear: {}\nConfidence: {}\n",
            name,
            year,
            percent(confidence)
        ));
    }

    Ok(lines.join("\n"))
}

/// Logo matches, one entry per brand at its best probability
pub fn logo(data: &Value) -> ParseResult {
    let mut brands: Vec<(String, f64)> = Vec::new();

    for entry in array(data, "result")? {
        let name = text(field(entry, "name")?)?;
        let probability = score(field(entry, "probability")?)?;

        match brands.iter_mut().find(|(n, _)| *n == name) {
            Some((_, best)) if probability > *best => *best = probability,
            Some(_) => {}
            None => brands.push((name, probability)),
        }
    }

    let mut lines = vec!["Recognized brands:".to_string(), SEPARATOR.to_string()];
    lines.extend(
        brands
            .iter()
            .map(|(name, p)| format!("Brand: {}\nConfidence: {}\n", name, percent(*p))),
    );

    Ok(lines.join("\n"))
}

fn field<'a>(data: &'a Value, key: &str) -> Result<&'a Value, RecognitionError> {
    data.get(key)
        .ok_or_else(|| RecognitionError::malformed(format!("missing field '{}'", key)))
}

fn array<'a>(data: &'a Value, key: &str) -> Result<&'a Vec<Value>, RecognitionError> {
    field(data, key)?
        .as_array()
        .ok_or_else(|| RecognitionError::malformed(format!("field '{}' is not an array", key)))
}

fn object<'a>(data: &'a Value, key: &str) -> Result<&'a Map<String, Value>, RecognitionError> {
    field(data, key)?
        .as_object()
        .ok_or_else(|| RecognitionError::malformed(format!("field '{}' is not an object", key)))
}

/// `words_result` entries as (field name, words), in response order
fn word_fields(data: &Value) -> Result<Vec<(&str, String)>, RecognitionError> {
    object(data, "words_result")?
        .iter()
        .map(|(key, value)| Ok((key.as_str(), text(field(value, "words")?)?)))
        .collect()
}

/// Render a string or number without JSON quoting; null renders empty
fn text(value: &Value) -> Result<String, RecognitionError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(RecognitionError::malformed(format!("expected a string, got {}", other))),
    }
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Scores arrive as numbers or numeric strings depending on the endpoint
fn score(value: &Value) -> Result<f64, RecognitionError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| RecognitionError::malformed(format!("invalid score {}", value)))
}

fn percent(score: f64) -> String {
    format!("{:.2}%", score * 100.0)
}
