//! Final summary line built from the `result` record.
//!
//! Producers have renamed the cost and token fields over time, so each value
//! is read from a list of aliases in a fixed priority order. The first alias
//! holding a non-zero number wins; if none does the value is zero.

use colored::Colorize;
use serde_json::Value;

use crate::event::is_set;

const COST_FIELDS: [&str; 2] = ["/total_cost_usd", "/cost_usd"];

const INPUT_TOKEN_FIELDS: [&str; 4] = [
    "/total_input_tokens",
    "/input_tokens",
    "/usage/input_tokens",
    "/session_input_tokens",
];

const OUTPUT_TOKEN_FIELDS: [&str; 4] = [
    "/total_output_tokens",
    "/output_tokens",
    "/usage/output_tokens",
    "/session_output_tokens",
];

/// Width of the rule printed above the summary line.
const RULE_WIDTH: usize = 40;

/// Totals reported by the producer's final `result` record.
#[derive(Debug, Clone, PartialEq)]
pub struct RunTotals {
    pub elapsed_secs: u64,
    pub cost_usd: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl RunTotals {
    pub fn from_record(record: &Value) -> Self {
        let elapsed_ms = record
            .get("duration_ms")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        Self {
            elapsed_secs: (elapsed_ms / 1000.0).floor().max(0.0) as u64,
            cost_usd: first_set(record, &COST_FIELDS)
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
            input_tokens: first_set(record, &INPUT_TOKEN_FIELDS)
                .map(as_count)
                .unwrap_or(0),
            output_tokens: first_set(record, &OUTPUT_TOKEN_FIELDS)
                .map(as_count)
                .unwrap_or(0),
        }
    }
}

fn first_set<'a>(record: &'a Value, pointers: &[&str]) -> Option<&'a Value> {
    pointers
        .iter()
        .filter_map(|p| record.pointer(p))
        .find(|v| is_set(v))
}

fn as_count(value: &Value) -> u64 {
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|f| f.max(0.0) as u64))
        .unwrap_or(0)
}

/// Format whole seconds as `Xm Ys`, or `Ys` under a minute.
pub fn format_elapsed(secs: u64) -> String {
    let minutes = secs / 60;
    let seconds = secs % 60;
    if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Group digits in threes: `1234567` -> `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format the closing summary: two blank lines, a rule, and the totals line.
///
/// Returned as separate lines for `emit_line`.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use stream_transcript::{RunTotals, format_summary};
///
/// colored::control::set_override(false);
/// let totals = RunTotals::from_record(&json!({"duration_ms": 4200, "cost_usd": 0.02}));
/// let lines = format_summary(&totals, 2);
/// assert_eq!(
///     lines.last().unwrap(),
///     "✅ Done in 4s | Cost: $0.0200 | Tokens: ↓0 ↑0 | Tools: 2"
/// );
/// colored::control::unset_override();
/// ```
pub fn format_summary(totals: &RunTotals, tool_uses: u64) -> Vec<String> {
    vec![
        String::new(),
        String::new(),
        "━".repeat(RULE_WIDTH),
        format!(
            "{} in {} | Cost: ${:.4} | Tokens: ↓{} ↑{} | Tools: {}",
            "✅ Done".green(),
            format_elapsed(totals.elapsed_secs),
            totals.cost_usd,
            group_thousands(totals.input_tokens),
            group_thousands(totals.output_tokens),
            tool_uses
        ),
    ]
}
