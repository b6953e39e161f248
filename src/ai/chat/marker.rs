//! Detection of the in-band lead marker the assistant emits once it
//! has collected every field:
//!
//! `[[LEAD|NAME:<name>|EMAIL:<email>|PHONE:<phone>|WORK:<type>|MSG:<text>]]`
//!
//! Matching is case-insensitive and each field may span lines. A
//! marker that doesn't parse cleanly is left in the text untouched.
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::models::Lead;

static LEAD_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\[\[LEAD\|NAME:(.*?)\|EMAIL:(.*?)\|PHONE:(.*?)\|WORK:(.*?)\|MSG:(.*?)\]\]")
        .expect("Invalid lead marker pattern")
});

/// The result of scanning one assistant reply.
#[derive(Debug, PartialEq)]
pub struct Extraction {
    /// What the user should see.
    pub display: String,
    pub lead: Option<Lead>,
}

/// Scan a reply for the first well-formed lead marker. When one is
/// found it is cut out of the display text and its fields returned as
/// a `Lead`, otherwise the reply is returned unmodified.
pub fn extract_lead(reply: &str) -> Extraction {
    let mut start = 0;
    while let Some(caps) = LEAD_MARKER.captures_at(reply, start) {
        // Group 0 always exists for a successful match
        let marker = caps.get(0).map(|m| m.range()).unwrap_or_default();

        let Some(lead) = lead_from_captures(&caps) else {
            tracing::warn!("Ignoring malformed lead marker at byte {}", marker.start);
            // `[` is one byte so this stays on a char boundary
            start = marker.start + 1;
            continue;
        };

        let display = format!("{}{}", &reply[..marker.start], &reply[marker.end..])
            .trim()
            .to_string();

        return Extraction {
            display,
            lead: Some(lead),
        };
    }

    Extraction {
        display: reply.to_string(),
        lead: None,
    }
}

fn lead_from_captures(caps: &Captures) -> Option<Lead> {
    let field = |i: usize| caps.get(i).map(|m| m.as_str().trim()).unwrap_or_default();
    let (name, email, phone, work, message) = (field(1), field(2), field(3), field(4), field(5));

    // The non-greedy match can't tell a delimiter from a value that
    // contains one, so ambiguous values reject the whole marker. MSG
    // is the last field and only ends at `]]`, so pipes are fine there.
    let delimited = [name, email, phone, work];
    if delimited.iter().any(|v| v.contains('|')) {
        return None;
    }
    let all = [name, email, phone, work, message];
    if all.iter().any(|v| v.is_empty() || v.contains("[[")) {
        return None;
    }

    Some(Lead {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        work: work.to_string(),
        message: message.to_string(),
    })
}
