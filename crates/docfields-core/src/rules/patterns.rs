//! Recognition patterns for French administrative documents.
//!
//! Patterns are compiled case-insensitive and multi-line by
//! [`FieldRuleSet`](super::FieldRuleSet); they carry no inline flags. The
//! value of a match is its first participating capture group. The regex
//! engine has no look-around, so boundaries around contextless values are
//! spelled out as consumed context outside the capture group.

use crate::fields::FieldName;

use super::RuleSpec;

// "ref", "réf", "référence", "numéro", "n°" followed by a code.
pub const REFERENCE_NUMBER: &str =
    r"(?:\b(?:r[ée]f[ée]rence|r[ée]f|num[ée]ro)\b\.?|\bn°)\s*:?\s*([A-Z0-9\-]+)";

// One or more words on the cue's line ("Nom de famille" counts as a cue).
pub const LAST_NAME: &str = r"\b(?:nom(?:[ \t]+de[ \t]+famille)?|famille)\b\s*:?\s*(\p{L}+(?:['\-]\p{L}+)*(?:[ \t]+\p{L}+(?:['\-]\p{L}+)*)*)";

pub const FIRST_NAME: &str = r"\bpr[ée]nom\b\s*:?\s*(\p{L}+(?:['\-]\p{L}+)*)";

// D[D] sep M[M] sep YY|YYYY, separators / - .
pub const DATE: &str = r"\b(\d{1,2}[/.\-]\d{1,2}[/.\-](?:\d{4}|\d{2}))\b";

// A number followed by a currency marker, a number with a two-digit decimal
// part, or a bare (optionally space-grouped) integer. None of them may be
// glued to letters or to a dotted, slashed or dashed run (dates, phone
// numbers, references). A bare integer may not sit next to another digit
// group either.
pub const AMOUNT: &str = concat!(
    r"(?:^|[^\w,./\-])",
    r"(?:",
    r"((?:\d{1,3}(?:[ \x{A0}.]\d{3})+|\d+)(?:[,.]\d{2})?)[ \t]*(?:€|eur(?:os?)?\b)",
    r"|",
    r"((?:\d{1,3}(?:[ \x{A0}]\d{3})+|\d+)[,.]\d{2})(?:$|[^\w,./\-]|[,.](?:\D|$))",
    r")",
    r"|",
    r"(?:^|[^\w\s,./\-]|(?:^|[^\d\s,./\-])[ \t\x{A0}]+)",
    r"(\d{1,3}(?:[ \x{A0}]\d{3})+|\d+)",
    r"(?:$|[^\w\s,./\-]|[ \t\x{A0}]+(?:$|[^\d\s])|[,.](?:\D|$))",
);

pub const TAX_ID: &str = r"\bsire[tn]\b\s*:?\s*(\d{14})\b";

pub const PHONE: &str = r"\bt[ée]l(?:[ée]phone)?\b\.?\s*:?\s*(\d{2}(?:[ \t.]?\d{2}){4})\b";

pub const EMAIL: &str = r"([a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,})";

// A digit-led first line, then whole continuation lines that hold no digit
// and no label colon. A blank line ends the address. CRLF line ends are
// accepted; `normalize_value` folds them to `\n`.
pub const ADDRESS: &str =
    r"\badresse\b\s*:?\s*(\d+[^\d\r\n]+(?:\r?\n[ \t]*[^\s\d:][^\d\r\n:]*\r?$)*)";

/// Built-in rule table, one entry per field.
pub const FRENCH_RULES: [RuleSpec<'static>; FieldName::COUNT] = [
    RuleSpec::new(FieldName::ReferenceNumber, REFERENCE_NUMBER),
    RuleSpec::new(FieldName::LastName, LAST_NAME),
    RuleSpec::new(FieldName::FirstName, FIRST_NAME),
    RuleSpec::new(FieldName::Date, DATE),
    RuleSpec::new(FieldName::Amount, AMOUNT),
    RuleSpec::new(FieldName::TaxId, TAX_ID),
    RuleSpec::new(FieldName::Phone, PHONE),
    RuleSpec::new(FieldName::Email, EMAIL),
    RuleSpec::new(FieldName::Address, ADDRESS),
];
