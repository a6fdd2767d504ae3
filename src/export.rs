//! Delimited-table output shared by the extraction binaries.

use std::borrow::Cow;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delim {
    Tab,
    Comma,
}

impl Delim {
    fn as_str(self) -> &'static str {
        match self {
            Delim::Tab => "\t",
            Delim::Comma => ",",
        }
    }
}

pub fn write_row<W: Write, S: AsRef<str>>(
    out: &mut W,
    delim: Delim,
    fields: &[S],
) -> io::Result<()> {
    let mut first = true;
    for field in fields {
        if !first {
            out.write_all(delim.as_str().as_bytes())?;
        }
        first = false;
        let field = field.as_ref();
        match delim {
            Delim::Tab => out.write_all(field.as_bytes())?,
            Delim::Comma => out.write_all(csv_field(field).as_bytes())?,
        }
    }
    out.write_all(b"\n")
}

/// Quotes a CSV field only when it needs it.
pub fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Formats a stored f32, rendering NaN as `missing`.
pub fn fmt_value(value: f32, missing: &str) -> String {
    if value.is_nan() {
        missing.to_string()
    } else {
        format!("{value}")
    }
}
