//! Line-oriented parser turning a model reply into [`Hotspot`] records.
//!
//! Expected shape:
//!
//! ```text
//! Hotspot 1: Ball
//! - Option 1: Roll
//! - Option 2: Bounce
//! ```
//!
//! Matching is case-insensitive on the `hotspot` / `option` keywords. Lines
//! matching neither are ignored, and options seen before the first header are
//! dropped.

use crate::models::Hotspot;
use crate::{Error, Result};

const SEPARATOR: &str = ": ";

pub fn parse_hotspots(text: &str) -> Result<Vec<Hotspot>> {
    let mut hotspots = Vec::new();
    let mut current: Option<Hotspot> = None;

    for (index, line) in text.lines().enumerate() {
        if !line.contains(':') {
            continue;
        }
        let lower = line.to_lowercase();

        if lower.contains("hotspot") {
            let name = value_after_separator(line, index)?;
            if let Some(done) = current.replace(Hotspot::new(name)) {
                hotspots.push(done);
            }
        } else if lower.contains("option") {
            if let Some(hotspot) = current.as_mut() {
                let option = value_after_separator(line, index)?;
                hotspot.options.push(option.to_string());
            }
        }
    }

    hotspots.extend(current);
    Ok(hotspots)
}

fn value_after_separator(line: &str, index: usize) -> Result<&str> {
    line.split_once(SEPARATOR)
        .map(|(_, value)| value)
        .ok_or_else(|| Error::Parse {
            line: index + 1,
            content: line.to_string(),
        })
}
