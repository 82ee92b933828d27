//! Check the content directory against the built-in sample posts

use anyhow::Result;

use crate::Folio;

/// Print the consistency report as JSON; returns whether the content is consistent
pub fn run(folio: &Folio) -> Result<bool> {
    let report = folio.validate();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(report.valid)
}
