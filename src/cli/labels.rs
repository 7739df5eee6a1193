//! CLI entry-point listing the entity label set.

use anyhow::Result;

use crate::nlp::ner::EntityLabel;

pub fn run() -> Result<()> {
    for label in EntityLabel::ALL {
        println!(
            "{:<14} {:<22} {}",
            label,
            label.name(),
            label.color()
        );
    }
    Ok(())
}
