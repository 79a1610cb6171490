//! Industries Command
//!
//! List the entries of the configured industry table.

use crate::cli::ui::Output;
use crate::cli::util::DisplayFormat;
use crate::config::ConfigLoader;
use crate::industry::IndustryTable;
use crate::types::Result;

pub fn run(format: DisplayFormat) -> Result<()> {
    let config = ConfigLoader::load()?;
    let table = IndustryTable::from_config(&config.industry)?;

    if format == DisplayFormat::Json {
        let entries: Vec<_> = table.iter().collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let out = Output::new();
    out.header(&format!("Industries ({})", table.len()));
    let default_code = table.default_entry().code.clone();
    for insight in table.iter() {
        let marker = if insight.code == default_code { " (default)" } else { "" };
        out.section(&format!("{}{}", insight.name, marker));
        out.field("code", &insight.code);
        out.field("peer average", format!("{:.1}%", insight.benchmarks.peer_average));
        out.field("top decile", format!("{:.1}%", insight.benchmarks.top_decile));
        if !insight.aliases.is_empty() {
            out.field("aliases", insight.aliases.join(", "));
        }
    }
    Ok(())
}
