use crate::Market;
use anyhow::{anyhow, Result};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};
use stockpick_structs::core::Action;
use tracing::{debug, warn};

enum Row {
    Valid(Action),
    Ignored,
    Malformed,
}

impl Market {
    pub fn from_csv_path(path: &Path, delimiter: char) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| anyhow!("Failed to open actions file {}: {}", path.display(), e))?;
        Self::from_reader(file, delimiter)
    }

    /// Reads actions from CSV with a header row and `name, price, return` columns.
    ///
    /// Rows that cannot be parsed are counted in `num_malformed`; rows with a
    /// non-positive price are counted in `num_ignored`. Neither reaches `actions`.
    pub fn from_reader<R: Read>(reader: R, delimiter: char) -> Result<Self> {
        let delimiter = ascii_delimiter(delimiter)?;
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut market = Market::default();
        for record in reader.records() {
            let record = record.map_err(|e| anyhow!("Failed to read CSV record: {}", e))?;
            match parse_row(&record) {
                Row::Valid(action) => market.actions.push(action),
                Row::Ignored => market.num_ignored += 1,
                Row::Malformed => {
                    warn!(line = record_line(&record), "skipping malformed action record");
                    market.num_malformed += 1;
                }
            }
        }
        debug!(
            actions = market.actions.len(),
            ignored = market.num_ignored,
            malformed = market.num_malformed,
            "loaded market"
        );
        Ok(market)
    }
}

/// Writes raw actions in the layout `Market::from_reader` expects.
pub fn write_actions_csv<W: Write>(writer: W, actions: &[Action], delimiter: char) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(ascii_delimiter(delimiter)?)
        .from_writer(writer);
    writer.write_record(["name", "price", "profit"])?;
    for action in actions {
        writer.write_record([
            action.name.clone(),
            format!("{:.2}", action.cost),
            format!("{:.2}", action.return_pct),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn ascii_delimiter(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(anyhow!(
            "Delimiter must be a single ASCII character, got '{}'",
            delimiter
        ))
    }
}

/// Line of the input the record starts on, counting quoted line breaks.
fn record_line(record: &StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}

fn parse_row(record: &StringRecord) -> Row {
    // `name,cost,pct%` packed into a single field of a semicolon separated file
    let fields: Vec<&str> = match record.len() {
        1 => record[0].split(',').map(str::trim).collect(),
        _ => record.iter().collect(),
    };
    if fields.len() < 3 {
        return Row::Malformed;
    }
    let name = fields[0];
    let cost = fields[1].parse::<f64>();
    let return_pct = fields[2].trim_end_matches('%').trim_end().parse::<f64>();
    match (cost, return_pct) {
        (Ok(cost), Ok(return_pct)) if cost.is_finite() && return_pct.is_finite() => {
            let action = Action::new(name, cost, return_pct);
            if action.is_candidate() {
                Row::Valid(action)
            } else {
                Row::Ignored
            }
        }
        _ => Row::Malformed,
    }
}
