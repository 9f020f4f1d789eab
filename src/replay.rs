//! Replay input - CSV command files for the engine.
//!
//! One command per row with header `action,id,side,price,qty`:
//!
//! ```text
//! action,id,side,price,qty
//! match,1,sell,100,10
//! match,2,buy,100,4
//! modify,1,,,0
//! ```
//!
//! `side` and `price` are only read for `match` rows.

use std::io::Read;

use serde::Deserialize;

use crate::command::{Command, Order, OrderId, Price, Quantity, Side};
use crate::error::BookError;

/// Errors raised while reading a replay file
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read replay input: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed replay row: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: unknown action `{action}`")]
    UnknownAction { line: u64, action: String },

    #[error("line {line}: unknown side `{side}`")]
    UnknownSide { line: u64, side: String },

    #[error("line {line}: missing `{field}` for {action}")]
    MissingField {
        line: u64,
        action: &'static str,
        field: &'static str,
    },

    #[error(transparent)]
    Book(#[from] BookError),
}

/// One raw CSV row
#[derive(Debug, Deserialize)]
pub struct ReplayRow {
    pub action: String,
    pub id: OrderId,
    pub side: Option<String>,
    pub price: Option<Price>,
    pub qty: Quantity,
}

impl ReplayRow {
    /// Convert the row into an engine command. `line` is used in errors.
    pub fn into_command(self, line: u64) -> Result<Command, ReplayError> {
        match self.action.trim().to_ascii_lowercase().as_str() {
            "match" | "new" => {
                let side = match self.side.as_deref().map(str::trim) {
                    Some(s) if s.eq_ignore_ascii_case("buy") || s.eq_ignore_ascii_case("b") => Side::Buy,
                    Some(s) if s.eq_ignore_ascii_case("sell") || s.eq_ignore_ascii_case("s") => Side::Sell,
                    Some(s) if !s.is_empty() => {
                        return Err(ReplayError::UnknownSide { line, side: s.to_string() });
                    }
                    _ => {
                        return Err(ReplayError::MissingField { line, action: "match", field: "side" });
                    }
                };
                let price = self.price.ok_or(ReplayError::MissingField {
                    line,
                    action: "match",
                    field: "price",
                })?;
                Ok(Command::Match(Order::new(self.id, side, price, self.qty)))
            }
            "modify" | "cancel" => Ok(Command::Modify {
                id: self.id,
                quantity: self.qty,
            }),
            _ => Err(ReplayError::UnknownAction { line, action: self.action }),
        }
    }
}

/// Read every command from CSV `input`, failing on the first bad row.
pub fn read_commands<R: Read>(input: R) -> Result<Vec<Command>, ReplayError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut commands = Vec::new();
    for (row, record) in reader.deserialize::<ReplayRow>().enumerate() {
        // Header is line 1
        let line = row as u64 + 2;
        commands.push(record?.into_command(line)?);
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_commands() {
        let csv = "action,id,side,price,qty\n\
                   match,1,sell,100,10\n\
                   match,2,BUY,100,4\n\
                   modify,1,,,0\n";
        let commands = read_commands(csv.as_bytes()).unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Match(Order::sell(1, 100, 10)),
                Command::Match(Order::buy(2, 100, 4)),
                Command::Modify { id: 1, quantity: 0 },
            ]
        );
    }

    #[test]
    fn test_unknown_action() {
        let csv = "action,id,side,price,qty\nreplace,1,buy,100,10\n";
        let err = read_commands(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ReplayError::UnknownAction { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_unknown_side() {
        let csv = "action,id,side,price,qty\nmatch,1,up,100,10\n";
        let err = read_commands(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ReplayError::UnknownSide { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_missing_price() {
        let csv = "action,id,side,price,qty\nmatch,1,buy,,10\n";
        let err = read_commands(csv.as_bytes()).unwrap_err();
        assert!(
            matches!(err, ReplayError::MissingField { field: "price", .. }),
            "{err}"
        );
    }

    #[test]
    fn test_malformed_number() {
        let csv = "action,id,side,price,qty\nmatch,x,buy,100,10\n";
        let err = read_commands(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ReplayError::Csv(_)), "{err}");
    }
}
