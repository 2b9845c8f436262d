//! CSV order file loading and per-row validation.
//!
//! Every data row produces exactly one [`RowOutcome`], in file order. A bad
//! row never aborts the load: its error is attached to the outcome and the
//! next row is parsed as usual. Only failures to open or read the file as a
//! whole are returned as [`LoadError`].
//!
//! ```
//! use orderbridge::loader;
//!
//! let csv = "Action,Quantity,Symbol\nBUY,10,AAPL\nHOLD,5,MSFT\n";
//! let outcomes = loader::load_str(csv).unwrap();
//!
//! assert_eq!(outcomes.len(), 2);
//! assert!(outcomes[0].is_valid());
//! assert_eq!(outcomes[0].row, 2); // header is row 1
//! assert!(!outcomes[1].is_valid());
//! ```

use std::fs::File;
use std::io;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, StringRecord};
use rust_decimal::Decimal;

use crate::error::{LoadError, ValidationError};
use crate::order::{OrderRecord, OrderType, RecordParts};
use crate::{Action, TimeInForce};

/// Result of loading one CSV data row.
#[derive(Clone, Debug)]
pub struct RowOutcome {
    /// 1-based line in the file; the header is row 1.
    pub row: usize,
    /// Cells as they appeared in the file, for error reporting.
    pub raw: Vec<String>,
    pub result: Result<OrderRecord, ValidationError>,
}

impl RowOutcome {
    /// True if the row produced a valid order.
    pub fn is_valid(&self) -> bool {
        self.result.is_ok()
    }

    pub fn order(&self) -> Option<&OrderRecord> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.result.as_ref().err()
    }

    /// Ticker as written in the row, even when validation failed.
    pub fn raw_symbol(&self, columns: &Columns) -> Option<String> {
        columns
            .symbol
            .and_then(|i| self.raw.get(i))
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
    }
}

/// Positions of the known columns within the header row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Columns {
    action: Option<usize>,
    quantity: Option<usize>,
    symbol: Option<usize>,
    sec_type: Option<usize>,
    exchange: Option<usize>,
    currency: Option<usize>,
    time_in_force: Option<usize>,
    order_type: Option<usize>,
    lmt_price: Option<usize>,
    aux_price: Option<usize>,
    account: Option<usize>,
}

impl Columns {
    /// Map header names to positions. Unknown columns are ignored.
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut columns = Columns::default();
        for (idx, name) in headers.iter().enumerate() {
            let name = name.trim_start_matches('\u{feff}').trim();
            let slot = match name.to_ascii_lowercase().as_str() {
                "action" => &mut columns.action,
                "quantity" => &mut columns.quantity,
                "symbol" => &mut columns.symbol,
                "sectype" => &mut columns.sec_type,
                "exchange" => &mut columns.exchange,
                "currency" => &mut columns.currency,
                "timeinforce" => &mut columns.time_in_force,
                "ordertype" => &mut columns.order_type,
                "lmtprice" => &mut columns.lmt_price,
                "auxprice" => &mut columns.aux_price,
                "account" => &mut columns.account,
                _ => continue,
            };
            // First occurrence wins on duplicate headers.
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
        columns
    }

    /// Trimmed, non-empty cell value.
    fn cell<'r>(&self, record: &'r StringRecord, idx: Option<usize>) -> Option<&'r str> {
        idx.and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn required<'r>(
        &self,
        record: &'r StringRecord,
        idx: Option<usize>,
        name: &'static str,
    ) -> Result<&'r str, ValidationError> {
        self.cell(record, idx)
            .ok_or(ValidationError::MissingField(name))
    }

    /// Validate one data row into an order record.
    pub fn parse(&self, record: &StringRecord) -> Result<OrderRecord, ValidationError> {
        let action: Action = self.required(record, self.action, "Action")?.parse()?;
        let quantity_raw = self.required(record, self.quantity, "Quantity")?;
        let symbol = self
            .required(record, self.symbol, "Symbol")?
            .to_ascii_uppercase();

        if too_precise(quantity_raw) {
            return Err(ValidationError::QuantityTooPrecise(quantity_raw.to_string()));
        }
        let quantity = parse_decimal(quantity_raw)
            .ok_or_else(|| ValidationError::InvalidQuantity(quantity_raw.to_string()))?;
        if quantity <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveQuantity(quantity_raw.to_string()));
        }

        let order_type = self.order_type(record)?;

        let time_in_force = self
            .cell(record, self.time_in_force)
            .map(TimeInForce::parse_lenient)
            .unwrap_or_default();

        let exchange = self
            .cell(record, self.exchange)
            .and_then(|s| s.split('/').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_ascii_uppercase);

        Ok(OrderRecord::from_parts(RecordParts {
            action,
            quantity,
            symbol,
            sec_type: self.cell(record, self.sec_type).map(str::to_ascii_uppercase),
            exchange,
            currency: self.cell(record, self.currency).map(str::to_ascii_uppercase),
            time_in_force,
            order_type,
            account: self.cell(record, self.account).map(str::to_string),
        }))
    }

    fn order_type(&self, record: &StringRecord) -> Result<OrderType, ValidationError> {
        let Some(kind) = self.cell(record, self.order_type) else {
            return Ok(OrderType::Market);
        };

        match kind.to_ascii_uppercase().as_str() {
            "MKT" | "MARKET" => Ok(OrderType::Market),
            "LMT" | "LIMIT" => {
                let raw = self.cell(record, self.lmt_price).unwrap_or_default();
                positive_decimal(raw)
                    .map(OrderType::Limit)
                    .ok_or_else(|| ValidationError::InvalidLimitPrice(raw.to_string()))
            }
            "STP" | "STOP" => {
                let raw = self.cell(record, self.aux_price).unwrap_or_default();
                positive_decimal(raw)
                    .map(OrderType::Stop)
                    .ok_or_else(|| ValidationError::InvalidStopPrice(raw.to_string()))
            }
            _ => Err(ValidationError::InvalidOrderType(kind.to_string())),
        }
    }
}

/// Parse a decimal, accepting plain (`250.50`) and scientific (`1e2`) notation.
fn parse_decimal(s: &str) -> Option<Decimal> {
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

/// More significant fractional digits than a [`Decimal`] holds; parsing
/// would silently round them away.
fn too_precise(s: &str) -> bool {
    const MAX_SCALE: usize = 28;
    let mantissa = s.split(['e', 'E']).next().unwrap_or(s);
    mantissa
        .split_once('.')
        .is_some_and(|(_, frac)| frac.trim_end_matches('0').len() > MAX_SCALE)
}

fn positive_decimal(s: &str) -> Option<Decimal> {
    parse_decimal(s).filter(|d| *d > Decimal::ZERO)
}

/// A fully loaded order file: the header layout plus one outcome per row.
#[derive(Clone, Debug, Default)]
pub struct OrderFile {
    pub columns: Columns,
    pub rows: Vec<RowOutcome>,
}

impl OrderFile {
    /// Number of rows that produced a valid order.
    pub fn valid_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_valid()).count()
    }

    /// Number of rows rejected by validation.
    pub fn invalid_count(&self) -> usize {
        self.rows.len() - self.valid_count()
    }

    /// Valid orders in file order, paired with their row numbers.
    pub fn orders(&self) -> impl Iterator<Item = (usize, &OrderRecord)> {
        self.rows
            .iter()
            .filter_map(|r| r.order().map(|o| (r.row, o)))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load an order file from disk.
pub fn load_file(path: &Path) -> Result<OrderFile, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    read(file)
}

/// Load an order file from any reader.
pub fn read<R: io::Read>(reader: R) -> Result<OrderFile, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?);

    let mut rows = Vec::new();
    let mut bytes = ByteRecord::new();
    let mut fallback_row = 1;
    loop {
        fallback_row += 1;
        if !rdr.read_byte_record(&mut bytes)? {
            break;
        }
        let row = bytes
            .position()
            .map_or(fallback_row, |p| p.line() as usize);

        let outcome = match StringRecord::from_byte_record(bytes.clone()) {
            Ok(record) => RowOutcome {
                row,
                raw: record.iter().map(str::to_string).collect(),
                result: columns.parse(&record),
            },
            // Undecodable cells are kept lossily so the report shows the row.
            Err(e) => RowOutcome {
                row,
                raw: bytes
                    .iter()
                    .map(|cell| String::from_utf8_lossy(cell).into_owned())
                    .collect(),
                result: Err(ValidationError::MalformedRow(e.utf8_error().to_string())),
            },
        };
        rows.push(outcome);
    }

    Ok(OrderFile { columns, rows })
}

/// Load an order file held in memory.
pub fn load_str(csv: &str) -> Result<Vec<RowOutcome>, LoadError> {
    read(csv.as_bytes()).map(|file| file.rows)
}
