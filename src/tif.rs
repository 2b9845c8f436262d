//! Time-in-force: how long the brokerage keeps an order working

use std::fmt;

/// Time-in-force forwarded to the brokerage with each order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeInForce {
    /// Day order: expires at the end of the trading session.
    #[default]
    DAY,

    /// Good-til-cancelled: stays working until filled or cancelled.
    GTC,

    /// Immediate-or-cancel: fill what's available, cancel the remainder.
    IOC,

    /// Fill-or-kill: fill the entire quantity immediately or cancel.
    FOK,
}

impl TimeInForce {
    /// Parse a CSV cell leniently.
    ///
    /// Blank or unrecognized values fall back to [`TimeInForce::DAY`]; CSV exports
    /// from trading platforms carry values such as `OPG` or `GTD` that this bridge
    /// does not forward.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "GTC" => TimeInForce::GTC,
            "IOC" => TimeInForce::IOC,
            "FOK" => TimeInForce::FOK,
            _ => TimeInForce::DAY,
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInForce::DAY => write!(f, "DAY"),
            TimeInForce::GTC => write!(f, "GTC"),
            TimeInForce::IOC => write!(f, "IOC"),
            TimeInForce::FOK => write!(f, "FOK"),
        }
    }
}
