//! Protocol-wide constants.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Target price of the monitored asset.
pub const PEG: Decimal = dec!(1.00);

/// A venue trading strictly below this price is considered depegged.
pub const DEPEG_THRESHOLD: Decimal = dec!(0.9995);

/// The depeg threshold expressed in basis points below peg.
pub const DEPEG_THRESHOLD_BPS: Decimal = dec!(5);

/// Fraction of issued IOUs credited to the trader.
pub const TRADER_SHARE: Decimal = dec!(0.20);

/// Fraction of issued IOUs routed to the protocol side (solver + treasury).
pub const PROTOCOL_FEES_SHARE: Decimal = dec!(0.80);

/// Rolling sample-window horizon in hours.
pub const WINDOW_HORIZON_HOURS: i64 = 24;

/// Basis points per unit price.
pub const BPS_PER_UNIT: Decimal = dec!(10000);
