pub mod position;
pub mod trade;

use rust_decimal::Decimal;

/// Money and ratio values. Always rounded through `crate::rounding` before storage.
pub type Money = Decimal;
pub type Qty = u64;
