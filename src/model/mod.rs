//! Types that represent the core data model, such as `Record` and `SalesTable`.
mod amount;
mod month;
mod record;
mod table;
mod value;

pub use amount::{Amount, AmountError};
pub use month::Month;
pub use record::{parse_records, Record};
pub use table::{parse_timestamp, payment_sum, SaleColumn, SaleRow, SalesTable};
pub use value::Value;
