//! Order number sequencing.

use crate::models::ServiceOrder;

/// Width of a formatted order number.
pub const NUMBER_WIDTH: usize = 4;

/// Returns the next order number: the highest numeric number plus one,
/// zero-padded to four digits.
///
/// Numbers that do not parse are ignored. An empty collection yields `0001`.
/// The sequence saturates at `u64::MAX`.
pub fn next_order_number<'a, I>(orders: I) -> String
where
    I: IntoIterator<Item = &'a ServiceOrder>,
{
    let max = orders
        .into_iter()
        .filter_map(|order| order.number.trim().parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format_order_number(max.saturating_add(1))
}

pub fn format_order_number(value: u64) -> String {
    format!("{:0width$}", value, width = NUMBER_WIDTH)
}
