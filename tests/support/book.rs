use fairquote::domain::OrderBook;
use fairquote::testkit::domain::{book_levels, ticker};

/// Book for the test ticker built from `(price, quantity)` pairs.
pub fn make_book(yes: &[(i64, i64)], no: &[(i64, i64)]) -> OrderBook {
    let mut book = OrderBook::new(ticker());
    book.apply_snapshot(&book_levels(yes, no));
    book
}
