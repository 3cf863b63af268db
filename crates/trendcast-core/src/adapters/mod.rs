//! Market-data provider adapters.
//!
//! | Adapter | Provider | Network |
//! |---------|----------|---------|
//! | [`YahooHistoryAdapter`] | Yahoo Finance v8 chart API | yes |
//! | [`SyntheticHistoryProvider`] | Seeded random walk | no |

mod synthetic;
mod yahoo;

pub use synthetic::SyntheticHistoryProvider;
pub use yahoo::YahooHistoryAdapter;
