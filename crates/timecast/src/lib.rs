//! # timecast
//!
//! Best-effort conversion of ambiguous temporal values, and human-readable
//! durations.
//!
//! A number might be a Unix timestamp, a millisecond instant or a Windows
//! filetime; a string might be ISO, day-first or month-first. `timecast` picks
//! the most plausible reading and hands back a canonical
//! [`chrono::NaiveDateTime`], or the untouched input when nothing fits. The
//! other direction turns durations into phrases like "in 3 weeks" or
//! "1 year and 5 hours ago".
//!
//! Nothing here reads the system clock. Operations that need "now" take an
//! explicit `anchor: DateTime<Utc>`.
//!
//! ## Modules
//!
//! - [`resolve`]: any value to a date-time (numeric classification, text patterns)
//! - [`convert`]: exact filetime, timestamp and instant conversions
//! - [`pattern`]: the text patterns and field extraction
//! - [`decode`]: bytes to text by trying a list of encodings
//! - [`split`]: a duration broken into years down to seconds
//! - [`format`]: durations and date-times rendered as text
//! - [`parse`]: written-out durations, relative words, date ranges
//! - [`shortcuts`]: next occurrence of a time or weekday, offsets from now,
//!   past/future checks
//! - [`legacy`]: entry points with the older API's behaviour
//! - [`consts`]: calendar constants and the canonical range
//! - [`error`]: error types

pub mod consts;
pub mod convert;
pub mod decode;
pub mod error;
pub mod format;
pub mod legacy;
pub mod parse;
pub mod pattern;
pub mod resolve;
pub mod shortcuts;
pub mod split;

pub use convert::{
    datetime_to_filetime, datetime_to_instant, datetime_to_timestamp, filetime_to_datetime,
    instant_to_datetime, timestamp_to_datetime,
};
pub use error::{Result, TimecastError};
pub use format::{
    delta_to_str, format_duration, human_readable_delta, human_readable_delta_with_options,
    serialize, to_str, Elapsed, FormatOptions, HumanizeOptions, Serialized, TemporalObject,
};
pub use parse::{parse_delta, parse_delta_or};
pub use resolve::{
    classify_numeric, resolve_temporal, resolve_temporal_or, resolve_temporal_with_options,
    try_resolve_temporal, NumericKind, NumericStrategy, ResolveOptions, TemporalValue,
    TextPatternOrder,
};
pub use split::{split_duration, DurationSplit, DurationUnit, SplitOptions};
