//! Newsletter domain: records, classification, grouping and display labels.
//!
//! Everything in this module is pure computation over an in-memory list.

mod classify;
mod decode;
mod label;
mod model;
mod text;
mod view;

pub use classify::{Classification, Context, NYT, NYT_EDITIONS, NYT_OTHER, classify, group_key};
pub use decode::{DecodeError, decode_snapshot, fields};
pub use label::{RowLabel, medium_date, reader_date_parts, row_label, split_nyt_subject};
pub use model::{NewsletterId, NewsletterRecord, vendor_name};
pub use text::capitalize_words;
pub use view::{
    EMPTY_TODAY_MESSAGE, GroupedView, HISTORICAL_GROUP_ORDER, NewsletterGroup, TODAY_GROUP_ORDER,
    build_view, compare_group_keys, group_order, in_context, is_same_day, sort_items,
};
