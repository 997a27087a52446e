//! Edge-aware filtering module
//!
//! This module provides the box filter primitive and the single-channel guided filter built on it.

mod box_filter;
mod guided;


pub use box_filter::box_filter;
pub use guided::guided_filter_channel;
