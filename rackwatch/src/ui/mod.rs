//! UI module root: one drawing module per view plus shared chrome.

pub mod cooling;
pub mod denied;
pub mod header;
pub mod insights;
pub mod notify;
pub mod overview;
pub mod resource;
pub mod theme;
pub mod util;
pub mod workload;
