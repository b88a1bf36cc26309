//! Client-side logic for the fitcat catalog.
//!
//! Holds durable per-user state -- the plan selection and the user
//! profile -- plus the [`catalog::Catalog`] seam through which client
//! commands reach the plan store over HTTP.

pub mod catalog;
pub mod paths;
pub mod profile;
pub mod selection;
