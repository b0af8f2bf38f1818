//! Monte Carlo estimates of long-run portfolio growth.
//!
//! [`core::simulate`] compounds independent normally distributed annual
//! returns over many trials; [`core::summarize`] and
//! [`core::build_histogram`] reduce the terminal values for [`report`] and
//! the HTTP API in [`api`].

pub mod api;
pub mod core;
pub mod report;
