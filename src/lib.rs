//! Builds the weather dashboard page from the local feed server: current
//! conditions, satellite imagery, alerts, and the forecast.

pub mod alerts;
pub mod app;
pub mod cli;
pub mod conditions;
pub mod dashboard;
pub mod feeds;
pub mod forecast;
pub mod markup;
pub mod page;
pub mod units;
