//! Binary Refinery: a CLI toolkit of composable binary-transformation units
//! chained via pipes, built around a small in-process engine (chunk, meta,
//! frame codec, multibin expression language, handler registry, unit
//! contract, pipeline driver) and a CLI front-end over it.

pub mod chunk;
pub mod cli;
pub mod error;
pub mod frame;
pub mod handlers;
pub mod logging;
pub mod meta;
pub mod multibin;
pub mod pipeline;
pub mod unit;
pub mod units;
