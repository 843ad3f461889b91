//! Parametric chest-of-drawers dimension engine and sheet-goods cutlist
//! optimizer.
//!
//! A [`config::ChestConfig`] drives everything: [`carcass`] and [`drawer`]
//! derive exact panel sizes, [`cutlist`] merges them into a cut list, and
//! [`optimizer`] packs each material thickness onto stock sheets with the
//! guillotine packer in [`solver`].

pub mod carcass;
pub mod config;
pub mod cutlist;
pub mod drawer;
pub mod error;
pub mod guillotine;
pub mod optimizer;
pub mod render;
pub mod solver;
pub mod types;
pub mod units;
