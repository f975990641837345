//! A compiler for VedaLang, a YAML-based language for describing energy system models.
//!
//! Source documents declare commodities, processes, regions, scenarios, trade links and user
//! constraints. These are validated and lowered into TableIR: a tree of files, sheets and tagged
//! tables whose rows are flat maps of column name to scalar value.
use std::path::PathBuf;

pub mod check;
pub mod cli;
pub mod commodity;
pub mod compiler;
pub mod constraint;
pub mod diagnostics;
pub mod error;
pub mod example;
pub mod id;
pub mod input;
pub mod interpolation;
pub mod log;
pub mod model;
pub mod output;
pub mod process;
pub mod scenario;
pub mod settings;
pub mod table_ir;
pub mod time_slice;
pub mod trade;
pub mod units;
pub mod validation;
pub mod year;

#[cfg(test)]
mod fixture;

/// URL of the issue tracker
pub const ISSUES_URL: &str = concat!(env!("CARGO_PKG_REPOSITORY"), "/issues");

/// Get the directory where program configuration is stored
pub fn get_vedalang_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config dir on this platform, so fall back to the current directory
        return PathBuf::from(".");
    };
    config_dir.push("vedalang");
    config_dir
}
