//! Command-line flags of the `coupon-select` binary.

use clap::Parser;
use coupon_select_widgets::picker::PickerOptions;
use std::path::PathBuf;

/// Pick a coupon from a searchable dropdown and print its value.
#[derive(Debug, Parser)]
#[command(name = "coupon-select", version, about)]
pub struct Cli {
    /// JSON file with `applicable` and `disabled` coupon lists.
    /// A built-in sample is used when omitted.
    #[arg(long, value_name = "PATH")]
    pub coupons: Option<PathBuf>,

    /// Header text while no coupon is applied.
    #[arg(long)]
    pub placeholder: Option<String>,

    /// Rows shown before the list scrolls.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub max_visible: Option<u16>,

    /// Draw the interface on stderr so stdout only carries the result.
    #[arg(long)]
    pub stderr: bool,

    /// Append logs to this file. Honors `RUST_LOG`.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Picker options with the flags applied over the defaults.
    pub fn picker_options(&self) -> PickerOptions {
        let mut options = PickerOptions::default();
        if let Some(placeholder) = &self.placeholder {
            options.placeholder = placeholder.clone();
        }
        if let Some(rows) = self.max_visible {
            options.max_visible = rows as usize;
            options.max_visible_with_keyboard = options.max_visible_with_keyboard.min(rows as usize);
        }
        options
    }
}
