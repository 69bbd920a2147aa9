//! Flags shared by the subcommands.

use protolit_fmt::{FormatConfig, IndentStyle};

/// Canonicalizer layout, flattened into each command's `Args`.
#[derive(clap::Args, Clone, Default)]
pub struct FormatArgs {
    /// Indent with this many spaces instead of tabs
    #[arg(long, value_name = "N")]
    pub spaces: Option<usize>,

    /// Do not align the values of consecutive keyed elements
    #[arg(long)]
    pub no_align: bool,
}

impl FormatArgs {
    pub fn to_config(&self) -> FormatConfig {
        let indent = self.spaces.map_or(IndentStyle::Tab, IndentStyle::Spaces);
        FormatConfig::new()
            .with_indent(indent)
            .with_align_keys(!self.no_align)
    }
}
