use anyhow::{Context as _, bail};
use protolit_fmt::{Canonicalize, GoLiteralFormatter};

use crate::args::FormatArgs;
use crate::util::Input;

#[derive(clap::Args)]
pub struct Args {
    /// Path to the literal to format (use '-' for stdin)
    pub file: Option<String>,
    /// Fail instead of printing when the input is not already canonical
    #[arg(short, long)]
    pub check: bool,
    #[command(flatten)]
    pub format: FormatArgs,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let input = Input::read(args.file.as_deref())?;
    let formatter = GoLiteralFormatter::new(args.format.to_config());
    let output = formatter
        .canonicalize(&input.text)
        .with_context(|| format!("parsing {}", input.name))?;

    if args.check {
        if output != input.text {
            bail!("{} is not formatted", input.name);
        }
        tracing::debug!(path = %input.name, "already formatted");
        return Ok(());
    }
    print!("{output}");
    Ok(())
}
