use anyhow::Context as _;
use protolit::{GoLiteralFormatter, Renderer};
use protolit_reflect::DescriptorPool;

use crate::args::FormatArgs;
use crate::util::Input;

#[derive(clap::Args)]
pub struct Args {
    /// JSON message value to render (use '-' for stdin)
    pub file: Option<String>,
    /// JSON descriptor set declaring the message type
    #[arg(short, long)]
    pub descriptors: String,
    /// Full name of the message type, e.g. `hotstuff.Proposal`
    #[arg(short, long)]
    pub message: String,
    /// Print the text before canonicalization
    #[arg(long)]
    pub raw: bool,
    #[command(flatten)]
    pub format: FormatArgs,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let descriptors = Input::read(Some(&args.descriptors))?;
    let pool = DescriptorPool::from_json(&descriptors.text)
        .with_context(|| format!("loading descriptors from {}", descriptors.name))?;

    let input = Input::read(args.file.as_deref())?;
    let message = pool
        .decode_message_json(&args.message, &input.text)
        .with_context(|| format!("decoding {} from {}", args.message, input.name))?;

    let renderer = Renderer::with_canonicalizer(GoLiteralFormatter::new(args.format.to_config()));
    let output = if args.raw {
        renderer.render_raw(&message)
    } else {
        renderer
            .try_render(&message)
            .with_context(|| format!("rendering {}", args.message))?
    };
    print!("{output}");
    Ok(())
}
