use clap::Parser;

use jumper::Args;

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();

	jumper::run(args)
}
