use std::io::{self, Read, Write};

use anyhow::Context;
use cnctext::cli::{self, Action, USAGE};
use cnctext::{init_logging, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    init_logging()?;

    match cli::parse_args(std::env::args().skip(1))? {
        Action::Help => println!("{}", USAGE),
        Action::Version => println!("cnctext {} ({})", VERSION, BUILD_DATE),
        Action::Run(options) => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read labels from stdin")?;

            let program = cli::run(&options, &input)?;

            let mut stdout = io::stdout().lock();
            stdout
                .write_all(program.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write program")?;
        }
    }

    Ok(())
}
