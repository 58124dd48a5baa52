use std::{
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use turtle_runtime::Canvas;

#[derive(Parser)]
#[command(about = "Run a turtle program and print the pixels it draws")]
struct Args {
    /// Program to run, or `-` to read from stdin.
    input: PathBuf,

    /// Print the drawing as rows of text instead of a list of points.
    #[arg(long)]
    ascii: bool,

    /// Only parse the program.
    #[arg(long, conflicts_with = "ascii")]
    check: bool,
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        Ok(input)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to open input file {}", path.display()))
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let input = read_input(&args.input)?;
    let program = turtlelang::program(&input)?;
    log::info!("parsed {} statements", program.len());

    if args.check {
        println!("{} statements", program.len());
    } else if args.ascii {
        let canvas = turtle_runtime::draw(&program, Canvas::default())?;
        print!("{canvas}");
    } else {
        let pixels = turtle_runtime::draw(&program, Vec::new())?;
        for (x, y) in pixels {
            println!("{x} {y}");
        }
    }
    Ok(())
}
