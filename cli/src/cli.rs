//! CLI argument definitions for the `rmscene` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rmscene_core::constants::DEFAULT_AUTHOR;
use rmscene_core::scene::Tool;

/// Build and inspect reMarkable v6 scene files
#[derive(Parser, Debug)]
#[command(name = "rmscene")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a new page with one layer holding one shape
    New(NewArgs),
    /// Read a page and print what it contains
    Inspect(InspectArgs),
}

/// Shape drawn by `new`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    Rectangle,
    Triangle,
}

/// Pen used by `new`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Pen {
    Ballpoint,
    Fineliner,
    Pencil,
    Marker,
    Highlighter,
    Calligraphy,
}

impl From<Pen> for Tool {
    fn from(pen: Pen) -> Self {
        match pen {
            Pen::Ballpoint   => Tool::Ballpoint2,
            Pen::Fineliner   => Tool::Fineliner2,
            Pen::Pencil      => Tool::Pencil2,
            Pen::Marker      => Tool::Marker2,
            Pen::Highlighter => Tool::Highlighter2,
            Pen::Calligraphy => Tool::Calligraphy,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Output `.rm` file
    pub out: PathBuf,

    /// Layer label
    #[arg(long, default_value = "Layer 1")]
    pub label: String,

    /// Create the layer hidden
    #[arg(long)]
    pub hidden: bool,

    #[arg(long, value_enum, default_value = "rectangle")]
    pub shape: Shape,

    /// Left edge in page coordinates
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    pub x: f32,

    /// Top edge in page coordinates
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    pub y: f32,

    /// Side length
    #[arg(long, default_value_t = 200.0)]
    pub size: f32,

    #[arg(long, value_enum, default_value = "fineliner")]
    pub tool: Pen,

    /// Palette index (0 = black)
    #[arg(long, default_value_t = 0)]
    pub color: u32,

    /// Nominal stroke width
    #[arg(long, default_value_t = 2.0)]
    pub width: f64,

    /// Author id used for every allocated identifier
    #[arg(long, default_value_t = DEFAULT_AUTHOR, env = "RMSCENE_AUTHOR")]
    pub author: u32,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// `.rm` file to read
    pub file: PathBuf,

    /// Print a JSON summary instead of text
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn new_defaults() {
        let cli = Cli::try_parse_from(["rmscene", "new", "page.rm"]).unwrap();
        let Commands::New(args) = cli.command else { panic!("expected new") };
        assert_eq!(args.shape, Shape::Rectangle);
        assert_eq!(args.tool, Pen::Fineliner);
        assert!(!args.hidden);
        assert_eq!(args.label, "Layer 1");
    }

    #[test]
    fn inspect_json_flag() {
        let cli = Cli::try_parse_from(["rmscene", "inspect", "page.rm", "--json"]).unwrap();
        let Commands::Inspect(args) = cli.command else { panic!("expected inspect") };
        assert!(args.json);
    }
}
