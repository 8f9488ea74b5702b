// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use runsheet_core::{Orientation, PaperSize, RenderOptions};

#[derive(Debug, Parser)]
#[command(name = "runsheet")]
#[command(about = "Render patient care reports to paginated PDF")]
pub struct App {
    /// Engine config file (JSON); defaults are used when absent
    #[arg(short, long, global = true, env = "RUNSHEET_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a record, save the PDF, and optionally confirm it
    Render(RenderArgs),
    /// Check a record has the fields a printable report needs
    Validate(ValidateArgs),
    /// Write the default engine config to a file
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Report record (JSON)
    pub record: PathBuf,

    /// Signed PDF to append after the generated pages
    #[arg(short, long)]
    pub signed: Option<PathBuf>,

    /// Directory the PDF is written to (overrides the config)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub paper: Option<Paper>,

    #[arg(long)]
    pub landscape: bool,

    /// Base font size in points
    #[arg(long)]
    pub font_size: Option<f32>,

    /// Uniform page margin in points
    #[arg(long)]
    pub margin: Option<f32>,

    /// Confirm the report after saving it
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Report record (JSON)
    pub record: PathBuf,
}

#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Where to write the config
    #[arg(default_value = "runsheet.json")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Paper {
    A4,
    A5,
    Letter,
    Legal,
}

impl From<Paper> for PaperSize {
    fn from(paper: Paper) -> Self {
        match paper {
            Paper::A4 => PaperSize::A4,
            Paper::A5 => PaperSize::A5,
            Paper::Letter => PaperSize::Letter,
            Paper::Legal => PaperSize::Legal,
        }
    }
}

impl RenderArgs {
    /// Apply command-line overrides on top of the configured options.
    pub fn apply(&self, options: &mut RenderOptions) {
        if let Some(paper) = self.paper {
            options.format = paper.into();
        }
        if self.landscape {
            options.orientation = Orientation::Landscape;
        }
        if let Some(size) = self.font_size {
            options.font_size = size;
        }
        if let Some(margin) = self.margin {
            options.margins = runsheet_core::Margins::uniform(margin);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_configured_options() {
        let app = App::parse_from([
            "runsheet",
            "render",
            "pcr.json",
            "--paper",
            "letter",
            "--landscape",
            "--font-size",
            "11",
        ]);
        let Commands::Render(args) = app.command else {
            panic!("expected render");
        };
        let mut options = RenderOptions::default();
        args.apply(&mut options);
        assert_eq!(options.format, PaperSize::Letter);
        assert_eq!(options.orientation, Orientation::Landscape);
        assert_eq!(options.font_size, 11.0);
        assert_eq!(options.margins, runsheet_core::Margins::default());
    }

    #[test]
    fn unset_flags_keep_configured_options() {
        let app = App::parse_from(["runsheet", "render", "pcr.json"]);
        let Commands::Render(args) = app.command else {
            panic!("expected render");
        };
        let mut options = RenderOptions::default();
        options.format = PaperSize::A5;
        args.apply(&mut options);
        assert_eq!(options.format, PaperSize::A5);
        assert!(!args.confirm);
    }
}
