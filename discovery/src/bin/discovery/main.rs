mod commands;
mod context;
mod examples;
mod output;
mod theme;

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::builder::{
    Styles,
    styling::{AnsiColor, Color as ClapColor, Style},
};
use clap::{ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::{Color as ThemeColor, Colorize, control::ShouldColorize};

use commands::{
    categories::{CategoriesArgs, handle_categories},
    search::{SearchArgs, handle_search},
};
use context::RunContext;
use examples::{ExampleGroup, command_examples};
use output::{GlobalOptions, OutputFormat, OutputManager};
use theme::{ICONS, THEME};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("DISCOVERY_CATALOG", "Catalog JSON file used when no catalog argument is given"),
    ("RUST_LOG", "Log filter for diagnostics, e.g. discovery=debug"),
];

#[derive(Parser)]
#[command(name = "discovery")]
#[command(version = "0.1.0")]
#[command(
    about = "Search, filter, sort and page a catalog of community listings",
    long_about = r#"Discovery runs the browse-screen pipeline over a JSON catalog:

• Free-text search over names, creators, descriptions and tags
• Type, category, price and minimum-member facets plus quick filters
• Popular, newest, members, rating and price orderings
• Fixed-size pages with a page-number strip

Commands:
  search      Filter, sort and page the catalog
  categories  List the category filter values
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Config file (defaults to ./discovery.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse the command line with themed help. Help, version and usage
    /// errors are printed by clap, which exits with its own status code.
    fn parse_themed() -> Self {
        let painter = HelpPainter::detect();
        let matches = painter.command().get_matches();
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}

/// Renders the help appendices, in color when the terminal supports it.
#[derive(Clone, Copy)]
struct HelpPainter {
    use_color: bool,
}

impl HelpPainter {
    fn detect() -> Self {
        Self {
            use_color: ShouldColorize::from_env().should_colorize(),
        }
    }

    fn command(self) -> Command {
        let mut command = Cli::command()
            .styles(help_styles())
            .color(if self.use_color { ColorChoice::Auto } else { ColorChoice::Never })
            .after_long_help(self.appendix());

        for example in command_examples() {
            if let Some(subcommand) = command.find_subcommand_mut(example.name) {
                *subcommand = subcommand.clone().after_long_help(self.examples(example.groups));
            }
        }
        command
    }

    fn paint(self, text: &str, color: ThemeColor, bold: bool) -> String {
        match (self.use_color, bold) {
            (false, _) => text.to_string(),
            (true, false) => text.color(color).to_string(),
            (true, true) => text.color(color).bold().to_string(),
        }
    }

    fn examples(self, groups: &[ExampleGroup]) -> String {
        let mut sections = Vec::with_capacity(groups.len());
        for group in groups {
            let mut section = format!("  {}\n", self.paint(group.title, THEME.primary, true));
            for command in group.commands {
                let _ = writeln!(
                    section,
                    "    {} {}",
                    self.paint(ICONS.arrow, THEME.secondary, false),
                    self.paint(command, THEME.secondary, false)
                );
            }
            sections.push(section);
        }
        format!("{}\n{}", self.paint("Examples:", THEME.highlight, true), sections.join("\n"))
    }

    fn appendix(self) -> String {
        let mut buffer = format!("{}\n", self.paint("Environment Variables:", THEME.highlight, true));
        for (key, description) in ENVIRONMENT_VARIABLES {
            let _ = writeln!(
                buffer,
                "  {}  {}",
                self.paint(key, THEME.key, true),
                self.paint(description, THEME.value, false)
            );
        }
        let _ = writeln!(
            buffer,
            "\n{} {}",
            self.paint("Tip:", THEME.highlight, true),
            self.paint("Use 'discovery <command> --help' to view examples for each command.", THEME.secondary, false)
        );
        buffer
    }
}

fn help_styles() -> Styles {
    let fg = |color: ThemeColor| Style::new().fg_color(ansi_color(color).map(ClapColor::Ansi));
    Styles::styled()
        .usage(fg(THEME.primary).bold())
        .header(fg(THEME.highlight).bold())
        .literal(fg(THEME.secondary))
        .placeholder(fg(THEME.muted))
        .valid(fg(THEME.success))
        .invalid(fg(THEME.warning))
        .error(fg(THEME.error).bold())
}

/// Clap counterpart of the theme palette. Colors outside it render unstyled.
fn ansi_color(color: ThemeColor) -> Option<AnsiColor> {
    Some(match color {
        ThemeColor::Red => AnsiColor::Red,
        ThemeColor::Green => AnsiColor::Green,
        ThemeColor::Yellow => AnsiColor::Yellow,
        ThemeColor::Blue => AnsiColor::Blue,
        ThemeColor::Magenta => AnsiColor::Magenta,
        ThemeColor::Cyan => AnsiColor::Cyan,
        ThemeColor::White => AnsiColor::White,
        ThemeColor::BrightBlack => AnsiColor::BrightBlack,
        ThemeColor::BrightBlue => AnsiColor::BrightBlue,
        ThemeColor::BrightCyan => AnsiColor::BrightCyan,
        _ => return None,
    })
}

#[derive(Subcommand)]
enum Commands {
    /// Filter, sort and page the catalog
    Search(SearchArgs),

    /// List the category filter values with item counts
    Categories(CategoriesArgs),
}

fn main() {
    env_logger::init();

    let cli = Cli::parse_themed();
    let global_options = GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };
    if global_options.no_color {
        colored::control::set_override(false);
    }
    let output = OutputManager::new(global_options);

    if let Err(err) = execute(cli, &output) {
        output.error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn execute(cli: Cli, output: &OutputManager) -> Result<()> {
    let ctx = RunContext::load(cli.config.as_deref())?;
    if let Some(path) = &ctx.config_path {
        output.verbose(&format!("Using config {}", path.display()));
    }

    match cli.command {
        Commands::Search(args) => handle_search(args, &ctx, output)?,
        Commands::Categories(args) => handle_categories(args, &ctx, output)?,
    }

    Ok(())
}
