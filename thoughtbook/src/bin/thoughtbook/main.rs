mod commands;
mod theme;

use anyhow::Result;
use clap::{
    Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Color as ClapColor, Style},
    },
};
use colored::{Color as ThemeColor, Colorize};

use commands::{
    init::{InitArgs, handle_init},
    serve::{ServeArgs, handle_serve},
};
use theme::PALETTE;

#[derive(Parser)]
#[command(name = "thoughtbook")]
#[command(version)]
#[command(
    about = "Social network backend: users, thoughts, reactions and friends",
    long_about = r#"Social network backend exposing users, thoughts, reactions and friend lists over HTTP.

Commands:
  serve     Run the HTTP API
  init      Write a default configuration file
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
#[command(styles = help_styles())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Write a default configuration file
    Init(InitArgs),
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(err) = execute(cli).await {
        eprintln!("{} {err:#}", "Error:".color(PALETTE.failure).bold());
        std::process::exit(1);
    }
}

async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::Init(args) => handle_init(args).await,
    }
}

fn help_styles() -> Styles {
    Styles::styled()
        .usage(style_from_color(PALETTE.title).bold())
        .header(style_from_color(PALETTE.heading).bold())
        .literal(style_from_color(PALETTE.marker))
        .placeholder(style_from_color(PALETTE.dim))
        .valid(style_from_color(PALETTE.ok))
        .invalid(style_from_color(PALETTE.caution))
        .error(style_from_color(PALETTE.failure).bold())
}

fn style_from_color(color: ThemeColor) -> Style {
    Style::new().fg_color(Some(color_to_clap_color(color)))
}

fn color_to_clap_color(color: ThemeColor) -> ClapColor {
    match color {
        ThemeColor::Black => ClapColor::Ansi(AnsiColor::Black),
        ThemeColor::Red => ClapColor::Ansi(AnsiColor::Red),
        ThemeColor::Green => ClapColor::Ansi(AnsiColor::Green),
        ThemeColor::Yellow => ClapColor::Ansi(AnsiColor::Yellow),
        ThemeColor::Blue => ClapColor::Ansi(AnsiColor::Blue),
        ThemeColor::Magenta => ClapColor::Ansi(AnsiColor::Magenta),
        ThemeColor::Cyan => ClapColor::Ansi(AnsiColor::Cyan),
        ThemeColor::White => ClapColor::Ansi(AnsiColor::White),
        ThemeColor::BrightBlack => ClapColor::Ansi(AnsiColor::BrightBlack),
        ThemeColor::BrightRed => ClapColor::Ansi(AnsiColor::BrightRed),
        ThemeColor::BrightGreen => ClapColor::Ansi(AnsiColor::BrightGreen),
        ThemeColor::BrightYellow => ClapColor::Ansi(AnsiColor::BrightYellow),
        ThemeColor::BrightBlue => ClapColor::Ansi(AnsiColor::BrightBlue),
        ThemeColor::BrightMagenta => ClapColor::Ansi(AnsiColor::BrightMagenta),
        ThemeColor::BrightCyan => ClapColor::Ansi(AnsiColor::BrightCyan),
        ThemeColor::BrightWhite => ClapColor::Ansi(AnsiColor::BrightWhite),
        ThemeColor::TrueColor { r, g, b } => ClapColor::Rgb(clap::builder::styling::RgbColor(r, g, b)),
    }
}
