#![warn(clippy::all)]

use clap::CommandFactory;
use clap::Parser;
use clap::ValueEnum;
use color_eyre::eyre;
use skylight_bridge::config::StaticConfig;
use skylight_bridge::desktop_image::DesktopImageOptions;
use skylight_bridge::desktop_image::ImageScaling;
use skylight_bridge::replace_env_in_path;
use skylight_bridge::space::SpaceSelector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum BooleanState {
    Enable,
    Disable,
}

impl From<BooleanState> for bool {
    fn from(b: BooleanState) -> Self {
        match b {
            BooleanState::Enable => true,
            BooleanState::Disable => false,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum Scaling {
    ProportionallyDown,
    AxesIndependently,
    None,
    ProportionallyUpOrDown,
}

impl From<Scaling> for ImageScaling {
    fn from(value: Scaling) -> Self {
        match value {
            Scaling::ProportionallyDown => ImageScaling::ProportionallyDown,
            Scaling::AxesIndependently => ImageScaling::AxesIndependently,
            Scaling::None => ImageScaling::None,
            Scaling::ProportionallyUpOrDown => ImageScaling::ProportionallyUpOrDown,
        }
    }
}

#[derive(Parser)]
struct Spaces {
    /// Print the managed display spaces as JSON using the window server's key names
    #[clap(long)]
    json: bool,
    /// Only list the spaces of the display with this identifier ("Main" or a display uuid)
    #[clap(short, long)]
    display: Option<String>,
    /// Only list the current space of each display
    #[clap(long)]
    current: bool,
}

#[derive(Parser)]
struct Set {
    /// Image file to use as the desktop background
    #[clap(value_parser = replace_env_in_path)]
    image: PathBuf,
    /// Space to change: "current", a space id (id64) or a space uuid
    #[clap(short, long, default_value = "current", conflicts_with = "all_desktops")]
    space: SpaceSelector,
    /// Change every regular desktop on every display
    #[clap(long)]
    all_desktops: bool,
    /// How the image should be scaled to fit the display
    #[clap(long, value_enum)]
    scaling: Option<Scaling>,
    /// Whether the image may be clipped when scaling
    #[clap(long, value_enum)]
    allow_clipping: Option<BooleanState>,
}

impl Set {
    fn options(&self) -> DesktopImageOptions {
        DesktopImageOptions {
            scaling: self.scaling.map(ImageScaling::from),
            allow_clipping: self.allow_clipping.map(bool::from),
        }
    }
}

#[derive(Parser)]
struct Completions {
    #[clap(value_enum)]
    shell: clap_complete::Shell,
}

#[derive(Parser)]
#[clap(author, about, version)]
struct Opts {
    /// Path to a static configuration JSON file
    #[clap(short, long, global = true)]
    #[clap(value_parser = replace_env_in_path)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    subcmd: SubCommand,
}

#[derive(Parser)]
enum SubCommand {
    /// Print the main window server connection id of this process
    Connection,
    /// List the spaces managed on each display
    Spaces(Spaces),
    /// Set the desktop image of one or more spaces
    Set(Set),
    /// Load and print the effective configuration
    CheckConfig,
    /// Generate shell completions
    Completions(Completions),
}

fn install_error_reporting() -> eyre::Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        unsafe {
            std::env::set_var("RUST_LIB_BACKTRACE", "1");
        }
    }

    color_eyre::install()
}

fn setup_logging(config: &StaticConfig) -> eyre::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", config.log_level());
        }
    }

    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt::Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .finish(),
    )?;

    std::panic::set_hook(Box::new(|panic| {
        panic.location().map_or_else(
            || {
                tracing::error!(message = %panic);
            },
            |location| {
                tracing::error!(
                    message = %panic,
                    panic.file = location.file(),
                    panic.line = location.line(),
                    panic.column = location.column(),
                );
            },
        );
    }));

    Ok(())
}

fn completions(args: &Completions, out: &mut dyn std::io::Write) {
    let mut cli = Opts::command();
    clap_complete::generate(args.shell, &mut cli, "skylightc", out);
}

fn main() -> eyre::Result<()> {
    install_error_reporting()?;

    let opts: Opts = Opts::parse();
    let config_path = opts.config.clone().unwrap_or_else(StaticConfig::path);

    // completions are the only subcommand that never reads the configuration
    let configure = || -> eyre::Result<StaticConfig> {
        let config = StaticConfig::load(&config_path)?;
        setup_logging(&config)?;
        Ok(config)
    };

    match opts.subcmd {
        SubCommand::Completions(args) => completions(&args, &mut std::io::stdout()),
        SubCommand::CheckConfig => {
            let config = configure()?;

            if config_path.is_file() {
                println!("loaded {}", config_path.display());
            } else {
                println!("{} does not exist, using defaults", config_path.display());
            }

            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        SubCommand::Connection => {
            configure()?;
            window_server::connection()?;
        }
        SubCommand::Spaces(args) => {
            configure()?;
            window_server::spaces(&args)?;
        }
        SubCommand::Set(args) => {
            let config = configure()?;
            let options = config.desktop_image_options.merge(args.options());
            window_server::set(&args, &options)?;
        }
    }

    Ok(())
}

#[cfg(target_os = "macos")]
mod window_server {
    use super::Set;
    use super::Spaces;
    use color_eyre::eyre;
    use skylight_bridge::desktop_image::DesktopImage;
    use skylight_bridge::desktop_image::DesktopImageOptions;
    use skylight_bridge::space::DisplaySpaces;
    use skylight_bridge::window_server::WindowServer;

    pub fn connection() -> eyre::Result<()> {
        println!("{}", WindowServer::main().connection);
        Ok(())
    }

    pub fn spaces(args: &Spaces) -> eyre::Result<()> {
        let spaces = WindowServer::main().managed_display_spaces()?;

        let displays = match &args.display {
            Some(identifier) => vec![
                spaces
                    .display(identifier)
                    .ok_or_else(|| eyre::eyre!("no display is identified by '{identifier}'"))?
                    .clone(),
            ],
            None => spaces.displays().to_vec(),
        };

        if args.current {
            for (display, space) in DisplaySpaces(displays).current_spaces() {
                println!("{} {} {}", display.identifier, space.id, space.uuid);
            }

            return Ok(());
        }

        if args.json {
            println!("{}", serde_json::to_string_pretty(&displays)?);
            return Ok(());
        }

        for display in &displays {
            println!("{}", display.identifier);
            for space in &display.spaces {
                let current = display
                    .current_space
                    .as_ref()
                    .is_some_and(|current| current.id == space.id);

                println!(
                    "  {} {:>6}  {:<12} {}",
                    if current { "*" } else { " " },
                    space.id,
                    space.kind.to_string(),
                    space.uuid
                );
            }
        }

        Ok(())
    }

    pub fn set(args: &Set, options: &DesktopImageOptions) -> eyre::Result<()> {
        let image = DesktopImage::new(&args.image)?;
        let window_server = WindowServer::main();

        if args.all_desktops {
            let updated = window_server.set_desktop_image_for_desktops(&image, options)?;
            println!(
                "set {} on {} desktops",
                image.path().display(),
                updated.len()
            );
        } else {
            let space_id = window_server.set_desktop_image_for(&args.space, &image, options)?;
            println!("set {} on space {space_id}", image.path().display());
        }

        Ok(())
    }
}

#[cfg(not(target_os = "macos"))]
mod window_server {
    use super::Set;
    use super::Spaces;
    use color_eyre::eyre;
    use skylight_bridge::desktop_image::DesktopImageOptions;

    const UNSUPPORTED: &str = "the SkyLight window server is only available on macOS";

    pub fn connection() -> eyre::Result<()> {
        eyre::bail!(UNSUPPORTED)
    }

    pub fn spaces(_args: &Spaces) -> eyre::Result<()> {
        eyre::bail!(UNSUPPORTED)
    }

    pub fn set(_args: &Set, _options: &DesktopImageOptions) -> eyre::Result<()> {
        eyre::bail!(UNSUPPORTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Opts::command().debug_assert();
    }

    #[test]
    fn test_set_defaults_to_current_space() {
        let opts = Opts::try_parse_from(["skylightc", "set", "/tmp/a.png"]).unwrap();
        match opts.subcmd {
            SubCommand::Set(args) => {
                assert_eq!(args.space, SpaceSelector::Current);
                assert!(!args.all_desktops);
                assert_eq!(args.options(), DesktopImageOptions::default());
            }
            _ => panic!("expected the set subcommand"),
        }
    }

    #[test]
    fn test_set_parses_options() {
        let opts = Opts::try_parse_from([
            "skylightc",
            "set",
            "/tmp/a.png",
            "--space",
            "42",
            "--scaling",
            "axes-independently",
            "--allow-clipping",
            "disable",
        ])
        .unwrap();

        match opts.subcmd {
            SubCommand::Set(args) => {
                assert_eq!(args.space, SpaceSelector::Id(42));
                assert_eq!(
                    args.options(),
                    DesktopImageOptions {
                        scaling: Some(ImageScaling::AxesIndependently),
                        allow_clipping: Some(false),
                    }
                );
            }
            _ => panic!("expected the set subcommand"),
        }
    }

    #[test]
    fn test_space_and_all_desktops_conflict() {
        assert!(
            Opts::try_parse_from([
                "skylightc",
                "set",
                "/tmp/a.png",
                "--space",
                "42",
                "--all-desktops"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_completions_ignore_a_malformed_config() {
        let path = std::env::temp_dir().join(format!("skylightc-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        assert!(StaticConfig::load(&path).is_err());

        let opts = Opts::try_parse_from([
            "skylightc",
            "--config",
            path.to_str().unwrap(),
            "completions",
            "bash",
        ])
        .unwrap();

        match opts.subcmd {
            SubCommand::Completions(args) => {
                let mut out = vec![];
                completions(&args, &mut out);
                assert!(String::from_utf8(out).unwrap().contains("skylightc"));
            }
            _ => panic!("expected the completions subcommand"),
        }

        std::fs::remove_file(&path).unwrap();
    }
}
