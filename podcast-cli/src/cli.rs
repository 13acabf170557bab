use std::process;

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgMatches, Args, FromArgMatches, Parser, Subcommand};

use crate::{
    preview,
    project::{Project, RenderOptions},
    shell,
};

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Build { project, profile } => project.build(&profile.0).await,
        Command::Render {
            project,
            out,
            pretty,
            fragment,
        } => {
            let opts = RenderOptions {
                out,
                pretty,
                fragment,
            };
            project.render(&opts).await
        }
        Command::Preview { click } => preview::run(click),
        Command::Clean { project } => project.clean().await,
    }
}

#[derive(Parser)]
#[command(name = "podcast", version, about = "Build and inspect the podcast generator frontend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile the web frontend to WebAssembly and write the page into the output directory
    Build {
        #[command(flatten)]
        project: Project,
        #[command(flatten)]
        profile: Profile,
    },
    /// Prerender the landing page as HTML
    Render {
        #[command(flatten)]
        project: Project,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<Utf8PathBuf>,
        /// Indent the markup
        #[arg(long)]
        pretty: bool,
        /// Only the view markup, without the surrounding page
        #[arg(long)]
        fragment: bool,
    },
    /// Print the landing view in the terminal
    Preview {
        /// Click the upload button after rendering
        #[arg(long)]
        click: bool,
    },
    /// Remove the output directory and cargo build artifacts
    Clean {
        #[command(flatten)]
        project: Project,
    },
}

impl Args for Project {
    fn augment_args(cmd: clap::Command) -> clap::Command {
        cmd.arg(clap::arg!(-c --config <PATH> "Path to the podcast.toml file"))
    }

    fn augment_args_for_update(cmd: clap::Command) -> clap::Command {
        Self::augment_args(cmd)
    }
}

impl FromArgMatches for Project {
    fn from_arg_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let config_path = matches.get_one::<String>("config").map(Utf8Path::new);
        let project = Self::from_env(config_path).unwrap_or_else(|err| {
            shell().error(format!("{err:#}"));
            process::exit(1);
        });
        Ok(project)
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        *self = Self::from_arg_matches(matches)?;
        Ok(())
    }
}

struct Profile(String);

impl Args for Profile {
    fn augment_args(cmd: clap::Command) -> clap::Command {
        cmd.args([
            clap::arg!(-r --release "Build with the release profile"),
            clap::arg!(--profile <NAME> "Build with the given profile").conflicts_with("release"),
        ])
    }

    fn augment_args_for_update(cmd: clap::Command) -> clap::Command {
        Self::augment_args(cmd)
    }
}

impl FromArgMatches for Profile {
    fn from_arg_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        if matches.get_flag("release") {
            Ok(Self("release".to_string()))
        } else if let Some(profile) = matches.get_one::<String>("profile") {
            Ok(Self(profile.clone()))
        } else {
            Ok(Self("dev".to_string()))
        }
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        *self = Self::from_arg_matches(matches)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn preview_parses_without_project() {
        let cli = Cli::try_parse_from(["podcast", "preview", "--click"]).unwrap();
        assert!(matches!(cli.command, Command::Preview { click: true }));
    }

    #[test]
    fn release_conflicts_with_profile() {
        let err = Cli::command()
            .try_get_matches_from(["podcast", "build", "--release", "--profile", "dev"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
