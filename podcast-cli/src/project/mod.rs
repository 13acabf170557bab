use std::{env, time::Instant};

use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use cargo_metadata::{semver::Version, Metadata, MetadataCommand, Package, Target};
use podcast_view::render::Mode;
use tokio::fs;

use crate::{
    config::{self, Config},
    page, shell, tools,
    util::*,
};

const WASM_TARGET: &str = "wasm32-unknown-unknown";

/// Where `podcast render` writes its output.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub out: Option<Utf8PathBuf>,
    pub pretty: bool,
    /// Only the view markup, without the surrounding page.
    pub fragment: bool,
}

#[derive(Clone)]
pub struct Project {
    pub root: Utf8PathBuf,
    pub meta: Metadata,
    pub config: Config,
    pub config_path: Option<Utf8PathBuf>,
}

impl Project {
    // Commands

    pub async fn clean(&self) -> Result<()> {
        let out_dir = self.out_dir();
        if out_dir.exists() {
            fs::remove_dir_all(&out_dir).await?;
            shell().status("Removed", &out_dir);
        }

        run_command(tools::cargo(&self.root, "clean")).await?;

        Ok(())
    }

    pub async fn build(&self, profile: &str) -> Result<()> {
        let start = Instant::now();
        let package = self.primary_package()?;
        let bin = self.primary_bin(package)?;
        let target_dir = self
            .meta
            .target_directory
            .join(WASM_TARGET)
            .join(match profile {
                "dev" => "debug",
                _ => profile,
            });

        // cargo build

        let cmd = tools::cargo::build(&self.root)
            .target(WASM_TARGET)
            .profile(profile)
            .package(&package.name)
            .bin(bin)
            .default_features(self.config.default_features)
            .features(&self.config.features)
            .command();
        run_command(cmd).await?;

        // wasm-bindgen

        let wasm_file = target_dir.join(bin).with_extension("wasm");
        let wasm_dir = target_dir.join("wasm-bindgen");
        if wasm_dir.exists() {
            fs::remove_dir_all(&wasm_dir).await?;
        }
        let version = self.wasm_bindgen_version()?;
        shell().progress("Binding", &wasm_file);
        run_command(tools::wasm_bindgen(&version, &wasm_file, &wasm_dir).await?).await?;

        let bg_file = wasm_dir.join(format!("{bin}_bg.wasm"));
        let size = fs::metadata(&bg_file)
            .await
            .with_context(|| format!("wasm-bindgen produced no `{bg_file}`"))?
            .len();
        shell().status("Bound", format!("{bg_file} ({})", FileSize(size)));

        // finalization

        let out_dir = self.out_dir();
        if out_dir.exists() {
            fs::remove_dir_all(&out_dir).await?;
        }
        fs::rename(&wasm_dir, &out_dir).await?;
        self.write_index(&out_dir, Some(bin)).await?;

        shell().status(
            "Finished",
            format!("{out_dir} ({profile}) in {}", Elapsed(start.elapsed())),
        );
        Ok(())
    }

    pub async fn render(&self, opts: &RenderOptions) -> Result<()> {
        let html = render_html(&self.config, opts);
        if let Some(out) = &opts.out {
            write_html(out, &html).await
        } else {
            print!("{html}");
            Ok(())
        }
    }

    // Utilities

    async fn write_index(&self, out_dir: &Utf8Path, bin: Option<&str>) -> Result<()> {
        let body = if self.config.page.prerender {
            page::prerender(Mode::empty())
        } else {
            String::new()
        };
        let html = page::index_html(&self.config.page, bin, &body);

        write_html(&out_dir.join("index.html"), &html).await
    }

    /// The `wasm-bindgen` version the lockfile resolved, which the CLI must match.
    fn wasm_bindgen_version(&self) -> Result<Version> {
        let meta = MetadataCommand::new()
            .current_dir(&self.root)
            .exec()
            .context("failed to resolve dependencies")?;
        resolved_version(&meta, "wasm-bindgen")
            .ok_or_else(|| anyhow!("`wasm-bindgen` is not a dependency of this workspace"))
    }

    fn primary_package(&self) -> Result<&Package> {
        if let Some(name) = &self.config.package {
            self.meta
                .packages
                .iter()
                .find(|package| &package.name == name)
                .ok_or_else(|| anyhow!("package {name} not found in workspace"))
        } else {
            default_package(&self.meta).ok_or_else(|| {
                anyhow!(
                    "could not determine primary package, set `package` in {}",
                    config::FILE_NAME
                )
            })
        }
    }

    fn primary_bin<'a>(&'a self, package: &'a Package) -> Result<&'a str> {
        if let Some(bin) = &self.config.bin {
            Ok(bin)
        } else {
            let targets = bin_targets(package);
            match targets.len() {
                0 => Err(anyhow!("package {} has no binary targets", package.name)),
                1 => Ok(&targets[0].name),
                _ => {
                    if let Some(bin) = &package.default_run {
                        Ok(bin)
                    } else {
                        Err(anyhow!("could not determine primary binary target"))
                    }
                }
            }
        }
    }

    fn out_dir(&self) -> Utf8PathBuf {
        self.root.join(&self.config.build.out_dir)
    }

    pub fn from_env(config: Option<&Utf8Path>) -> Result<Self> {
        if let Some(path) = config {
            let path = path
                .canonicalize_utf8()
                .with_context(|| format!("`{path}` is not a valid config file"))?;
            let root = path
                .parent()
                .ok_or_else(|| anyhow!("`{path}` has no parent directory"))?
                .to_path_buf();
            let meta = MetadataCommand::new().current_dir(&root).no_deps().exec()?;
            let config = Config::load(&path)?;
            Ok(Self {
                root,
                meta,
                config,
                config_path: Some(path),
            })
        } else {
            let meta = MetadataCommand::new().no_deps().exec()?;
            if let Some(path) = find_file(&meta)? {
                let config = Config::load(&path)?;
                let root = path
                    .parent()
                    .map(Utf8Path::to_path_buf)
                    .unwrap_or_else(|| meta.workspace_root.clone());
                Ok(Self {
                    root,
                    meta,
                    config,
                    config_path: Some(path),
                })
            } else {
                Ok(Self {
                    root: meta.workspace_root.clone(),
                    meta,
                    config: Config::default(),
                    config_path: None,
                })
            }
        }
    }
}

/// Searches from the primary package (or the working directory) up to the workspace root.
fn find_file(meta: &Metadata) -> Result<Option<Utf8PathBuf>> {
    let start = if let Some(package) = default_package(meta) {
        package.manifest_path.clone()
    } else {
        Utf8PathBuf::try_from(env::current_dir()?)?
    };
    Ok(search_upwards(&start, &meta.workspace_root))
}

fn render_html(config: &Config, opts: &RenderOptions) -> String {
    let mode = if opts.pretty {
        Mode::PRETTY
    } else {
        Mode::empty()
    };

    if opts.fragment {
        page::prerender(mode)
    } else {
        page::index_html(&config.page, config.bin.as_deref(), &page::prerender(mode))
    }
}

async fn write_html(out: &Utf8Path, html: &str) -> Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create `{parent}`"))?;
    }
    fs::write(out, html)
        .await
        .with_context(|| format!("failed to write `{out}`"))?;
    let size = FileSize(html.len() as u64);
    shell().status("Rendered", format!("{out} ({size})"));
    Ok(())
}

/// Highest resolved version of `name`; several can coexist in one graph.
fn resolved_version(meta: &Metadata, name: &str) -> Option<Version> {
    meta.packages
        .iter()
        .filter(|package| package.name == name)
        .map(|package| package.version.clone())
        .max()
}

fn search_upwards(start: &Utf8Path, root: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .take_while(|path| path.starts_with(root))
        .map(|path| path.join(config::FILE_NAME))
        .find(|path| path.is_file())
}

fn bin_targets(package: &Package) -> Vec<&Target> {
    package
        .targets
        .iter()
        .filter(|target| target.kind.iter().any(|k| k == "bin"))
        .collect()
}
