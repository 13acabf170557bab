use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{anyhow, bail, Context, Result};
use camino::Utf8Path;
use cargo_metadata::semver::Version;
use flate2::read::GzDecoder;
use tar::Archive;
use tokio::{process::Command, task};

use crate::{shell, util::Elapsed};

const NAME: &str = "wasm-bindgen";

/// `wasm-bindgen --target=web`, emitting `{name}.js` and `{name}_bg.wasm` into `out_dir`.
///
/// The CLI has to be the exact version of the `wasm-bindgen` crate the
/// wasm file was compiled against.
pub async fn wasm_bindgen(
    version: &Version,
    input: &Utf8Path,
    out_dir: &Utf8Path,
) -> Result<Command> {
    let mut cmd = Command::new(locate(version).await?);
    cmd.kill_on_drop(true).args([
        input.as_str(),
        "--target=web",
        "--no-typescript",
        &format!("--out-dir={out_dir}"),
    ]);
    Ok(cmd)
}

async fn locate(version: &Version) -> Result<PathBuf> {
    if let Ok(path) = which::which(NAME) {
        let output = Command::new(&path).arg("--version").output().await?;
        match parse_version(&String::from_utf8_lossy(&output.stdout)) {
            Some(found) if &found == version => return Ok(path),
            Some(found) => shell().warn(format!(
                "{} is {NAME} {found}, the project needs {version}",
                path.display()
            )),
            None => shell().warn(format!("could not read the version of {}", path.display())),
        }
    }

    let base = dirs::cache_dir().ok_or_else(|| anyhow!("no cache directory on this system"))?;
    let exe = base
        .join("podcast")
        .join(format!("{NAME}-{version}"))
        .join(exe_name());
    if !exe.exists() {
        fetch(version, &exe).await?;
    }
    Ok(exe)
}

async fn fetch(version: &Version, exe: &Path) -> Result<()> {
    let start = Instant::now();
    let url = release_url(version, host_triple()?);
    shell().progress("Downloading", format!("{NAME} {version}"));

    let dest = exe.to_path_buf();
    task::spawn_blocking(move || -> Result<()> {
        let response = ureq::get(&url)
            .call()
            .with_context(|| format!("failed to download {url}"))?;
        unpack(GzDecoder::new(response.into_reader()), &dest)
    })
    .await??;

    shell().status(
        "Downloaded",
        format!("{NAME} {version} in {}", Elapsed(start.elapsed())),
    );
    Ok(())
}

/// Extracts the entry named like `exe` from a tar stream into `exe`.
fn unpack(reader: impl Read, exe: &Path) -> Result<()> {
    let wanted = exe
        .file_name()
        .ok_or_else(|| anyhow!("{} has no file name", exe.display()))?;
    let mut archive = Archive::new(reader);
    for entry in archive.entries()? {
        let mut entry = entry?;
        if entry.path()?.file_name() != Some(wanted) {
            continue;
        }

        let mut bytes = vec![];
        entry.read_to_end(&mut bytes)?;
        if let Some(dir) = exe.parent() {
            fs::create_dir_all(dir)?;
        }
        // a partial file must never look like an installed tool
        let partial = exe.with_extension("part");
        fs::write(&partial, &bytes)?;
        make_executable(&partial)?;
        fs::rename(&partial, exe)?;
        return Ok(());
    }
    bail!("release archive has no `{}`", wanted.to_string_lossy())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_: &Path) -> io::Result<()> {
    Ok(())
}

fn exe_name() -> &'static str {
    if cfg!(windows) {
        "wasm-bindgen.exe"
    } else {
        NAME
    }
}

/// Reads `wasm-bindgen 0.2.92` as printed by `--version`.
fn parse_version(output: &str) -> Option<Version> {
    let rest = output.trim().strip_prefix(NAME)?;
    let number = rest.split_whitespace().next()?;
    Version::parse(number).ok()
}

fn host_triple() -> Result<&'static str> {
    if cfg!(all(target_os = "linux", target_arch = "x86_64")) {
        Ok("x86_64-unknown-linux-musl")
    } else if cfg!(all(target_os = "linux", target_arch = "aarch64")) {
        Ok("aarch64-unknown-linux-gnu")
    } else if cfg!(all(target_os = "macos", target_arch = "x86_64")) {
        Ok("x86_64-apple-darwin")
    } else if cfg!(all(target_os = "macos", target_arch = "aarch64")) {
        Ok("aarch64-apple-darwin")
    } else if cfg!(all(windows, target_arch = "x86_64")) {
        Ok("x86_64-pc-windows-msvc")
    } else {
        bail!("no {NAME} release for this platform, install it with `cargo install wasm-bindgen-cli`")
    }
}

fn release_url(version: &Version, triple: &str) -> String {
    format!("https://github.com/rustwasm/wasm-bindgen/releases/download/{version}/{NAME}-{version}-{triple}.tar.gz")
}

#[cfg(test)]
mod tests {
    use flate2::{write::GzEncoder, Compression};

    use super::*;

    fn archive(files: &[(&str, &[u8])]) -> Vec<u8> {
        let gz = GzEncoder::new(vec![], Compression::fast());
        let mut builder = tar::Builder::new(gz);
        for (path, contents) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, path, *contents).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn versions_from_cli_output() {
        let expected = Version::new(0, 2, 129);
        assert_eq!(parse_version("wasm-bindgen 0.2.129\n"), Some(expected));
        assert_eq!(
            parse_version("wasm-bindgen 0.2.92 (2f6d1bc)"),
            Some(Version::new(0, 2, 92))
        );
        assert_eq!(parse_version("wasm-opt version 116"), None);
        assert_eq!(parse_version(""), None);
    }

    #[test]
    fn release_url_uses_the_resolved_version() {
        let version = Version::new(0, 2, 129);
        assert_eq!(
            release_url(&version, "x86_64-unknown-linux-musl"),
            "https://github.com/rustwasm/wasm-bindgen/releases/download/0.2.129/wasm-bindgen-0.2.129-x86_64-unknown-linux-musl.tar.gz"
        );
    }

    #[test]
    fn unpacks_only_the_cli() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("wasm-bindgen-0.2.129").join(exe_name());
        let bytes = archive(&[
            ("wasm-bindgen-0.2.129/wasm2es6js", b"other"),
            (&format!("wasm-bindgen-0.2.129/{}", exe_name()), b"binary"),
        ]);

        unpack(GzDecoder::new(&bytes[..]), &exe).unwrap();

        assert_eq!(fs::read(&exe).unwrap(), b"binary");
        assert!(!exe.with_extension("part").exists());
        assert_eq!(fs::read_dir(exe.parent().unwrap()).unwrap().count(), 1);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&exe).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn archive_without_the_cli_fails() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join(exe_name());
        let bytes = archive(&[("wasm-bindgen-0.2.129/README.md", b"docs")]);

        let err = unpack(GzDecoder::new(&bytes[..]), &exe).unwrap_err();
        assert!(err.to_string().starts_with("release archive has no"));
        assert!(!exe.exists());
    }
}
