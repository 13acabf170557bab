use camino::Utf8Path;
use tokio::process::Command;

use crate::shell;

/// `cargo <command>`, run from `root` so it acts on that workspace.
pub fn cargo(root: &Utf8Path, command: &str) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(root).kill_on_drop(true).args([
        command,
        if !shell().colors() {
            "--color=never"
        } else {
            "--color=always"
        },
    ]);
    cmd
}

pub fn build(root: &Utf8Path) -> Builder {
    Builder {
        cmd: cargo(root, "build"),
    }
}

pub struct Builder {
    cmd: Command,
}

impl Builder {
    pub fn target(mut self, target: &str) -> Self {
        self.cmd.args(["--target", target]);
        self
    }

    pub fn profile(mut self, profile: &str) -> Self {
        self.cmd.args(["--profile", profile]);
        self
    }

    pub fn package(mut self, package: &str) -> Self {
        self.cmd.args(["--package", package]);
        self
    }

    pub fn bin(mut self, bin: &str) -> Self {
        self.cmd.args(["--bin", bin]);
        self
    }

    pub fn default_features(mut self, enabled: bool) -> Self {
        if !enabled {
            self.cmd.arg("--no-default-features");
        }
        self
    }

    pub fn features(mut self, features: &[String]) -> Self {
        if !features.is_empty() {
            self.cmd.arg(format!("--features={}", features.join(",")));
        }
        self
    }

    pub fn command(self) -> Command {
        self.cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: Command) -> Vec<String> {
        cmd.as_std()
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn build_arguments() {
        let cmd = build(Utf8Path::new("/work"))
            .target("wasm32-unknown-unknown")
            .profile("release")
            .package("podcast-web")
            .bin("podcast-web")
            .default_features(false)
            .features(&["a".to_string(), "b".to_string()])
            .command();

        let args = args(cmd);
        assert_eq!(args[0], "build");
        assert_eq!(
            &args[2..],
            [
                "--target",
                "wasm32-unknown-unknown",
                "--profile",
                "release",
                "--package",
                "podcast-web",
                "--bin",
                "podcast-web",
                "--no-default-features",
                "--features=a,b",
            ]
        );
    }

    #[test]
    fn defaults_add_nothing() {
        let cmd = build(Utf8Path::new("/work"))
            .default_features(true)
            .features(&[])
            .command();
        assert_eq!(args(cmd).len(), 2);
    }

    #[test]
    fn runs_in_the_project_root() {
        let cmd = cargo(Utf8Path::new("/elsewhere/site"), "clean");
        assert_eq!(
            cmd.as_std().get_current_dir(),
            Some(std::path::Path::new("/elsewhere/site"))
        );
        assert_eq!(args(cmd)[0], "clean");
    }
}
