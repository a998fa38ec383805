//! Finding the `.scry.toml` files that apply to a directory.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// Name of every scry configuration file, local or global.
pub const CONFIG_FILENAME: &str = ".scry.toml";

/// Lists the configuration files that apply to `cwd`, most specific first.
///
/// Every `.scry.toml` between `cwd` and the filesystem root is collected. A file declaring
/// `root = true` ends the walk and excludes `~/.scry.toml`; otherwise the global file, when
/// present, comes last. Directories named `.scry.toml` are ignored.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            continue;
        }
        let stops_walk = is_root_config(&candidate);
        configs.push(candidate);
        if stops_walk {
            return configs;
        }
    }

    if let Some(global) = global_config_path().filter(|p| p.is_file())
        && !configs.contains(&global)
    {
        configs.push(global);
    }

    configs
}

/// Path of `~/.scry.toml`, or `None` without a home directory.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Whether `path` is `~/.scry.toml`.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDir;

    /// Drops the user's own global file, which tests cannot control.
    fn local(configs: &[PathBuf]) -> Vec<&PathBuf> {
        configs.iter().filter(|p| !is_global_config(p)).collect()
    }

    #[test]
    fn nothing_found_in_empty_tree() {
        let tree = TestDir::new();
        let cwd = tree.dir("a/b/c");

        assert!(local(&discover_config_files(&cwd)).is_empty());
    }

    #[test]
    fn nearest_file_comes_first() {
        let tree = TestDir::new();
        let top = tree.config("", "[suggest]\nlimit = 1\n");
        let mid = tree.config("a/b", "");
        let leaf = tree.config("a/b/c/d", "");
        let cwd = tree.dir("a/b/c/d/e");

        assert_eq!(local(&discover_config_files(&cwd)), vec![&leaf, &mid, &top]);
    }

    #[test]
    fn directory_named_like_config_is_skipped() {
        let tree = TestDir::new();
        tree.dir(CONFIG_FILENAME);
        let cwd = tree.dir("sub");

        assert!(local(&discover_config_files(&cwd)).is_empty());
    }

    #[test]
    fn root_file_ends_walk_and_skips_global() {
        let tree = TestDir::new();
        tree.config("", "");
        let project = tree.config("project", "root = true\n");
        let sub = tree.config("project/sub", "");
        let cwd = tree.dir("project/sub/deep");

        assert_eq!(discover_config_files(&cwd), vec![sub, project]);
    }

    #[test]
    fn root_false_keeps_walking() {
        let tree = TestDir::new();
        let top = tree.config("", "");
        let project = tree.config("project", "root = false\n");
        let cwd = tree.dir("project/src");

        assert_eq!(local(&discover_config_files(&cwd)), vec![&project, &top]);
    }

    #[test]
    fn global_path_is_in_home() {
        let path = global_config_path().unwrap();
        assert!(path.ends_with(CONFIG_FILENAME));
        assert!(is_global_config(&path));
        assert!(!is_global_config(Path::new("/some/other/.scry.toml")));
    }
}
