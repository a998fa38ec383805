//! Configuration templates for `scry init`.
//!
//! Templates are kept as valid TOML so they can be checked in tests, and handed out with
//! every setting commented out.

/// Local configuration template.
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Global configuration template.
const GLOBAL_TEMPLATE: &str = include_str!("../templates/config-global.toml");

/// Returns the local configuration template as a commented-out example.
pub fn local_template() -> String {
    comment_out(LOCAL_TEMPLATE)
}

/// Returns the global configuration template as a commented-out example.
pub fn global_template() -> String {
    comment_out(GLOBAL_TEMPLATE)
}

/// Prefixes every non-empty, non-comment line with `# `.
fn comment_out(template: &str) -> String {
    template
        .lines()
        .map(|line| {
            if line.is_empty() || line.starts_with('#') {
                format!("{line}\n")
            } else {
                format!("# {line}\n")
            }
        })
        .collect()
}
