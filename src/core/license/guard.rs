//! Include guard naming.

use regex::Regex;
use std::sync::LazyLock;

const SEPARATORS: [char; 4] = ['/', '\\', '.', '-'];
const STRIPPED: [&str; 2] = ["INCLUDE_", "SRC_"];

static UNDERSCORE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new("_+").unwrap());

/// Canonical guard token for a header, derived from its path relative to the
/// scan root.
///
/// Upper-cases the path, turns separators and dots into `_`, drops the
/// `INCLUDE_`/`SRC_` layout segments and wraps the result as
/// `<PREFIX>_<PATH>_` with runs of `_` collapsed. Two paths that differ only
/// in those dropped segments map to the same token.
pub fn derive_guard(relative_path: &str, prefix: &str) -> String {
    let mut guard = relative_path.to_uppercase();
    for sep in SEPARATORS {
        guard = guard.replace(sep, "_");
    }
    for segment in STRIPPED {
        guard = guard.replace(segment, "");
    }

    let guard = format!("{}_{}_", prefix.to_uppercase(), guard);
    UNDERSCORE_RUNS.replace_all(&guard, "_").into_owned()
}

/// `#ifndef` / `#define` pair opening the guard.
pub fn guard_header(guard: &str) -> String {
    format!("#ifndef {}\n#define {}\n", guard, guard)
}

/// `#endif` line closing the guard.
pub fn guard_footer(guard: &str) -> String {
    format!("#endif  // {}\n", guard)
}

/// Token of the first well-formed guard in `text`: an `#ifndef T` line, the
/// matching `#define T` on the next line and a later `#endif  // T` line.
pub fn find_guard(text: &str) -> Option<&str> {
    let lines: Vec<&str> = text.split('\n').collect();

    for (i, pair) in lines.windows(2).enumerate() {
        let Some(token) = pair[0].strip_prefix("#ifndef ") else {
            continue;
        };
        if token.is_empty() || pair[1].strip_prefix("#define ") != Some(token) {
            continue;
        }
        let footer = format!("#endif  // {}", token);
        if lines[i + 2..].iter().any(|line| line.starts_with(&footer)) {
            return Some(token);
        }
    }
    None
}
