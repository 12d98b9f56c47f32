//! In-memory banner and include guard normalization of one file.

use super::banner::Banner;
use super::guard;

const PRAGMA_ONCE: &str = "#pragma once";

/// Result of normalizing one file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    /// True when `text` differs from the input and the file should be rewritten.
    pub modified: bool,
}

/// Ensure the banner leads the file and return the text with the offset of
/// the first directive that follows it.
fn apply_banner(text: &str, banner: &Banner) -> (String, usize) {
    let anchor = banner.anchor();

    if let Some(pos) = text.find(anchor) {
        return (text.to_string(), pos + anchor.len() - 1);
    }

    // Everything up to and including the first directive marker is treated
    // as a stale license block and replaced.
    if let Some(hash) = text.find('#') {
        let out = format!("{}{}", anchor, &text[hash + 1..]);
        return (out, anchor.len() - 1);
    }

    // No directive at all: keep the text, lead it with banner and blank line.
    let prefix = format!("{}\n", banner.text());
    if text.starts_with(&prefix) {
        (text.to_string(), prefix.len())
    } else {
        (format!("{}{}", prefix, text), prefix.len())
    }
}

/// Collapse trailing newlines to exactly one.
fn single_trailing_newline(text: &mut String) {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    while text.ends_with("\n\n") {
        text.pop();
    }
}

/// Normalize a source file: banner and trailing newline only.
pub fn normalize_source(text: &str, banner: &Banner) -> Normalized {
    let (mut out, _) = apply_banner(text, banner);
    single_trailing_newline(&mut out);
    Normalized {
        modified: out != text,
        text: out,
    }
}

/// Normalize a header: banner, `#pragma once` removal, canonical include
/// guard, guard spacing and trailing newline.
///
/// An existing guard with another token is renamed by replacing every
/// occurrence of the old token in the file. `modified` compares the final
/// text with the input, so an intermediate edit that a later step undoes
/// does not count as a change.
pub fn normalize_header(text: &str, banner: &Banner, canonical: &str) -> Normalized {
    let (mut out, at) = apply_banner(text, banner);

    if out[at..].starts_with(PRAGMA_ONCE) {
        out.replace_range(at..at + PRAGMA_ONCE.len(), "");
    }

    let header = guard::guard_header(canonical);
    let footer = guard::guard_footer(canonical);

    match guard::find_guard(&out[at..]).map(str::to_string) {
        None => {
            out.insert_str(at, &header);
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&footer);
        }
        Some(found) if found != canonical => {
            out = out.replace(&found, canonical);
        }
        Some(_) => {}
    }

    if !out.ends_with('\n') {
        out.push('\n');
    }

    // One blank line after the guard's #define.
    if let Some(start) = out.find(&header) {
        let pos = start + header.len() - 1;
        if !out[pos..].starts_with("\n\n") {
            out.insert(pos, '\n');
        }
        while out[pos..].starts_with("\n\n\n") {
            out.remove(pos);
        }
    }

    // No blank line before the guard's #endif.
    while let Some(pos) = out.find(&footer) {
        if !out[..pos].ends_with("\n\n") {
            break;
        }
        out.remove(pos - 1);
    }

    single_trailing_newline(&mut out);

    Normalized {
        modified: out != text,
        text: out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUARD: &str = "OZZ_BASE_LOG_H_";

    fn banner() -> Banner {
        Banner::from_text("// License //\n")
    }

    fn canonical_header(body: &str) -> String {
        format!(
            "// License //\n\n#ifndef {g}\n#define {g}\n\n{body}#endif  // {g}\n",
            g = GUARD,
            body = body
        )
    }

    #[test]
    fn canonical_header_is_untouched() {
        let text = canonical_header("#include <cstddef>\nint x;\n");
        let result = normalize_header(&text, &banner(), GUARD);
        assert!(!result.modified);
        assert_eq!(result.text, text);
    }

    #[test]
    fn header_normalization_is_idempotent() {
        let inputs = [
            "#pragma once\nint x;",
            "/* old license */\n#ifndef OLD_H\n#define OLD_H\nint x;\n\n\n#endif  // OLD_H\n\n\n",
            "int x;\n",
            "",
        ];
        for input in inputs {
            let first = normalize_header(input, &banner(), GUARD);
            let second = normalize_header(&first.text, &banner(), GUARD);
            assert!(!second.modified, "second pass changed {:?}", first.text);
            assert_eq!(second.text, first.text);
        }
    }

    #[test]
    fn missing_banner_replaces_text_up_to_first_directive() {
        let text = "// Old license\n// more\n#include <a.h>\n";
        let result = normalize_source(text, &banner());
        assert!(result.modified);
        assert_eq!(result.text, "// License //\n\n#include <a.h>\n");
    }

    #[test]
    fn pragma_once_becomes_guard() {
        let text = "// License //\n\n#pragma once\n#include <a.h>\n";
        let result = normalize_header(text, &banner(), GUARD);
        assert!(result.modified);
        assert_eq!(result.text, canonical_header("#include <a.h>\n"));
    }

    #[test]
    fn foreign_guard_is_renamed_everywhere() {
        let text = "// License //\n\n#ifndef OLD_H\n#define OLD_H\n\nint x;  // OLD_H\n#endif  // OLD_H\n";
        let result = normalize_header(text, &banner(), GUARD);
        assert!(result.modified);
        assert!(!result.text.contains("OLD_H"));
        assert_eq!(result.text, canonical_header(&format!("int x;  // {}\n", GUARD)));
    }

    #[test]
    fn guard_spacing_is_fixed() {
        let text = format!(
            "// License //\n\n#ifndef {g}\n#define {g}\n\n\n\nint x;\n\n\n#endif  // {g}\n\n",
            g = GUARD
        );
        let result = normalize_header(&text, &banner(), GUARD);
        assert!(result.modified);
        assert_eq!(result.text, canonical_header("int x;\n"));
    }

    #[test]
    fn guard_added_when_missing() {
        let text = "// License //\n\n#include <a.h>\nint x;";
        let result = normalize_header(text, &banner(), GUARD);
        assert!(result.modified);
        assert_eq!(result.text, canonical_header("#include <a.h>\nint x;\n"));
    }

    #[test]
    fn source_without_directive_keeps_its_text() {
        let result = normalize_source("int main() { return 0; }\n", &banner());
        assert!(result.modified);
        assert_eq!(result.text, "// License //\n\nint main() { return 0; }\n");

        let again = normalize_source(&result.text, &banner());
        assert!(!again.modified);
    }

    #[test]
    fn source_trailing_newlines_collapse() {
        let text = "// License //\n\n#include <a.h>\n\n\n";
        let result = normalize_source(text, &banner());
        assert!(result.modified);
        assert_eq!(result.text, "// License //\n\n#include <a.h>\n");
    }
}
