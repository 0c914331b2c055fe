//! Lexical path handling for the two separator conventions a config can
//! target.
//!
//! Paths inside `config.json` are written for the container's platform, not
//! for the host doing the checking. Everything here works on strings and
//! never touches the filesystem, so the result only depends on the
//! [`PathConvention`] that is passed in.

use serde::Serialize;

/// Platform identifier whose paths use the backslash convention.
pub const WINDOWS_OS: &str = "windows";

/// Path separator convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathConvention {
    /// `/`-separated paths rooted at `/`.
    Posix,
    /// `\`-separated paths with optional drive or UNC prefix. `/` is accepted
    /// as an alternate separator.
    Windows,
}

impl PathConvention {
    /// Convention implied by a declared `platform.os` value.
    #[must_use]
    pub fn for_os(os: &str) -> Self {
        if os == WINDOWS_OS {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Convention of the process running the checks.
    #[must_use]
    pub const fn host() -> Self {
        if std::path::MAIN_SEPARATOR == '\\' {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Primary separator character.
    #[must_use]
    pub const fn separator(self) -> char {
        match self {
            Self::Posix => '/',
            Self::Windows => '\\',
        }
    }

    fn is_separator(self, c: char) -> bool {
        match self {
            Self::Posix => c == '/',
            Self::Windows => c == '\\' || c == '/',
        }
    }

    /// Splits a Windows drive (`C:`) or UNC share (`\\host\share`) prefix
    /// from the rest of the path. POSIX paths never have a prefix.
    fn split_prefix(self, path: &str) -> (&str, &str) {
        if self == Self::Posix {
            return ("", path);
        }

        let chars: Vec<char> = path.chars().take(3).collect();
        if chars.len() >= 3
            && self.is_separator(chars[0])
            && self.is_separator(chars[1])
            && !self.is_separator(chars[2])
        {
            // \\host\share: the prefix ends at the separator after `share`.
            let rest = &path[2..];
            let Some(host_end) = rest.find(|c| self.is_separator(c)) else {
                return (path, "");
            };
            let after_host = &rest[host_end + 1..];
            let share_end = after_host
                .find(|c| self.is_separator(c))
                .unwrap_or(after_host.len());
            let split = 2 + host_end + 1 + share_end;
            return (&path[..split], &path[split..]);
        }

        let bytes = path.as_bytes();
        if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
            return (&path[..2], &path[2..]);
        }

        ("", path)
    }

    /// Whether `path` is absolute under this convention.
    ///
    /// On Windows a rooted path without a drive (`\foo`) counts as absolute;
    /// a drive-relative path (`C:foo`) does not.
    #[must_use]
    pub fn is_absolute(self, path: &str) -> bool {
        let (_, rest) = self.split_prefix(path);
        rest.chars().next().is_some_and(|c| self.is_separator(c))
    }

    /// Joins `path` onto `base`. An absolute `path` replaces `base`.
    #[must_use]
    pub fn join(self, base: &str, path: &str) -> String {
        if self.is_absolute(path) || base.is_empty() {
            return path.to_string();
        }
        if base.ends_with(|c| self.is_separator(c)) {
            format!("{base}{path}")
        } else {
            format!("{base}{}{path}", self.separator())
        }
    }

    /// Normalized components, with `.` removed and `..` folded where
    /// possible.
    fn components(self, path: &str) -> Vec<&str> {
        let absolute = self.is_absolute(path);
        let (_, rest) = self.split_prefix(path);
        let mut out: Vec<&str> = Vec::new();
        for part in rest.split(|c| self.is_separator(c)) {
            match part {
                "" | "." => {}
                ".." => match out.last() {
                    Some(&last) if last != ".." => {
                        out.pop();
                    }
                    // `..` above the root is the root.
                    _ if absolute => {}
                    _ => out.push(".."),
                },
                other => out.push(other),
            }
        }
        out
    }

    fn same_component(self, a: &str, b: &str) -> bool {
        match self {
            Self::Posix => a == b,
            Self::Windows => a.eq_ignore_ascii_case(b),
        }
    }

    /// Lexical relative path from `start` to `path`.
    ///
    /// Returns `None` when the two paths cannot be related without consulting
    /// a working directory: one absolute and one relative, or different
    /// Windows drives.
    #[must_use]
    pub fn relative(self, path: &str, start: &str) -> Option<String> {
        if self.is_absolute(path) != self.is_absolute(start) {
            return None;
        }
        let (path_prefix, _) = self.split_prefix(path);
        let (start_prefix, _) = self.split_prefix(start);
        if !self.same_component(path_prefix, start_prefix) {
            return None;
        }

        let path_parts = self.components(path);
        let start_parts = self.components(start);
        let common = path_parts
            .iter()
            .zip(&start_parts)
            .take_while(|(a, b)| self.same_component(a, b))
            .count();

        let mut parts: Vec<&str> = std::iter::repeat_n("..", start_parts.len() - common).collect();
        parts.extend_from_slice(&path_parts[common..]);
        if parts.is_empty() {
            return Some(".".to_string());
        }
        Some(parts.join(&self.separator().to_string()))
    }

    /// Whether a relative path produced by [`relative`](Self::relative)
    /// spans more than one component.
    #[must_use]
    pub fn has_separator(self, path: &str) -> bool {
        path.contains(|c| self.is_separator(c))
    }

    /// First component of `path`.
    #[must_use]
    pub fn first_component(self, path: &str) -> &str {
        path.split(|c| self.is_separator(c)).next().unwrap_or(path)
    }
}
