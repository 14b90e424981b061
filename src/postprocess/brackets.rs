//! Auto-sizing of delimiters around fractions.

use crate::config::PipeSizing;
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

/// Commands whose argument is a delimiter; a `|` after them is already sized.
const SIZING_COMMANDS: &[&str] = &[
    "left", "right", "middle", "big", "Big", "bigg", "Bigg", "bigl", "bigr", "bigm", "Bigl",
    "Bigr", "Bigm", "biggl", "biggr", "biggm", "Biggl", "Biggr", "Biggm",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Replace the parentheses of every top-level group that contains a fraction
/// with `\left(` / `\right)`.
///
/// Parentheses that already carry `\left` / `\right` are kept, so running the
/// pass twice gives the same result.
pub fn size_delimiters(input: &str, pipes: PipeSizing) -> String {
    let groups = sized_groups(input);
    if groups.is_empty() {
        return input.to_string();
    }

    let mut first_pair = 2;
    let mut out = String::with_capacity(input.len() + groups.len() * 12);
    let mut last = 0;

    for group in groups {
        out.push_str(&input[last..group.start]);
        size_group(input, group.clone(), pipes, &mut first_pair, &mut out);
        last = group.end;
    }

    out.push_str(&input[last..]);
    out
}

/// Whether the character at `at` is escaped by an odd run of backslashes.
/// `\\` is a row break, not an escape.
fn escaped(input: &str, at: usize) -> bool {
    let run = input[..at].bytes().rev().take_while(|&b| b == b'\\').count();
    run % 2 == 1
}

/// Whether the control word `\<name>` ends right before `at`.
fn command_before(input: &str, at: usize, name: &str) -> bool {
    let before = &input[..at];
    before.ends_with(name)
        && before[..at - name.len()].ends_with('\\')
        && !escaped(input, at - name.len() - 1)
}

/// Byte ranges of top-level balanced `(...)` groups containing `frac`.
fn sized_groups(input: &str) -> Vec<Range<usize>> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut start = None;

    for (i, c) in input.char_indices() {
        if escaped(input, i) {
            continue;
        }
        match c {
            '(' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            ')' => {
                if depth == 0 {
                    continue;
                }
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        let group = s..i + 1;
                        if input[group.clone()].contains("frac") {
                            groups.push(group);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    groups
}

/// Whether the pipe at `at` is the argument of a sizing command or the `\|`
/// escape.
fn is_sized_pipe(input: &str, at: usize) -> bool {
    if escaped(input, at) {
        return true;
    }
    let before = &input[..at];
    let word_start = before
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .len();
    let word = &before[word_start..];
    !word.is_empty() && SIZING_COMMANDS.contains(&word) && command_before(input, at, word)
}

/// Replacements for the parentheses of a group, keyed by byte offset.
///
/// Each pair is decided once at its opening paren: a pair opened by `\left(`
/// is kept as is, any other pair is rewritten at both ends.
fn paren_sizes(input: &str, group: Range<usize>) -> HashMap<usize, &'static str> {
    let mut sizes = HashMap::new();
    let mut open: Vec<bool> = Vec::new();

    for (i, c) in input[group.clone()].char_indices() {
        let at = group.start + i;
        if escaped(input, at) {
            continue;
        }
        match c {
            '(' => {
                let rewrite = !command_before(input, at, "left");
                if rewrite {
                    sizes.insert(at, r"\left(");
                }
                open.push(rewrite);
            }
            ')' => {
                if open.pop() == Some(true) && !command_before(input, at, "right") {
                    sizes.insert(at, r"\right)");
                }
            }
            _ => {}
        }
    }

    sizes
}

fn size_group(
    input: &str,
    group: Range<usize>,
    pipes: PipeSizing,
    first_pair: &mut usize,
    out: &mut String,
) {
    let parens = paren_sizes(input, group.clone());
    let roles = pipe_roles(input, group.clone(), pipes, first_pair);

    for (i, c) in input[group.clone()].char_indices() {
        let at = group.start + i;
        if let Some(sized) = parens.get(&at) {
            out.push_str(sized);
            continue;
        }
        match (c, roles.get(&at)) {
            ('|', Some(Side::Left)) => out.push_str(r"\left|"),
            ('|', Some(Side::Right)) => out.push_str(r"\right|"),
            _ => out.push(c),
        }
    }
}

/// Decide which pipes in a group open and which close.
fn pipe_roles(
    input: &str,
    group: Range<usize>,
    pipes: PipeSizing,
    first_pair: &mut usize,
) -> HashMap<usize, Side> {
    let mut roles = HashMap::new();
    if pipes == PipeSizing::Off {
        return roles;
    }

    let mut by_depth: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    let mut depth = 0usize;

    for (i, c) in input[group.clone()].char_indices() {
        let at = group.start + i;
        if escaped(input, at) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '|' if !is_sized_pipe(input, at) => {
                by_depth.entry(depth).or_default().push(at);
            }
            _ => {}
        }
    }

    match pipes {
        PipeSizing::Scoped => {
            for positions in by_depth.values().filter(|p| p.len() % 2 == 0) {
                for (n, at) in positions.iter().enumerate() {
                    let side = if n % 2 == 0 { Side::Left } else { Side::Right };
                    roles.insert(*at, side);
                }
            }
        }
        PipeSizing::FirstPair => {
            let mut ordered: Vec<usize> = by_depth.into_values().flatten().collect();
            ordered.sort_unstable();
            for at in ordered {
                if *first_pair == 0 {
                    break;
                }
                let side = if *first_pair == 2 { Side::Left } else { Side::Right };
                roles.insert(at, side);
                *first_pair -= 1;
            }
        }
        PipeSizing::Off => {}
    }

    roles
}
