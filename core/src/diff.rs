//! Token-level diff for tracked corrections.
//!
//! The edit script is built from a longest-common-subsequence table over whole
//! tokens. Inputs whose table would exceed the cell budget use a prefix/suffix
//! trim instead; the result still transforms `before` into `after`, it is just
//! not minimal.

use serde::{Deserialize, Serialize};

/// Cell budget for the LCS table.
pub const DEFAULT_MAX_CELLS: usize = 300_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Equal,
    Insert,
    Delete,
}

impl DiffKind {
    /// One-character marker used in plain-text output.
    pub fn marker(self) -> char {
        match self {
            DiffKind::Equal => '=',
            DiffKind::Insert => '+',
            DiffKind::Delete => '-',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOperation {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    pub text: String,
}

impl DiffOperation {
    pub fn new<T: Into<String>>(kind: DiffKind, text: T) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Coalesce adjacent operations of the same kind and drop empty ones.
pub fn merge_operations(operations: Vec<DiffOperation>) -> Vec<DiffOperation> {
    let mut merged: Vec<DiffOperation> = Vec::with_capacity(operations.len());
    for op in operations {
        if op.text.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(prev) if prev.kind == op.kind => prev.text.push_str(&op.text),
            _ => merged.push(op),
        }
    }
    merged
}

fn push<S: AsRef<str>>(ops: &mut Vec<DiffOperation>, kind: DiffKind, token: &S) {
    ops.push(DiffOperation::new(kind, token.as_ref()));
}

/// Prefix/suffix trim: equal prefix, one delete block, one insert block,
/// equal suffix. Not merged.
pub fn fallback_diff<S: AsRef<str>>(before: &[S], after: &[S]) -> Vec<DiffOperation> {
    let prefix = before
        .iter()
        .zip(after)
        .take_while(|(a, b)| a.as_ref() == b.as_ref())
        .count();
    let suffix = before[prefix..]
        .iter()
        .rev()
        .zip(after[prefix..].iter().rev())
        .take_while(|(a, b)| a.as_ref() == b.as_ref())
        .count();
    let before_end = before.len() - suffix;
    let after_end = after.len() - suffix;

    let mut ops = Vec::with_capacity(before.len() + after.len());
    for token in &before[..prefix] {
        push(&mut ops, DiffKind::Equal, token);
    }
    for token in &before[prefix..before_end] {
        push(&mut ops, DiffKind::Delete, token);
    }
    for token in &after[prefix..after_end] {
        push(&mut ops, DiffKind::Insert, token);
    }
    for token in &before[before_end..] {
        push(&mut ops, DiffKind::Equal, token);
    }
    ops
}

/// Edit script turning `before` into `after`, maximally merged.
///
/// At a divergence the delete branch is taken whenever it keeps at least as
/// long a common subsequence as the insert branch.
///
/// ```
/// use libnihongo_core::diff::{diff_tokens, DiffKind, DEFAULT_MAX_CELLS};
///
/// let ops = diff_tokens(&["a", "b", "c"], &["a", "x", "c"], DEFAULT_MAX_CELLS);
/// let kinds: Vec<_> = ops.iter().map(|o| o.kind).collect();
/// assert_eq!(kinds, [DiffKind::Equal, DiffKind::Delete, DiffKind::Insert, DiffKind::Equal]);
/// ```
pub fn diff_tokens<S: AsRef<str>>(before: &[S], after: &[S], max_cells: usize) -> Vec<DiffOperation> {
    let n = before.len();
    let m = after.len();
    if n.saturating_mul(m) > max_cells {
        tracing::debug!(n, m, max_cells, "token diff over budget, using prefix/suffix trim");
        return merge_operations(fallback_diff(before, after));
    }

    // table[i][j] = LCS length of before[i..] and after[j..], row-major.
    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if before[i].as_ref() == after[j].as_ref() {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if before[i].as_ref() == after[j].as_ref() {
            push(&mut ops, DiffKind::Equal, &before[i]);
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            push(&mut ops, DiffKind::Delete, &before[i]);
            i += 1;
        } else {
            push(&mut ops, DiffKind::Insert, &after[j]);
            j += 1;
        }
    }
    for token in &before[i..] {
        push(&mut ops, DiffKind::Delete, token);
    }
    for token in &after[j..] {
        push(&mut ops, DiffKind::Insert, token);
    }

    merge_operations(ops)
}

/// Rebuild the `before` side of a script (equal + delete).
pub fn source_text(ops: &[DiffOperation]) -> String {
    ops.iter()
        .filter(|o| o.kind != DiffKind::Insert)
        .map(|o| o.text.as_str())
        .collect()
}

/// Rebuild the `after` side of a script (equal + insert).
pub fn target_text(ops: &[DiffOperation]) -> String {
    ops.iter()
        .filter(|o| o.kind != DiffKind::Delete)
        .map(|o| o.text.as_str())
        .collect()
}
