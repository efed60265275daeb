//! Ratcliff/Obershelp sequence similarity.

/// Similarity ratio of two strings in `0.0..=1.0`.
///
/// Computed as `2 * M / T`, where `T` is the total number of characters and
/// `M` the number of characters in matching blocks. Blocks are found by
/// taking the longest common substring and recursing on both sides of it.
/// Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, a_lo..a_hi, b_lo..b_hi);
        if size == 0 {
            continue;
        }
        matched += size;

        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }

    matched
}

/// Longest common block `(i, j, size)` within the given ranges.
///
/// Ties go to the block that starts earliest in `a`, then in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    a_range: std::ops::Range<usize>,
    b_range: std::ops::Range<usize>,
) -> (usize, usize, usize) {
    let width = b_range.len() + 1;
    let mut best = (a_range.start, b_range.start, 0);
    let mut previous = vec![0usize; width];
    let mut current = vec![0usize; width];

    for i in a_range {
        for (offset, j) in b_range.clone().enumerate() {
            current[offset + 1] = if a[i] == b[j] {
                let size = previous[offset] + 1;
                if size > best.2 {
                    best = (i + 1 - size, j + 1 - size, size);
                }
                size
            } else {
                0
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    best
}
