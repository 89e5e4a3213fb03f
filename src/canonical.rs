//! Strand and orientation canonicalization.
//!
//! A window of a read can be observed in either orientation, and its sequence on either
//! strand.
//! The functions in this module map both presentations to a single canonical form:
//! [`canonical_finger`] for windows of factor lengths and [`canonical_sequence`] for
//! representative substrings.
//! Both use the same two-pointer scan from the ends of the input towards the middle,
//! deciding at the first pair that differs.
//!
//! [`representative`] extracts the substring that disambiguates a window: the longest
//! factor of the (interior of the) window, reduced to its canonical strand.


//-----------------------------------------------------------------------------

/// Returns the DNA complement of a base.
///
/// `A`/`T` and `C`/`G` are complementary; `N` is its own complement.
/// Any other byte is treated as `N`.
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        _ => b'N',
    }
}

/// Returns the reverse complement of a DNA sequence.
///
/// # Examples
///
/// ```
/// use kfinger_graph::canonical;
///
/// assert_eq!(canonical::reverse_complement("AACGT"), "ACGTT");
/// assert_eq!(canonical::reverse_complement(""), "");
/// ```
pub fn reverse_complement(sequence: &str) -> String {
    sequence.bytes().rev().map(|base| complement(base) as char).collect()
}

//-----------------------------------------------------------------------------

/// Returns the orientation-independent form of a k-finger.
///
/// The values are scanned pairwise from both ends.
/// At the first differing pair, the window is kept if the left value is smaller
/// and reversed if it is larger.
/// A window that is symmetric under this scan is returned unchanged.
/// The operation is idempotent.
pub fn canonical_finger(mut finger: Vec<usize>) -> Vec<usize> {
    if finger.is_empty() {
        return finger;
    }

    let mut left = 0;
    let mut right = finger.len() - 1;
    while left < right {
        if finger[left] < finger[right] {
            return finger;
        }
        if finger[left] > finger[right] {
            finger.reverse();
            return finger;
        }
        left += 1;
        right -= 1;
    }

    finger
}

/// Returns the strand-independent form of a DNA sequence.
///
/// The characters are scanned pairwise from both ends, comparing the left character
/// against the complement of the right one.
/// At the first differing pair, the sequence is kept if the left character is smaller
/// and replaced by its full reverse complement if it is larger.
/// A palindrome under complement is returned unchanged.
/// The operation is idempotent.
pub fn canonical_sequence(sequence: &str) -> String {
    let bytes = sequence.as_bytes();
    if bytes.is_empty() {
        return String::new();
    }

    let mut left = 0;
    let mut right = bytes.len() - 1;
    while left < right {
        let paired = complement(bytes[right]);
        if bytes[left] < paired {
            return String::from(sequence);
        }
        if bytes[left] > paired {
            return reverse_complement(sequence);
        }
        left += 1;
        right -= 1;
    }

    String::from(sequence)
}

//-----------------------------------------------------------------------------

// Representatives longer than this are compressed to their first and last
// `COMPRESSED_LEN` characters.
const MAX_REPRESENTATIVE_LEN: usize = 20;
const COMPRESSED_LEN: usize = 10;

/// Returns the representative substring for the window `factors[begin..end]`.
///
/// The representative is the longest factor in the window, with the earliest factor
/// winning ties.
/// Windows wider than 3 factors are first shrunk by excluding the first and the last
/// factor, which are biased by the window boundary.
/// With `normalize`, the chosen factor is replaced by its reverse complement when that
/// is lexicographically smaller.
/// Representatives longer than 20 characters keep only their first and last 10 characters.
///
/// The range must be non-empty and within the bounds of `factors`.
pub fn representative(factors: &[String], begin: usize, end: usize, normalize: bool) -> String {
    let (begin, end) = if end - begin > 3 {
        (begin + 1, end - 1)
    } else {
        (begin, end)
    };

    let mut longest = &factors[begin];
    for factor in factors[begin + 1..end].iter() {
        if factor.len() > longest.len() {
            longest = factor;
        }
    }

    let mut result = longest.clone();
    if normalize {
        let rev_comp = reverse_complement(&result);
        if rev_comp < result {
            result = rev_comp;
        }
    }

    if result.len() > MAX_REPRESENTATIVE_LEN {
        result = format!(
            "{}{}",
            &result[..COMPRESSED_LEN],
            &result[result.len() - COMPRESSED_LEN..]
        );
    }
    result
}

//-----------------------------------------------------------------------------
