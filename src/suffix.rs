//! Suffix and LCP arrays of `text + sentinel`.
//!
//! Suffix sorting itself is delegated to `cdivsufsort`; the LCP array is
//! derived with Kasai's algorithm. The sentinel is never materialised: it is
//! the smallest symbol, so its suffix (the empty one, at offset `n`) always
//! sorts first.

/// Suffix array and LCP array of a text with a logical sentinel appended.
///
/// Both arrays have length `n + 1`. `lcp[i]` is the length of the longest
/// common prefix of the suffixes at `sa[i]` and `sa[i - 1]`; `lcp[0]` is 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixData {
    pub suffix_array: Vec<usize>,
    pub lcp: Vec<usize>,
}

impl SuffixData {
    /// Builds the arrays for `text`.
    pub fn build(text: &[u8]) -> Self {
        let n = text.len();

        let mut suffix_array = Vec::with_capacity(n + 1);
        suffix_array.push(n);

        if n > 0 {
            let mut sa = vec![0_i32; n];
            cdivsufsort::sort_in_place(text, &mut sa);
            suffix_array.extend(sa.into_iter().map(|i| i as usize));
        }

        let rank = rank_array(&suffix_array);
        let lcp = lcp_array(text, &suffix_array, &rank);

        Self { suffix_array, lcp }
    }

    /// Number of entries, including the sentinel suffix.
    pub fn len(&self) -> usize {
        self.suffix_array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suffix_array.is_empty()
    }

    pub fn into_parts(self) -> (Vec<usize>, Vec<usize>) {
        (self.suffix_array, self.lcp)
    }
}

/// Inverse of a suffix array: `rank[sa[i]] == i`.
pub(crate) fn rank_array(suffix_array: &[usize]) -> Vec<usize> {
    let mut rank = vec![0; suffix_array.len()];
    for (i, &suffix) in suffix_array.iter().enumerate() {
        rank[suffix] = i;
    }
    rank
}

/// Kasai's algorithm over `text + sentinel`.
///
/// Positions past the end of `text` never match, which is exactly the
/// behaviour of a unique sentinel.
fn lcp_array(text: &[u8], suffix_array: &[usize], rank: &[usize]) -> Vec<usize> {
    let n = text.len();
    let mut lcp = vec![0; suffix_array.len()];
    let mut k = 0;

    for i in 0..=n {
        let x = rank[i];
        if x > 0 {
            let j = suffix_array[x - 1];
            while i + k < n && j + k < n && text[i + k] == text[j + k] {
                k += 1;
            }
            lcp[x] = k;
        } else {
            k = 0;
            continue;
        }
        k = k.saturating_sub(1);
    }

    lcp
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sorts suffixes by comparing slices; the empty suffix sorts first.
    fn naive(text: &[u8]) -> SuffixData {
        let n = text.len();
        let mut suffix_array: Vec<usize> = (0..=n).collect();
        suffix_array.sort_by(|&a, &b| text[a..].cmp(&text[b..]));

        let mut lcp = vec![0; n + 1];
        for i in 1..=n {
            let a = &text[suffix_array[i - 1]..];
            let b = &text[suffix_array[i]..];
            lcp[i] = a.iter().zip(b).take_while(|(x, y)| x == y).count();
        }

        SuffixData { suffix_array, lcp }
    }

    #[test]
    fn test_empty_text() {
        let data = SuffixData::build(b"");
        assert_eq!(data.suffix_array, vec![0]);
        assert_eq!(data.lcp, vec![0]);
    }

    #[test]
    fn test_single_char() {
        let data = SuffixData::build(b"x");
        assert_eq!(data.suffix_array, vec![1, 0]);
        assert_eq!(data.lcp, vec![0, 0]);
    }

    #[test]
    fn test_aaaa() {
        let data = SuffixData::build(b"aaaa");
        assert_eq!(data.suffix_array, vec![4, 3, 2, 1, 0]);
        assert_eq!(data.lcp, vec![0, 0, 1, 2, 3]);
    }

    #[test]
    fn test_banana() {
        let data = SuffixData::build(b"banana");
        assert_eq!(data.suffix_array, vec![6, 5, 3, 1, 0, 4, 2]);
        assert_eq!(data.lcp, vec![0, 0, 1, 3, 0, 0, 2]);
    }

    #[test]
    fn test_matches_naive() {
        for text in [
            &b"mississippi"[..],
            b"abcabcabc",
            b"abracadabra",
            b"the quick brown fox jumps over the lazy dog",
        ] {
            assert_eq!(SuffixData::build(text), naive(text), "text {:?}", text);
        }
    }

    #[test]
    fn test_rank_is_inverse() {
        let data = SuffixData::build(b"abracadabra");
        let rank = rank_array(&data.suffix_array);
        for (i, &suffix) in data.suffix_array.iter().enumerate() {
            assert_eq!(rank[suffix], i);
        }
    }
}
