//! Right-aligned zipping of two sequences.

use std::iter;

use crate::error::AlignmentError;

/// Zips two sequences, aligning the second one to the end of the first.
///
/// If the second sequence is shorter than the first by `N` elements, the
/// first `N` pairs carry `None`. This mirrors how default values attach to
/// the trailing parameters of a function signature.
///
/// # Errors
///
/// Returns [`AlignmentError`] if the second sequence is longer than the first.
///
/// # Examples
///
/// ```
/// use pyi_core::rzip_longest;
///
/// let pairs: Vec<_> = rzip_longest([1, 2, 3], ["a", "b"])?.collect();
/// assert_eq!(pairs, vec![(1, None), (2, Some("a")), (3, Some("b"))]);
/// # Ok::<(), pyi_core::AlignmentError>(())
/// ```
pub fn rzip_longest<I, J>(
    first: I,
    second: J,
) -> Result<impl Iterator<Item = (I::Item, Option<J::Item>)>, AlignmentError>
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
    J: IntoIterator,
    J::IntoIter: ExactSizeIterator,
{
    let first = first.into_iter();
    let second = second.into_iter();

    let (first_len, second_len) = (first.len(), second.len());
    if second_len > first_len {
        return Err(AlignmentError {
            first: first_len,
            second: second_len,
        });
    }

    let padding = iter::repeat_with(|| None).take(first_len - second_len);
    Ok(first.zip(padding.chain(second.map(Some))))
}
