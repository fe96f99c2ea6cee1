//! Sub-group partitioning of a session's participants.

use indexmap::IndexMap;

use crate::error::CardinalityError;
use crate::time::GroupSize;

/// Label of the `index`-th sub-group.
pub fn group_label(index: usize) -> String {
    format!("group {index}")
}

/// Consecutive index chunks of `chunk_size` covering `0..total`.
///
/// The last chunk holds the remainder and may be short. Without a chunk size
/// the result is empty (flat mode).
pub fn index_chunks(total: usize, chunk_size: Option<GroupSize>) -> Vec<Vec<usize>> {
    let Some(size) = chunk_size else {
        return Vec::new();
    };
    let indices: Vec<usize> = (0..total).collect();
    indices.chunks(size.get()).map(<[usize]>::to_vec).collect()
}

/// Map index chunks onto `participants`, labelling them `group 0`, `group 1`, ...
///
/// The chunks must cover exactly as many indices as there are participants.
pub fn assign(
    participants: &[String],
    chunks: &[Vec<usize>],
) -> Result<IndexMap<String, Vec<String>>, CardinalityError> {
    let covered: usize = chunks.iter().map(Vec::len).sum();
    if covered != participants.len() {
        return Err(CardinalityError::CountMismatch {
            expected: participants.len(),
            actual: covered,
        });
    }

    let mut groups = IndexMap::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        let members = chunk
            .iter()
            .map(|&index| {
                participants
                    .get(index)
                    .cloned()
                    .ok_or(CardinalityError::IndexOutOfRange {
                        index,
                        len: participants.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        groups.insert(group_label(i), members);
    }
    Ok(groups)
}
