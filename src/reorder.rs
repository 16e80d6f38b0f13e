// Stable array move used for within-list reordering

/// Returns a copy of `seq` with the element at `old` relocated to `new`.
///
/// Every other element keeps its relative order. Out-of-range indices leave the
/// sequence untouched.
pub fn move_item<T: Clone>(seq: &[T], old: usize, new: usize) -> Vec<T> {
    let mut out = seq.to_vec();
    move_in_place(&mut out, old, new);
    out
}

/// In-place variant of [`move_item`]. Returns whether anything moved.
pub fn move_in_place<T>(seq: &mut Vec<T>, old: usize, new: usize) -> bool {
    if old == new || old >= seq.len() || new >= seq.len() {
        return false;
    }
    let item = seq.remove(old);
    seq.insert(new, item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_to_front() {
        assert_eq!(move_item(&["c1", "c2", "c3"], 2, 0), vec!["c3", "c1", "c2"]);
    }

    #[test]
    fn test_move_to_back() {
        assert_eq!(move_item(&[1, 2, 3, 4], 0, 3), vec![2, 3, 4, 1]);
        assert_eq!(move_item(&[1, 2, 3, 4], 1, 2), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_same_index_is_noop() {
        let mut v = vec![1, 2, 3];
        assert!(!move_in_place(&mut v, 1, 1));
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn test_out_of_range_is_noop() {
        assert_eq!(move_item(&[1, 2], 5, 0), vec![1, 2]);
        assert_eq!(move_item(&[1, 2], 0, 2), vec![1, 2]);
        assert!(move_item::<u8>(&[], 0, 0).is_empty());
    }

    #[test]
    fn test_every_pair_preserves_length_and_members() {
        let base: Vec<u32> = (0..6).collect();
        for old in 0..base.len() {
            for new in 0..base.len() {
                let moved = move_item(&base, old, new);
                assert_eq!(moved.len(), base.len());
                let mut sorted = moved.clone();
                sorted.sort();
                assert_eq!(sorted, base);
                assert_eq!(moved[new], base[old]);

                let others: Vec<u32> = moved.iter().copied().filter(|&x| x != base[old]).collect();
                let expected: Vec<u32> = base.iter().copied().filter(|&x| x != base[old]).collect();
                assert_eq!(others, expected, "relative order broken for {old}->{new}");
            }
        }
    }
}
