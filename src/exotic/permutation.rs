use std::collections::BTreeSet;

/// Every ordered selection of `k` distinct positions of `pool`, with equal
/// selections reported once. Empty when `k` exceeds the pool size.
pub(crate) fn k_permutations<T: Clone + Ord>(pool: &[T], k: usize) -> Vec<Vec<T>> {
    if k > pool.len() {
        return Vec::new();
    }

    let mut seen = BTreeSet::new();
    let mut used = vec![false; pool.len()];
    let mut stack: Vec<usize> = Vec::with_capacity(k);
    let mut next = 0usize;

    loop {
        if stack.len() < k {
            let mut candidate = next;
            while candidate < pool.len() && used[candidate] {
                candidate += 1;
            }
            if candidate < pool.len() {
                used[candidate] = true;
                stack.push(candidate);
                next = 0;
                continue;
            }
        } else {
            seen.insert(stack.iter().map(|&at| pool[at].clone()).collect::<Vec<_>>());
        }

        match stack.pop() {
            Some(last) => {
                used[last] = false;
                next = last + 1;
            }
            None => break,
        }
    }

    seen.into_iter().collect()
}

/// Mixed-radix counter over `radices`, yielding every index combination.
///
/// An empty radix list yields one empty combination; any zero radix yields none.
pub(crate) struct Odometer {
    radices: Vec<usize>,
    current: Option<Vec<usize>>,
}

impl Odometer {
    pub(crate) fn new(radices: Vec<usize>) -> Self {
        let current = if radices.contains(&0) {
            None
        } else {
            Some(vec![0; radices.len()])
        };
        Self { radices, current }
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.as_mut()?;
        let yielded = current.clone();
        let mut position = current.len();
        loop {
            if position == 0 {
                self.current = None;
                break;
            }
            position -= 1;
            current[position] += 1;
            if current[position] < self.radices[position] {
                break;
            }
            current[position] = 0;
        }
        Some(yielded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutations_of_distinct_items() {
        let perms = k_permutations(&['a', 'b', 'c'], 2);
        assert_eq!(perms.len(), 6);
        assert!(perms.contains(&vec!['c', 'a']));
        assert!(perms.iter().all(|perm| perm[0] != perm[1]));
    }

    #[test]
    fn permutations_collapse_repeated_items() {
        let pool = [None, None, Some(1)];
        let perms = k_permutations(&pool, 2);
        assert_eq!(
            perms,
            vec![vec![None, None], vec![None, Some(1)], vec![Some(1), None]]
        );
    }

    #[test]
    fn permutations_edge_sizes() {
        assert_eq!(k_permutations(&[1, 2], 0), vec![Vec::<i32>::new()]);
        assert!(k_permutations(&[1, 2], 3).is_empty());
        assert!(k_permutations::<i32>(&[], 1).is_empty());
    }

    #[test]
    fn odometer_counts_every_combination() {
        let all: Vec<_> = Odometer::new(vec![2, 3]).collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all.first(), Some(&vec![0, 0]));
        assert_eq!(all.last(), Some(&vec![1, 2]));
    }

    #[test]
    fn odometer_degenerate_radices() {
        assert_eq!(Odometer::new(vec![]).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
        assert_eq!(Odometer::new(vec![2, 0]).count(), 0);
    }
}
