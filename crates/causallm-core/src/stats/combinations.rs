//! Lexicographic `k`-combinations.

/// Every `k`-member selection from `pool`, in lexicographic order of
/// positions; `k = 0` yields the empty selection once and `k > pool.len()`
/// yields nothing.
pub struct Combinations<'a, T> {
    pool: &'a [T],
    idx: Vec<usize>,
    done: bool,
}

impl<'a, T: Copy> Combinations<'a, T> {
    pub fn new(pool: &'a [T], k: usize) -> Self {
        Self {
            pool,
            idx: (0..k).collect(),
            done: k > pool.len(),
        }
    }
}

impl<T: Copy> Iterator for Combinations<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.done {
            return None;
        }
        let item = self.idx.iter().map(|&i| self.pool[i]).collect();

        let k = self.idx.len();
        let n = self.pool.len();
        let mut pos = k;
        loop {
            if pos == 0 {
                self.done = true;
                break;
            }
            pos -= 1;
            if self.idx[pos] < n - k + pos {
                self.idx[pos] += 1;
                for p in (pos + 1)..k {
                    self.idx[p] = self.idx[p - 1] + 1;
                }
                break;
            }
        }
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinations_are_lexicographic() {
        let pool = [1, 3, 5, 7];
        let all: Vec<Vec<usize>> = Combinations::new(&pool, 2).collect();
        assert_eq!(
            all,
            vec![
                vec![1, 3],
                vec![1, 5],
                vec![1, 7],
                vec![3, 5],
                vec![3, 7],
                vec![5, 7]
            ]
        );
    }

    #[test]
    fn empty_and_oversized_selections() {
        let pool = ["b", "a", "c"];
        assert_eq!(Combinations::new(&pool, 0).collect::<Vec<_>>(), vec![Vec::<&str>::new()]);
        assert_eq!(Combinations::new(&pool, 3).collect::<Vec<_>>(), vec![vec!["b", "a", "c"]]);
        assert_eq!(Combinations::new(&pool, 4).count(), 0);
        assert_eq!(Combinations::<u8>::new(&[], 0).count(), 1);
    }
}
