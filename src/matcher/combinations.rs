/// Every `size`-element subset of `0..len`, as sorted index lists in
/// lexicographic order.
pub fn combinations(len: usize, size: usize) -> Vec<Vec<usize>> {
    let mut output = Vec::new();
    let mut current = Vec::with_capacity(size);
    collect(len, size, 0, &mut current, &mut output);
    output
}

fn collect(len: usize, size: usize, start: usize, current: &mut Vec<usize>, output: &mut Vec<Vec<usize>>) {
    if current.len() == size {
        output.push(current.clone());
        return;
    }
    for i in start..len {
        current.push(i);
        collect(len, size, i + 1, current, output);
        current.pop();
    }
}

/// Binomial coefficient C(n, k)
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicographic_order() {
        assert_eq!(
            combinations(4, 2),
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
    }

    #[test]
    fn test_counts_match_binomial() {
        for n in 0..8 {
            for k in 0..=n {
                assert_eq!(combinations(n, k).len(), binomial(n, k), "C({}, {})", n, k);
            }
        }
    }

    #[test]
    fn test_edges() {
        assert_eq!(combinations(3, 0), vec![Vec::<usize>::new()]);
        assert!(combinations(2, 3).is_empty());
        assert_eq!(binomial(5, 7), 0);
        assert_eq!(binomial(10, 3), 120);
    }
}
