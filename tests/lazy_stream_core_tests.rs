use lazy_stream::*;
use tokio::runtime::Runtime;

#[test]
fn test_of() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let result = LazyStream::of(vec![1, 2, 3, 4, 5]).to_list().await.unwrap();
        assert_eq!(result, vec![1, 2, 3, 4, 5]);
    });
}

#[test]
fn test_empty() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let result = LazyStream::<i32>::empty().to_list().await.unwrap();
        assert_eq!(result, Vec::<i32>::new());
    });
}

#[test]
fn test_map() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let result = LazyStream::of(vec![1, 2, 3])
            .map(|x| x * 2)
            .to_list()
            .await
            .unwrap();
        assert_eq!(result, vec![2, 4, 6]);
    });
}

#[test]
fn test_map_changes_element_type() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let result = LazyStream::of(vec![1, 22, 333])
            .map(|x: i32| x.to_string())
            .map(|s| s.len())
            .to_list()
            .await
            .unwrap();
        assert_eq!(result, vec![1, 2, 3]);
    });
}

#[test]
fn test_map_on_empty_input() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let result = LazyStream::of(Vec::<i32>::new())
            .map(|x| x + 1)
            .to_list()
            .await
            .unwrap();
        assert!(result.is_empty());
    });
}

#[test]
fn test_filter() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let result = LazyStream::of(1..=10)
            .filter(|x| x % 3 == 0)
            .to_list()
            .await
            .unwrap();
        assert_eq!(result, vec![3, 6, 9]);
    });
}

#[tokio::test]
async fn test_filter_all_false_and_all_true() {
    let none = LazyStream::of(vec![1, 2, 3])
        .filter(|_| false)
        .to_list()
        .await
        .unwrap();
    assert!(none.is_empty());

    let all = LazyStream::of(vec![1, 2, 3])
        .filter(|_| true)
        .to_list()
        .await
        .unwrap();
    assert_eq!(all, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_distinct_keeps_first_occurrences() {
    let result = LazyStream::of(vec![1, 7, 3, 7, 5, 6, 0, 6, 6])
        .distinct()
        .to_list()
        .await
        .unwrap();
    assert_eq!(result, vec![1, 7, 3, 5, 6, 0]);
}

#[tokio::test]
async fn test_distinct_without_duplicates_is_unchanged() {
    let result = LazyStream::of(vec!["a", "b", "c"])
        .distinct()
        .to_list()
        .await
        .unwrap();
    assert_eq!(result, vec!["a", "b", "c"]);

    let empty = LazyStream::of(Vec::<u8>::new()).distinct().to_list().await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_distinct_by_eq_handles_unhashable_values() {
    let result = LazyStream::of(vec![1.5, 2.0, 1.5, 3.25, 2.0])
        .distinct_by_eq()
        .to_list()
        .await
        .unwrap();
    assert_eq!(result, vec![1.5, 2.0, 3.25]);
}

#[tokio::test]
async fn test_limit_on_finite_source() {
    let result = LazyStream::of(vec![1, 2, 3, 4, 5]).limit(3).to_list().await.unwrap();
    assert_eq!(result, vec![1, 2, 3]);

    let longer = LazyStream::of(vec![1, 2]).limit(10).to_list().await.unwrap();
    assert_eq!(longer, vec![1, 2]);
}

#[tokio::test]
async fn test_iterate_with_limit() {
    let result = LazyStream::iterate(1, |x| x * 2).limit(6).to_list().await.unwrap();
    assert_eq!(result, vec![1, 2, 4, 8, 16, 32]);
}

#[tokio::test]
async fn test_skip() {
    let result = LazyStream::of(1..=6).skip(4).to_list().await.unwrap();
    assert_eq!(result, vec![5, 6]);

    let all_skipped = LazyStream::of(1..=3).skip(10).to_list().await.unwrap();
    assert!(all_skipped.is_empty());
}

#[tokio::test]
async fn test_flat_map() {
    let result = LazyStream::of(vec![1usize, 2, 3])
        .flat_map(|n| LazyStream::of(vec![n; n]))
        .to_list()
        .await
        .unwrap();
    assert_eq!(result, vec![1, 2, 2, 3, 3, 3]);
}

#[tokio::test]
async fn test_flat_map_with_empty_sub_streams() {
    let result = LazyStream::of(vec![0, 1, 0, 2, 0])
        .flat_map(|n| LazyStream::of(0..n))
        .to_list()
        .await
        .unwrap();
    assert_eq!(result, vec![0, 0, 1]);
}

#[tokio::test]
async fn test_flat_map_over_infinite_source_is_lazy() {
    let result = LazyStream::iterate(0, |x| x + 1)
        .flat_map(|x| LazyStream::of(vec![x, x]))
        .limit(5)
        .to_list()
        .await
        .unwrap();
    assert_eq!(result, vec![0, 0, 1, 1, 2]);
}

#[tokio::test]
async fn test_reduce() {
    let sum = LazyStream::of(vec![1, 2, 3, 4, 5, 6])
        .reduce(0, |acc, x| acc + x)
        .await
        .unwrap();
    assert_eq!(sum, 21);

    let flipped = LazyStream::of(vec![1, 2, 3, 4, 5, 6])
        .reduce(0, |acc, x| x + acc)
        .await
        .unwrap();
    assert_eq!(flipped, 21);
}

#[tokio::test]
async fn test_reduce_empty_returns_identity() {
    let result = LazyStream::of(Vec::<i32>::new())
        .reduce(42, |acc, x| acc + x)
        .await
        .unwrap();
    assert_eq!(result, 42);
}

#[tokio::test]
async fn test_reduce_is_a_left_fold() {
    let result = LazyStream::of(vec!["a", "b", "c"])
        .reduce(String::from(">"), |acc, x| format!("({}{})", acc, x))
        .await
        .unwrap();
    assert_eq!(result, "(((>a)b)c)");
}

#[tokio::test]
async fn test_concat_preserves_each_side_order() {
    let result = LazyStream::concat(LazyStream::of(vec![1, 2, 3, 4]), LazyStream::of(vec![5, 6, 7]))
        .to_list()
        .await
        .unwrap();
    assert_eq!(result, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[tokio::test]
async fn test_concat_with_infinite_second_stream() {
    let result = LazyStream::concat(LazyStream::of(vec![-2, -1]), LazyStream::iterate(0, |x| x + 1))
        .limit(4)
        .to_list()
        .await
        .unwrap();
    assert_eq!(result, vec![-2, -1, 0, 1]);
}

#[tokio::test]
async fn test_peek_observes_without_changing() {
    let mut seen = Vec::new();
    let (tx, rx) = std::sync::mpsc::channel();
    let result = LazyStream::of(vec![3, 1, 2])
        .peek(move |x| tx.send(*x).unwrap())
        .map(|x| x * 10)
        .to_list()
        .await
        .unwrap();
    seen.extend(rx.try_iter());
    assert_eq!(result, vec![30, 10, 20]);
    assert_eq!(seen, vec![3, 1, 2]);
}

#[tokio::test]
async fn test_sorted_and_sorted_by() {
    let ascending = LazyStream::of(vec![5, 3, 9, 1]).sorted().to_list().await.unwrap();
    assert_eq!(ascending, vec![1, 3, 5, 9]);

    let by_len = LazyStream::of(vec!["ccc", "a", "bb", "d"])
        .sorted_by(|a, b| a.len().cmp(&b.len()))
        .to_list()
        .await
        .unwrap();
    // stable: "a" stays ahead of "d"
    assert_eq!(by_len, vec!["a", "d", "bb", "ccc"]);
}

#[tokio::test]
async fn test_count_min_max() {
    assert_eq!(LazyStream::of(vec![4, 8, 1]).count().await.unwrap(), 3);
    assert_eq!(LazyStream::of(vec![4, 8, 1]).min().await.unwrap(), Some(1));
    assert_eq!(LazyStream::of(vec![4, 8, 1]).max().await.unwrap(), Some(8));
    assert_eq!(LazyStream::<i32>::empty().max().await.unwrap(), None);
}

#[tokio::test]
async fn test_min_by_and_max_by_tie_breaking() {
    let words = vec!["bb", "aa", "c", "dd"];
    let shortest = LazyStream::of(words.clone())
        .min_by(|a, b| a.len().cmp(&b.len()))
        .await
        .unwrap();
    assert_eq!(shortest, Some("c"));

    let first_longest = LazyStream::of(words.clone())
        .filter(|w| w.len() == 2)
        .min_by(|a, b| b.len().cmp(&a.len()))
        .await
        .unwrap();
    assert_eq!(first_longest, Some("bb"));

    let last_longest = LazyStream::of(words)
        .max_by(|a, b| a.len().cmp(&b.len()))
        .await
        .unwrap();
    assert_eq!(last_longest, Some("dd"));
}

#[tokio::test]
async fn test_for_each_visits_in_order() {
    let (tx, rx) = std::sync::mpsc::channel();
    LazyStream::of(vec!['x', 'y', 'z'])
        .for_each(move |c| tx.send(c).unwrap())
        .await
        .unwrap();
    assert_eq!(rx.try_iter().collect::<String>(), "xyz");
}

#[tokio::test]
async fn test_find_any() {
    let found = LazyStream::of(vec![1, 2, 3])
        .filter(|x| *x > 1)
        .find_any()
        .await
        .unwrap();
    assert_eq!(found, Some(2));

    let missing = LazyStream::of(vec![1, 2, 3])
        .filter(|x| *x > 5)
        .find_any()
        .await
        .unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn test_any_match_and_all_match() {
    assert!(LazyStream::of(vec![1, 2, 3]).any_match(|x| *x == 2).await.unwrap());
    assert!(!LazyStream::of(vec![1, 2, 3]).any_match(|x| *x == 9).await.unwrap());
    assert!(!LazyStream::<i32>::empty().any_match(|_| true).await.unwrap());

    assert!(LazyStream::of(vec![2, 4, 6]).all_match(|x| x % 2 == 0).await.unwrap());
    assert!(!LazyStream::of(vec![2, 3, 6]).all_match(|x| x % 2 == 0).await.unwrap());
    assert!(LazyStream::<i32>::empty().all_match(|_| false).await.unwrap());
}
