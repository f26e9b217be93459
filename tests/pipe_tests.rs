use lazy_stream::pipe::{self, PipeExt};
use lazy_stream::*;
use tokio::runtime::Runtime;

#[test]
fn test_pipe_map() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let double = pipe::map(|x: i32| x * 2);

        let result = LazyStream::of(vec![1, 2, 3, 4, 5])
            .through(&double)
            .to_list()
            .await
            .unwrap();
        assert_eq!(result, vec![2, 4, 6, 8, 10]);
    });
}

#[test]
fn test_pipe_filter() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let even_only = pipe::filter(|x: &i32| x % 2 == 0);

        let result = LazyStream::of(vec![1, 2, 3, 4, 5])
            .through(&even_only)
            .to_list()
            .await
            .unwrap();
        assert_eq!(result, vec![2, 4]);
    });
}

#[test]
fn test_pipe_compose() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let plus_one = pipe::map(|x: i32| x + 1);
        let even_only = pipe::filter(|x: &i32| x % 2 == 0);

        // first add one, then keep the even results
        let segment = pipe::compose(plus_one, even_only);

        let result = LazyStream::of(vec![1, 2, 3, 4, 5])
            .through(&segment)
            .to_list()
            .await
            .unwrap();
        assert_eq!(result, vec![2, 4, 6]);
    });
}

#[test]
fn test_pipe_identity() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let result = LazyStream::of(vec![1, 2, 3])
            .through(&pipe::identity())
            .to_list()
            .await
            .unwrap();
        assert_eq!(result, vec![1, 2, 3]);
    });
}

#[test]
fn test_pipe_ext_compose() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let double = pipe::map(|x: i32| x * 2);
        let to_string = pipe::map(|x: i32| x.to_string());

        let segment = double.compose(to_string);

        let result = LazyStream::of(vec![1, 2, 3])
            .through(&segment)
            .to_list()
            .await
            .unwrap();
        assert_eq!(result, vec!["2".to_string(), "4".to_string(), "6".to_string()]);
    });
}

#[tokio::test]
async fn test_pipe_is_reusable_across_streams() {
    let segment = pipe::compose(
        pipe::map_async(|x: u32| async move {
            tokio::task::yield_now().await;
            x * x
        }),
        pipe::limit(2),
    );

    let first = LazyStream::of(vec![1u32, 2, 3])
        .through(&segment)
        .to_list()
        .await
        .unwrap();
    let second = LazyStream::iterate(5u32, |x| x + 1)
        .through(&segment.clone())
        .to_list()
        .await
        .unwrap();

    assert_eq!(first, vec![1, 4]);
    assert_eq!(second, vec![25, 36]);
}

#[tokio::test]
async fn test_pipe_apply_on_raw_sequence() {
    let segment = pipe::filter(|s: &&str| !s.is_empty());
    let seq = LazyStream::of(vec!["a", "", "b"]).into_seq();

    let result = LazyStream::from_seq(segment.apply(seq)).to_list().await.unwrap();
    assert_eq!(result, vec!["a", "b"]);
}
