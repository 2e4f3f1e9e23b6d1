use futures::future;
use futures::stream::{Stream, StreamExt};

/// Turns the location observed after every document mutation into a stream
/// of URL changes. Mutations that leave the URL untouched yield nothing.
///
/// The stream lives as long as `mutations` and cannot be restarted.
pub fn url_changes<S>(initial: String, mutations: S) -> impl Stream<Item = String>
where
    S: Stream<Item = String>,
{
    mutations
        .scan(initial, |last_url, url| {
            let changed = if *last_url != url {
                *last_url = url.clone();
                Some(url)
            } else {
                None
            };
            future::ready(Some(changed))
        })
        .filter_map(future::ready)
}
