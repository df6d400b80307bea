//! Joining the pages of a paginated report

use costboard_types::RawReport;

/// Concatenate successive pages of one report
///
/// The first page's `meta` is kept (its totals and count already span
/// every page); the merged report has no further page to fetch.
pub fn merge_pages<I>(pages: I) -> RawReport
where
    I: IntoIterator<Item = RawReport>,
{
    let mut pages = pages.into_iter();
    let Some(mut merged) = pages.next() else {
        return RawReport::default();
    };

    for page in pages {
        merged.data.extend(page.data);
    }

    if merged.meta.count == 0 {
        merged.meta.count = merged.data.len() as u64;
    }
    if let Some(pagination) = merged.meta.pagination.as_mut() {
        pagination.next = None;
    }

    merged
}
