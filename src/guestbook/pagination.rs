use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Client-side slice of a full result. Pages are 1-based; a page past the
/// end is empty rather than an error.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_pages = items.len().div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page);
    let slice = items
        .iter()
        .skip(start)
        .take(per_page)
        .cloned()
        .collect();

    Page {
        items: slice,
        page,
        per_page,
        total: items.len(),
        total_pages,
    }
}
