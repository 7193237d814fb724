//! Offset arithmetic for the paginated title list.

/// Titles shown per search page.
pub const PAGE_SIZE: u64 = 10;

/// Offsets for the links either side of the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub previous: u64,
    pub next: u64,
}

impl Pagination {
    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    /// `next` only moves when another page exists.
    pub fn has_next(&self) -> bool {
        self.next > self.offset
    }
}

/// Derive previous/next offsets from the current window and the match count.
///
/// `next` stays at `offset` when advancing would pass `total`, which is also
/// how a stale offset beyond the last match is handled.
pub fn paginate(offset: u64, limit: u64, total: u64) -> Pagination {
    let candidate = offset.saturating_add(limit);
    Pagination {
        offset,
        previous: offset.saturating_sub(limit),
        next: if candidate <= total { candidate } else { offset },
    }
}

/// Read the `offset` query value; missing, non-numeric and negative input all mean 0.
pub fn parse_offset(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .map(|offset| offset.max(0) as u64)
        .unwrap_or(0)
}
