use crate::models::PaginationCursor;

/// 每页文章数
pub const PAGE_SIZE: usize = 12;

/// 一页结果
#[derive(Debug)]
pub struct Page<'a, T> {
    /// 本页新展示的条目
    pub items: &'a [T],
    /// 本页之后的游标位置
    pub cursor: PaginationCursor,
    /// 剩余未展示的条目数
    pub remaining: usize,
}

impl<T> Page<'_, T> {
    pub fn has_more(&self) -> bool {
        self.remaining > 0
    }
}

/// 从游标处取下一页；每页至少一条
pub fn next_page<T>(filtered: &[T], cursor: PaginationCursor, page_size: usize) -> Page<'_, T> {
    let total = filtered.len();
    let start = cursor.index.min(total);
    let end = start.saturating_add(page_size.max(1)).min(total);

    Page {
        items: &filtered[start..end],
        cursor: PaginationCursor { index: end },
        remaining: total - end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_concatenate_to_the_full_list() {
        let filtered: Vec<usize> = (0..30).collect();
        let mut cursor = PaginationCursor::default();
        let mut shown = Vec::new();
        let mut pages = 0;

        loop {
            let page = next_page(&filtered, cursor, PAGE_SIZE);
            shown.extend_from_slice(page.items);
            cursor = page.cursor;
            pages += 1;
            if !page.has_more() {
                break;
            }
        }

        assert_eq!(pages, 3);
        assert_eq!(shown, filtered);
    }

    #[test]
    fn test_remaining_counts_down() {
        let filtered: Vec<usize> = (0..15).collect();

        let first = next_page(&filtered, PaginationCursor::default(), PAGE_SIZE);
        assert_eq!(first.items.len(), 12);
        assert_eq!(first.cursor.index, 12);
        assert_eq!(first.remaining, 3);

        let second = next_page(&filtered, first.cursor, PAGE_SIZE);
        assert_eq!(second.items, &[12, 13, 14]);
        assert_eq!(second.cursor.index, 15);
        assert!(!second.has_more());
    }

    #[test]
    fn test_exhausted_and_empty_lists() {
        let filtered: Vec<usize> = (0..3).collect();
        let page = next_page(&filtered, PaginationCursor { index: 10 }, PAGE_SIZE);
        assert!(page.items.is_empty());
        assert_eq!(page.cursor.index, 3);

        let empty: Vec<usize> = Vec::new();
        let page = next_page(&empty, PaginationCursor::default(), PAGE_SIZE);
        assert!(page.items.is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn test_huge_page_size_does_not_overflow() {
        let filtered = [1, 2, 3];

        let first = next_page(&filtered, PaginationCursor::default(), usize::MAX);
        assert_eq!(first.items, &[1, 2, 3]);
        assert!(!first.has_more());

        let after = next_page(&filtered, first.cursor, usize::MAX);
        assert!(after.items.is_empty());
        assert_eq!(after.cursor.index, 3);
    }

    #[test]
    fn test_zero_page_size_still_advances() {
        let filtered = [1, 2];
        let page = next_page(&filtered, PaginationCursor::default(), 0);
        assert_eq!(page.items, &[1]);
    }
}
