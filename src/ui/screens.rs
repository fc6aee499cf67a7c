use crate::db::RecordIndex;

/// Rows of the record list visible at once.
pub const WINDOW_SIZE: usize = 18;

/// Selection cursor and scroll window over the occupied records.
///
/// The cursor wraps at both ends. The window only scrolls when the cursor
/// leaves it, and `move_by` reports when that happens so the caller can
/// rebuild the visible rows; otherwise only the marker moves.
#[derive(Debug, Clone)]
pub(crate) struct ListNavigator {
    index: RecordIndex,
    cursor: usize,
    camera: usize,
}

impl ListNavigator {
    pub(crate) fn new(index: RecordIndex) -> Self {
        Self {
            index,
            cursor: 0,
            camera: 0,
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn camera(&self) -> usize {
        self.camera
    }

    /// Move the selection by `delta`, wrapping. Returns true when the visible
    /// window scrolled.
    pub(crate) fn move_by(&mut self, delta: i32) -> bool {
        let count = self.count();
        if count == 0 || delta == 0 {
            return false;
        }
        let next = (self.cursor as i64 + i64::from(delta)).rem_euclid(count as i64);
        self.cursor = next as usize;

        let previous = self.camera;
        if self.cursor < self.camera {
            self.camera = self.cursor;
        }
        if self.cursor >= self.camera + WINDOW_SIZE {
            self.camera = self.cursor + 1 - WINDOW_SIZE;
        }

        let scrolled = self.camera != previous;
        if scrolled {
            tracing::debug!(cursor = self.cursor, camera = self.camera, "list window scrolled");
        }
        scrolled
    }

    /// Slot of the selected record, if there are any records.
    pub(crate) fn selected(&self) -> Option<usize> {
        self.index.get(self.cursor)
    }

    /// Slots currently inside the window, top to bottom.
    pub(crate) fn visible(&self) -> &[usize] {
        let slots = self.index.as_slice();
        let end = (self.camera + WINDOW_SIZE).min(slots.len());
        &slots[self.camera.min(end)..end]
    }

    /// Row of the cursor marker within the window.
    pub(crate) fn marker_row(&self) -> usize {
        self.cursor() - self.camera()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseImage;
    use crate::models::ProfileName;

    fn navigator(occupied: usize) -> ListNavigator {
        let mut image = DatabaseImage::blank();
        for slot in 0..occupied {
            image.set_name(slot * 2, &ProfileName::from_ascii("Mii"));
        }
        ListNavigator::new(RecordIndex::build(&image))
    }

    #[test]
    fn wraps_forward_and_resets_camera() {
        let mut nav = navigator(30);
        for _ in 0..29 {
            nav.move_by(1);
        }
        assert_eq!(nav.cursor(), 29);
        assert_eq!(nav.camera(), 12);

        assert!(nav.move_by(1));
        assert_eq!(nav.cursor(), 0);
        assert_eq!(nav.camera(), 0);
    }

    #[test]
    fn wraps_backward_to_last_window() {
        let mut nav = navigator(30);
        assert!(nav.move_by(-1));
        assert_eq!(nav.cursor(), 29);
        assert_eq!(nav.camera(), 12);
        assert_eq!(nav.selected(), Some(58));
        assert_eq!(nav.marker_row(), WINDOW_SIZE - 1);
        assert_eq!(nav.visible().len(), WINDOW_SIZE);
    }

    #[test]
    fn camera_scrolls_one_row_at_a_time() {
        let mut nav = navigator(30);
        for _ in 0..17 {
            assert!(!nav.move_by(1));
        }
        assert!(nav.move_by(1));
        assert_eq!(nav.camera(), 1);
        assert!(!nav.move_by(-1));
        assert_eq!(nav.marker_row(), 16);
    }

    #[test]
    fn short_lists_never_scroll() {
        let mut nav = navigator(5);
        for _ in 0..12 {
            assert!(!nav.move_by(1));
            assert_eq!(nav.camera(), 0);
        }
        assert_eq!(nav.cursor(), 12 % 5);
        assert_eq!(nav.visible(), &[0, 2, 4, 6, 8]);
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut nav = navigator(0);
        assert!(!nav.move_by(1));
        assert!(!nav.move_by(-1));
        assert_eq!(nav.selected(), None);
        assert!(nav.visible().is_empty());
    }
}
