//! Floor/ceiling visplanes: vanilla avoids redrawing the same flat twice
//! by merging same-height/same-light spans discovered while walking
//! walls into a small set of `visplane_t`s, then filling each one's
//! column ranges in a single pass at the end of the frame. This keeps
//! the same two-stage shape (collect spans, then fill) without the
//! `openings[]` index-chasing vanilla uses to store per-column
//! top/bottom — spans are kept as a flat `Vec` here since this port has
//! no fixed upper bound on visplane count to preallocate against.

use alloc::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneKey {
    pub height: i32,
    pub pic: u16,
    pub light_level: u8,
}

#[derive(Debug, Clone)]
pub struct VisPlane {
    pub key: PlaneKey,
    /// One `(top, bottom)` exclusive row-range per screen column touched,
    /// `None` where this plane doesn't show through.
    pub columns: Vec<Option<(i32, i32)>>,
}

pub struct PlaneList {
    width: usize,
    planes: Vec<VisPlane>,
}

impl PlaneList {
    pub fn new(width: usize) -> Self {
        PlaneList { width, planes: Vec::new() }
    }

    /// `R_FindPlane` + `R_CheckPlane`'s combined shape: find an existing
    /// plane with the same key, or start a new one, then union this
    /// column's span into it.
    pub fn add_span(&mut self, key: PlaneKey, x: usize, top: i32, bottom: i32) {
        if x >= self.width || bottom <= top {
            return;
        }
        let width = self.width;
        let plane = match self.planes.iter_mut().find(|p| p.key == key) {
            Some(p) => p,
            None => {
                self.planes.push(VisPlane { key, columns: alloc::vec![None; width] });
                self.planes.last_mut().unwrap()
            }
        };
        plane.columns[x] = Some(match plane.columns[x] {
            Some((t, b)) => (t.min(top), b.max(bottom)),
            None => (top, bottom),
        });
    }

    pub fn planes(&self) -> &[VisPlane] {
        &self.planes
    }

    pub fn reset(&mut self) {
        self.planes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_merges_into_one_plane() {
        let mut list = PlaneList::new(8);
        let key = PlaneKey { height: 0, pic: 3, light_level: 200 };
        list.add_span(key, 0, 10, 20);
        list.add_span(key, 1, 5, 15);
        assert_eq!(list.planes().len(), 1);
    }

    #[test]
    fn different_key_starts_a_new_plane() {
        let mut list = PlaneList::new(8);
        list.add_span(PlaneKey { height: 0, pic: 3, light_level: 200 }, 0, 10, 20);
        list.add_span(PlaneKey { height: 16, pic: 3, light_level: 200 }, 0, 10, 20);
        assert_eq!(list.planes().len(), 2);
    }

    #[test]
    fn overlapping_spans_union_the_range() {
        let mut list = PlaneList::new(8);
        let key = PlaneKey { height: 0, pic: 3, light_level: 200 };
        list.add_span(key, 2, 10, 20);
        list.add_span(key, 2, 5, 15);
        let span = list.planes()[0].columns[2].unwrap();
        assert_eq!(span, (5, 20));
    }

    #[test]
    fn reset_clears_all_planes() {
        let mut list = PlaneList::new(8);
        list.add_span(PlaneKey { height: 0, pic: 3, light_level: 200 }, 0, 10, 20);
        list.reset();
        assert!(list.planes().is_empty());
    }
}
