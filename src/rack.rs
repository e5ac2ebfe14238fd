
use super::Tile;

/// The local player's unplaced tiles, in the order the player arranged them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rack {
    tiles: Vec<Tile>,
    selected: Option<usize>,
}

/// What a click on a rack tile did
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Selection {
    Selected(usize),
    Deselected,
    Swapped(usize, usize),
    Ignored,
}

impl Rack {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self { tiles, selected: None }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_tile(&self) -> Option<Tile> {
        self.tiles.get(self.selected?).copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Clicking twice on a tile deselects it, clicking on another one swaps them
    pub fn select(&mut self, index: usize) -> Selection {
        if index >= self.tiles.len() {
            log::debug!("rack index {} out of {} tiles", index, self.tiles.len());
            return Selection::Ignored
        }
        match self.selected.take() {
            None => {
                self.selected = Some(index);
                Selection::Selected(index)
            },
            Some(current) if current == index => Selection::Deselected,
            Some(current) => {
                self.tiles.swap(current, index);
                Selection::Swapped(current, index)
            },
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None
    }

    /// Takes a tile out, later ones shift left. Selection is left as is, callers clear it.
    pub fn remove(&mut self, index: usize) -> Option<Tile> {
        if index < self.tiles.len() {
            Some(self.tiles.remove(index))
        } else {
            None
        }
    }

    pub fn append(&mut self, tile: Tile) {
        self.tiles.push(tile)
    }

    pub fn replace_all(&mut self, tiles: Vec<Tile>) {
        self.tiles = tiles;
        self.selected = None;
    }
}


#[test]
fn selecting_twice_deselects() {
    use crate::snapshot::fixtures::rack;

    let mut r = Rack::new(rack("ABC"));
    assert_eq!(r.select(1), Selection::Selected(1));
    assert_eq!(r.selected_tile(), Some(crate::tile('B')));
    assert_eq!(r.select(1), Selection::Deselected);
    assert_eq!(r.selected(), None);
    assert_eq!(r.tiles(), &rack("ABC")[..]);
}

#[test]
fn selecting_another_tile_swaps() {
    use crate::snapshot::fixtures::rack;

    let mut r = Rack::new(rack("ABC"));
    r.select(0);
    assert_eq!(r.select(2), Selection::Swapped(0, 2));
    assert_eq!(r.tiles(), &rack("CBA")[..]);
    assert_eq!(r.selected(), None);
}

#[test]
fn out_of_range_is_ignored() {
    use crate::snapshot::fixtures::rack;

    let mut r = Rack::new(rack("AB"));
    r.select(0);
    assert_eq!(r.select(5), Selection::Ignored);
    assert_eq!(r.selected(), Some(0));
    assert_eq!(r.remove(2), None);
    assert_eq!(r.len(), 2);
}

#[test]
fn remove_and_append() {
    use crate::snapshot::fixtures::rack;

    let mut r = Rack::new(rack("A*T"));
    assert_eq!(r.remove(1), Some(crate::Tile::Blank));
    assert_eq!(r.tiles(), &rack("AT")[..]);
    r.append(crate::Tile::Blank);
    assert_eq!(r.tiles(), &rack("AT*")[..]);
    r.select(0);
    r.replace_all(rack("Q"));
    assert_eq!(r.selected(), None);
    assert_eq!(r.tiles(), &rack("Q")[..]);
}
