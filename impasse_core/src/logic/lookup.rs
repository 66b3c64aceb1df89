use crate::logic::board::{Cell, Direction, MAX_DIAGONAL, NUM_CELLS};
use std::sync::OnceLock;

/// Precomputed diagonal rays: for every cell and direction, the cells met
/// walking away from it until the board edge.
pub struct DiagonalTables {
    rays: Vec<[Vec<Cell>; 4]>,
}

impl DiagonalTables {
    fn new() -> Self {
        let rays = (0..NUM_CELLS)
            .map(|idx| {
                Direction::ALL.map(|dir| {
                    let mut ray = Vec::with_capacity(MAX_DIAGONAL);
                    let mut current = Cell::from_index(idx);
                    while let Some(next) = current.and_then(|c| c.step(dir)) {
                        ray.push(next);
                        current = Some(next);
                    }
                    ray
                })
            })
            .collect();

        Self { rays }
    }

    pub fn get() -> &'static Self {
        static INSTANCE: OnceLock<DiagonalTables> = OnceLock::new();
        INSTANCE.get_or_init(DiagonalTables::new)
    }

    /// Cells strictly beyond `from` along `dir`, nearest first.
    pub fn ray(&self, from: Cell, dir: Direction) -> &[Cell] {
        self.rays
            .get(from.index())
            .and_then(|rays| rays.get(dir.index()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
