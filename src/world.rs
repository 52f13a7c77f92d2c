use crate::Pos;

/// Storage for the alive cells of an unbounded grid.
///
/// A position is either in the world (alive) or not; there is no separate
/// record for dead cells.
pub trait World: Default + Clone + Send + 'static {
    fn is_alive(&self, pos: Pos) -> bool;
    fn set(&mut self, pos: Pos, alive: bool);
    fn actives(&self) -> Vec<Pos>;
    fn len(&self) -> usize;
    fn clear(&mut self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn toggle(&mut self, pos: Pos) {
        let alive = self.is_alive(pos);
        self.set(pos, !alive);
    }
}

pub use sparse_world::SparseWorld;
mod sparse_world;
