use anyhow::Result;

use super::sync::FenceState;
use super::vertex::{SpriteVertex, VERTICES_PER_QUAD};

/// Number of rotating regions in the streaming buffer.
pub const REGION_COUNT: usize = 3;

/// One allocation partitioned into `REGION_COUNT` equal, fenced regions.
///
/// The vertex storage is the CPU side of the streaming buffer: region `i` starts
/// at vertex `i * sprites_per_batch * 6` here and in the GPU buffer alike.
/// Exactly one region is current; it only changes through `advance`.
pub struct RegionRing<F> {
    vertices: Box<[SpriteVertex]>,
    fences: [FenceState<F>; REGION_COUNT],
    current: usize,
    sprites_per_region: usize,
}

impl<F> RegionRing<F> {
    /// Allocates room for `sprites_per_region` quads in each region.
    pub fn new(sprites_per_region: usize) -> Result<Self> {
        anyhow::ensure!(sprites_per_region > 0, "sprites_per_batch must be non-zero");

        let total = sprites_per_region
            .checked_mul(VERTICES_PER_QUAD * REGION_COUNT)
            .filter(|&n| u32::try_from(n).is_ok())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "sprites_per_batch {sprites_per_region} exceeds addressable vertex range"
                )
            })?;

        Ok(Self {
            vertices: vec![SpriteVertex::default(); total].into_boxed_slice(),
            fences: std::array::from_fn(|_| FenceState::Absent),
            current: 0,
            sprites_per_region,
        })
    }

    #[inline]
    pub fn sprites_per_region(&self) -> usize {
        self.sprites_per_region
    }

    #[inline]
    pub fn vertices_per_region(&self) -> usize {
        self.sprites_per_region * VERTICES_PER_QUAD
    }

    /// Total vertex capacity across all regions.
    #[inline]
    pub fn total_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Moves to the next region, wrapping after the last.
    #[inline]
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % REGION_COUNT;
    }

    /// First vertex of `index` within the shared buffer.
    #[inline]
    pub fn base_vertex(&self, index: usize) -> u32 {
        assert!(index < REGION_COUNT, "region index {index} out of range");
        // Fits: the whole allocation was checked against u32 in `new`.
        (index * self.vertices_per_region()) as u32
    }

    /// Whole region `index`.
    pub fn region(&self, index: usize) -> &[SpriteVertex] {
        assert!(index < REGION_COUNT, "region index {index} out of range");
        let len = self.vertices_per_region();
        &self.vertices[index * len..(index + 1) * len]
    }

    /// Mutable view of region `index`.
    pub fn region_mut(&mut self, index: usize) -> &mut [SpriteVertex] {
        assert!(index < REGION_COUNT, "region index {index} out of range");
        let len = self.vertices_per_region();
        &mut self.vertices[index * len..(index + 1) * len]
    }

    /// Six-vertex slot `slot` in region `index`.
    pub fn quad_mut(
        &mut self,
        index: usize,
        slot: usize,
    ) -> &mut [SpriteVertex; VERTICES_PER_QUAD] {
        assert!(
            slot < self.sprites_per_region,
            "quad slot {slot} out of range for region of {}",
            self.sprites_per_region
        );
        let start = slot * VERTICES_PER_QUAD;
        let region = self.region_mut(index);
        <&mut [SpriteVertex; VERTICES_PER_QUAD]>::try_from(
            &mut region[start..start + VERTICES_PER_QUAD],
        )
        .expect("slice of exactly VERTICES_PER_QUAD elements")
    }

    #[inline]
    pub fn fence(&self, index: usize) -> &FenceState<F> {
        &self.fences[index]
    }

    #[inline]
    pub fn fence_mut(&mut self, index: usize) -> &mut FenceState<F> {
        &mut self.fences[index]
    }

    /// Iterates all fence slots in region order.
    pub fn fences_mut(&mut self) -> impl Iterator<Item = &mut FenceState<F>> {
        self.fences.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_partition_the_allocation() {
        let mut ring = RegionRing::<u32>::new(4).unwrap();
        assert_eq!(ring.total_vertices(), 4 * 6 * REGION_COUNT);
        assert_eq!(ring.vertices_per_region(), 24);

        for i in 0..REGION_COUNT {
            assert_eq!(ring.base_vertex(i), (i * 24) as u32);
            assert_eq!(ring.region(i).len(), 24);
        }

        // Writing into one region leaves its neighbours untouched.
        ring.region_mut(1).fill(SpriteVertex {
            pos: [1.0, 1.0],
            ..SpriteVertex::default()
        });
        assert!(ring.region(0).iter().all(|v| *v == SpriteVertex::default()));
        assert!(ring.region(2).iter().all(|v| *v == SpriteVertex::default()));
        assert!(ring.region(1).iter().all(|v| v.pos == [1.0, 1.0]));
    }

    #[test]
    fn advance_wraps_after_region_count_steps() {
        let mut ring = RegionRing::<u32>::new(1).unwrap();
        let start = ring.current();
        let mut seen = Vec::new();
        for _ in 0..REGION_COUNT {
            ring.advance();
            seen.push(ring.current());
        }
        assert_eq!(seen, vec![1, 2, 0]);
        assert_eq!(ring.current(), start);
    }

    #[test]
    fn quad_slot_addresses_six_vertices() {
        let mut ring = RegionRing::<u32>::new(2).unwrap();
        ring.quad_mut(2, 1)[0].pos = [7.0, 7.0];
        assert_eq!(ring.region(2)[6].pos, [7.0, 7.0]);
    }

    #[test]
    #[should_panic(expected = "quad slot 2 out of range")]
    fn quad_slot_past_capacity_panics() {
        let mut ring = RegionRing::<u32>::new(2).unwrap();
        let _ = ring.quad_mut(0, 2);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(RegionRing::<u32>::new(0).is_err());
    }

    #[test]
    fn oversized_capacity_is_rejected() {
        assert!(RegionRing::<u32>::new(usize::MAX / 2).is_err());
    }

    #[test]
    fn capacity_past_u32_vertex_range_is_rejected() {
        // 2^30 quads = 6 * 3 * 2^30 vertices: fits in usize, not in u32.
        let err = RegionRing::<u32>::new(1 << 30).err().unwrap();
        assert!(err.to_string().contains("exceeds addressable vertex range"));

        // Largest capacity whose vertex total still fits.
        let max_ok = u32::MAX as usize / (VERTICES_PER_QUAD * REGION_COUNT);
        assert!(RegionRing::<u32>::new(max_ok + 1).is_err());
    }

    #[test]
    fn fences_start_absent() {
        let ring = RegionRing::<u32>::new(1).unwrap();
        assert!((0..REGION_COUNT).all(|i| ring.fence(i).is_absent()));
    }
}
