use super::SpriteVertex;

/// GPU operations needed to stream sprite quads.
///
/// `SpriteBatch` owns all batching and buffering decisions; an implementation only
/// executes them. Vertex offsets are in vertices from the start of the streaming
/// buffer, which mirrors the CPU-side `RegionRing` allocation one-to-one.
pub trait StreamBackend {
    /// Marker for "all work issued so far". Owned; released by dropping it.
    type Fence;

    /// Where draws land (e.g. a surface texture view).
    type Target;

    /// Texture sampled by subsequent draws.
    type Texture: ?Sized;

    /// Activates the program and vertex layout for draws into `target`.
    fn bind(&mut self, target: Self::Target);

    /// Deactivates whatever `bind` activated.
    fn unbind(&mut self);

    /// Selects the texture for subsequent draws.
    fn bind_texture(&mut self, texture: &Self::Texture);

    /// Falls back to the built-in 1x1 white texture.
    fn bind_white_texture(&mut self);

    /// Makes `vertices` visible to the GPU at `base_vertex`.
    fn upload(&mut self, base_vertex: u32, vertices: &[SpriteVertex]);

    /// Issues exactly one draw call over `first_vertex..first_vertex + vertex_count`.
    fn draw(&mut self, first_vertex: u32, vertex_count: u32);

    /// Places a fence after all previously issued work.
    fn insert_fence(&mut self) -> Self::Fence;

    /// Non-blocking completion query.
    fn is_signaled(&mut self, fence: &Self::Fence) -> bool;

    /// Blocks until `fence` has signaled. No timeout.
    fn wait(&mut self, fence: &Self::Fence);
}
